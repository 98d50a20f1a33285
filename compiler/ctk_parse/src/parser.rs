//! The in-place reducer.
//!
//! The reducer works on a mutable token sequence. At an offset it tries each
//! rule in registration order; the first rule whose window matches builds a
//! node from the window, and the window is replaced by one token of the
//! rule's produced kind wrapping that node. Reduction then resumes at the same
//! offset, so chains like `a + b + c` keep folding. There is no backtracking:
//! a window that no rule matches is left as it is.
//!
//! `ParseThen` slots re-enter the reducer at their own position with a
//! tighter precedence bound before testing the token there. This is how a
//! single token grows into a whole subexpression before the enclosing rule
//! decides whether it matches.

use std::fmt;

use ctk_ast::{Ast, Language};
use ctk_ir::{NodeId, Span, Token};
use ctk_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{Grammar, LeftoverTokens, Matcher, ReduceError};

/// Runtime limits of a [`Parser`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest allowed nesting of sub-parses.
    ///
    /// This bounds right recursion, not bracket nesting: a right-associative
    /// rule sub-parses once per operator, so `1 + 1 + ... + 1` nests as deep
    /// as it has `+` signs. The real stack is grown on demand, so the limit
    /// only stops grammars that recurse without end.
    pub max_depth: usize,
}

impl ParserConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 65_536;

    pub fn new() -> Self {
        ParserConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig::new()
    }
}

/// A grammar ready to reduce token sequences.
pub struct Parser<L: Language> {
    grammar: Grammar<L>,
    config: ParserConfig,
}

impl<L: Language> Parser<L> {
    pub fn new(grammar: Grammar<L>) -> Self {
        Parser {
            grammar,
            config: ParserConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grammar(&self) -> &Grammar<L> {
        &self.grammar
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Reduce `tokens` in place starting at `offset`.
    ///
    /// Rules whose precedence is below `ambient` are skipped. Tokens before
    /// `offset` are never touched. Returns once no rule matches at `offset`.
    ///
    /// Node tokens in `tokens` must come from `ast` and still be unconsumed;
    /// a rule that matches any other node token fails with
    /// [`ReduceError::ForeignNode`].
    #[tracing::instrument(level = "trace", skip(self, tokens, ast), fields(tokens = tokens.len()))]
    pub fn reduce(
        &self,
        tokens: &mut Vec<Token<L::Value>>,
        ast: &mut Ast<L>,
        offset: usize,
        ambient: u32,
    ) -> Result<(), ReduceError> {
        ReduceState::new(self, tokens, ast).reduce_at(offset, ambient)
    }

    /// Run one full pass over `tokens`.
    ///
    /// Reduces at every offset from left to right, over the sequence as it
    /// shrinks. Whatever is left afterwards is returned as is; a complete
    /// parse leaves exactly one token.
    #[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
    pub fn parse(&self, tokens: Vec<Token<L::Value>>) -> Result<ParseOutput<L>, ReduceError> {
        let mut tokens = tokens;
        let mut ast = Ast::new();
        let mut offset = 0;
        while offset < tokens.len() {
            self.reduce(&mut tokens, &mut ast, offset, 0)?;
            offset += 1;
        }
        trace!(remaining = tokens.len(), nodes = ast.len(), "pass complete");
        Ok(ParseOutput { ast, tokens })
    }
}

impl<L: Language> fmt::Debug for Parser<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("grammar", &self.grammar)
            .field("config", &self.config)
            .finish()
    }
}

/// Mutable state of one reduction call and the sub-parses it triggers.
pub(crate) struct ReduceState<'a, L: Language> {
    parser: &'a Parser<L>,
    tokens: &'a mut Vec<Token<L::Value>>,
    ast: &'a mut Ast<L>,
    depth: usize,
}

impl<'a, L: Language> ReduceState<'a, L> {
    fn new(parser: &'a Parser<L>, tokens: &'a mut Vec<Token<L::Value>>, ast: &'a mut Ast<L>) -> Self {
        ReduceState {
            parser,
            tokens,
            ast,
            depth: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    fn reduce_at(&mut self, offset: usize, ambient: u32) -> Result<(), ReduceError> {
        let parser = self.parser;
        let rules = parser.grammar.rules();
        // Consecutive one-token reductions at this offset. Past the number of
        // rules, some rule must be rewriting its own output.
        let mut unit_streak = 0;

        'reduce: while offset < self.tokens.len() {
            for rule in rules {
                if !rule.matches(self, offset, ambient)? {
                    continue;
                }

                let id = rule.apply(self.tokens, self.ast, offset)?;
                trace!(rule = rule.name(), offset, ambient, node = ?id, "reduced");

                if rule.pattern().len() == 1 {
                    unit_streak += 1;
                    if unit_streak > rules.len() {
                        return Err(ReduceError::CyclicUnitRules {
                            rule: rule.name(),
                            span: self.ast.span(id),
                        });
                    }
                } else {
                    unit_streak = 0;
                }
                continue 'reduce;
            }
            break;
        }
        Ok(())
    }

    /// Test the token at `at`, running the sub-parse of a `ParseThen` first.
    pub(crate) fn test_slot(
        &mut self,
        matcher: &Matcher<L::Value>,
        at: usize,
        ambient: u32,
        rule_precedence: Option<u32>,
    ) -> Result<bool, ReduceError> {
        if let Matcher::ParseThen { bound, .. } = matcher {
            let bound = ambient.max(bound.or(rule_precedence).unwrap_or(ambient));
            self.sub_parse(at, bound)?;
        }

        let padding;
        let token = match self.tokens.get(at) {
            Some(token) => token,
            None => {
                padding = Token::eof(self.padding_span());
                &padding
            }
        };
        Ok(matcher.test(token, self.ast))
    }

    fn sub_parse(&mut self, at: usize, bound: u32) -> Result<(), ReduceError> {
        if self.depth >= self.parser.config.max_depth {
            let span = self
                .tokens
                .get(at)
                .map_or_else(|| self.padding_span(), Token::span);
            return Err(ReduceError::NestingTooDeep {
                depth: self.parser.config.max_depth,
                span,
            });
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.reduce_at(at, bound));
        self.depth -= 1;
        result
    }

    /// Span of the synthetic end-of-stream token: the point after the last token.
    fn padding_span(&self) -> Span {
        self.tokens
            .last()
            .map_or(Span::EMPTY, |token| token.span().end_point())
    }
}

/// The tree and the token sequence left by a full pass.
pub struct ParseOutput<L: Language> {
    pub ast: Ast<L>,
    pub tokens: Vec<Token<L::Value>>,
}

impl<L: Language> ParseOutput<L> {
    /// Check if the pass reduced everything to a single node.
    pub fn is_complete(&self) -> bool {
        matches!(self.tokens.as_slice(), [token] if token.node_id().is_some())
    }

    /// Nodes wrapped by the remaining tokens, left to right.
    pub fn roots(&self) -> Vec<NodeId> {
        self.tokens.iter().filter_map(Token::node_id).collect()
    }

    /// The tokens that keep the output from being a single node.
    ///
    /// Everything after the first token, plus the first one when it is not
    /// a node.
    pub fn leftovers(&self) -> Option<LeftoverTokens> {
        if self.is_complete() {
            return None;
        }
        let skip = usize::from(self.tokens.first().is_some_and(|t| t.node_id().is_some()));
        Some(LeftoverTokens {
            spans: self.tokens.iter().skip(skip).map(Token::span).collect(),
        })
    }

    /// The tree and its single root.
    pub fn into_root(self) -> Result<(Ast<L>, NodeId), LeftoverTokens> {
        if let Some(leftovers) = self.leftovers() {
            return Err(leftovers);
        }
        match self.tokens.first().and_then(Token::node_id) {
            Some(root) => Ok((self.ast, root)),
            None => Err(LeftoverTokens { spans: Vec::new() }),
        }
    }
}

impl<L: Language> fmt::Debug for ParseOutput<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOutput")
            .field("ast", &self.ast)
            .field("tokens", &self.tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests;

//! Reduction rules: a pattern of named slots bound to a node constructor.

use std::fmt;
use std::ops::Range;

use ctk_ast::{Ast, Concrete, Language, NodeKind, NodeType};
use ctk_ir::{NodeId, Span, Token, TokenKind};
use tracing::trace;

use crate::parser::ReduceState;
use crate::{BuildError, Matcher, ReduceError};

/// An ordered list of named slots, each testing one token.
///
/// ```text
/// Pattern::new(EXPRESSION)
///     .with_precedence(1)
///     .slot("lhs", Matcher::kind(EXPRESSION))
///     .slot("op", Matcher::kind(PLUS))
///     .slot("rhs", Matcher::parse_then(Matcher::kind(EXPRESSION)))
/// ```
#[derive(Clone, PartialEq)]
pub struct Pattern<V> {
    produces: TokenKind,
    precedence: Option<u32>,
    slots: Vec<(&'static str, Matcher<V>)>,
}

impl<V> Pattern<V> {
    /// An empty pattern whose reductions emit a token of kind `produces`.
    pub fn new(produces: TokenKind) -> Self {
        Pattern {
            produces,
            precedence: None,
            slots: Vec::new(),
        }
    }

    /// Only match while the ambient precedence is at most `precedence`.
    #[must_use]
    pub fn with_precedence(mut self, precedence: u32) -> Self {
        self.precedence = Some(precedence);
        self
    }

    /// Append a slot.
    #[must_use]
    pub fn slot(mut self, name: &'static str, matcher: Matcher<V>) -> Self {
        self.slots.push((name, matcher));
        self
    }

    #[inline]
    pub fn produces(&self) -> TokenKind {
        self.produces
    }

    #[inline]
    pub fn precedence(&self) -> Option<u32> {
        self.precedence
    }

    pub fn slots(&self) -> &[(&'static str, Matcher<V>)] {
        &self.slots
    }

    /// Number of tokens a match consumes.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Position of the slot named `name`.
    pub fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|(slot, _)| *slot == name)
    }
}

impl<V: fmt::Debug> fmt::Debug for Pattern<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} :=", self.produces)?;
        for (name, matcher) in &self.slots {
            write!(f, " {name}:{matcher:?}")?;
        }
        if let Some(precedence) = self.precedence {
            write!(f, " (prec {precedence})")?;
        }
        Ok(())
    }
}

/// The tokens a rule matched, addressed by slot name.
pub struct Matched<'a, L: Language> {
    pattern: &'a Pattern<L::Value>,
    tokens: &'a [Token<L::Value>],
    ast: &'a Ast<L>,
}

impl<'a, L: Language> Matched<'a, L> {
    pub(crate) fn new(
        pattern: &'a Pattern<L::Value>,
        tokens: &'a [Token<L::Value>],
        ast: &'a Ast<L>,
    ) -> Self {
        Matched {
            pattern,
            tokens,
            ast,
        }
    }

    /// The token in slot `slot`.
    pub fn token(&self, slot: &'static str) -> Result<&'a Token<L::Value>, BuildError> {
        self.pattern
            .slot_index(slot)
            .and_then(|index| self.tokens.get(index))
            .ok_or(BuildError::UnknownSlot { slot })
    }

    /// The node wrapped by the token in slot `slot`.
    pub fn node(&self, slot: &'static str) -> Result<NodeId, BuildError> {
        let token = self.token(slot)?;
        token.node_id().ok_or(BuildError::ExpectedNode {
            slot,
            span: token.span(),
        })
    }

    /// The leaf value of the token in slot `slot`.
    pub fn leaf(&self, slot: &'static str) -> Result<&'a L::Value, BuildError> {
        let token = self.token(slot)?;
        token.leaf_value().ok_or(BuildError::ExpectedLeaf {
            slot,
            span: token.span(),
        })
    }

    /// Every matched token, in slot order.
    pub fn tokens(&self) -> &'a [Token<L::Value>] {
        self.tokens
    }

    /// The tree built so far; holds every node a slot refers to.
    pub fn ast(&self) -> &'a Ast<L> {
        self.ast
    }

    /// Span of the whole window.
    pub fn span(&self) -> Span {
        Span::covering(self.tokens)
    }
}

/// A node type the reducer can build from a matched window.
pub trait Production<L: Language>: NodeKind<L> {
    /// The pattern [`Grammar::add_rule`](crate::Grammar::add_rule) registers.
    fn pattern() -> Pattern<L::Value>;

    /// Build the node from the tokens its pattern matched.
    ///
    /// Called for every alternative pattern of the type, so slot names
    /// should agree across alternatives.
    fn build(matched: &Matched<'_, L>) -> Result<Self, BuildError>;
}

/// Builds a node of one concrete type and moves the window into the tree.
trait Builder<L: Language> {
    fn build(
        &self,
        pattern: &Pattern<L::Value>,
        tokens: &mut Vec<Token<L::Value>>,
        window: Range<usize>,
        ast: &mut Ast<L>,
    ) -> Result<NodeId, BuildError>;
}

struct ProductionBuilder<T, L: Language> {
    concrete: Concrete<T, L>,
}

impl<T: Production<L>, L: Language> Builder<L> for ProductionBuilder<T, L> {
    fn build(
        &self,
        pattern: &Pattern<L::Value>,
        tokens: &mut Vec<Token<L::Value>>,
        window: Range<usize>,
        ast: &mut Ast<L>,
    ) -> Result<NodeId, BuildError> {
        let node = T::build(&Matched::new(pattern, &tokens[window.clone()], ast))?;
        let children = tokens.drain(window).collect();
        Ok(ast.insert(&self.concrete, node, children))
    }
}

/// A pattern bound to the validated constructor of one concrete node type.
pub struct Rule<L: Language> {
    pattern: Pattern<L::Value>,
    node_type: &'static NodeType,
    builder: Box<dyn Builder<L>>,
}

impl<L: Language> Rule<L> {
    pub(crate) fn new<T: Production<L>>(concrete: Concrete<T, L>, pattern: Pattern<L::Value>) -> Self {
        Rule {
            pattern,
            node_type: concrete.node_type(),
            builder: Box::new(ProductionBuilder { concrete }),
        }
    }

    /// Name of the node type the rule builds.
    pub fn name(&self) -> &'static str {
        self.node_type.name()
    }

    pub fn node_type(&self) -> &'static NodeType {
        self.node_type
    }

    pub fn pattern(&self) -> &Pattern<L::Value> {
        &self.pattern
    }

    /// Check whether the rule matches the window starting at `offset`.
    ///
    /// Fails the precedence guard first, then tests slots left to right and
    /// stops at the first mismatch. Sub-parses triggered by earlier slots
    /// stay applied even when a later slot fails.
    pub(crate) fn matches(
        &self,
        state: &mut ReduceState<'_, L>,
        offset: usize,
        ambient: u32,
    ) -> Result<bool, ReduceError> {
        if let Some(precedence) = self.pattern.precedence {
            if ambient > precedence {
                trace!(rule = self.name(), ambient, precedence, "precedence guard");
                return Ok(false);
            }
        }

        for (index, (_, matcher)) in self.pattern.slots.iter().enumerate() {
            if !state.test_slot(matcher, offset + index, ambient, self.pattern.precedence)? {
                return Ok(false);
            }
        }

        // A window that runs into the end-of-stream padding is not a match.
        Ok(offset + self.pattern.len() <= state.len())
    }

    /// Replace the window at `offset` with one token wrapping the new node.
    pub(crate) fn apply(
        &self,
        tokens: &mut Vec<Token<L::Value>>,
        ast: &mut Ast<L>,
        offset: usize,
    ) -> Result<NodeId, ReduceError> {
        let window = offset..offset + self.pattern.len();
        let span = Span::covering(&tokens[window.clone()]);

        if let Some(token) = first_foreign(&tokens[window.clone()], ast) {
            return Err(ReduceError::ForeignNode {
                rule: self.name(),
                span: token.span(),
            });
        }

        let id = self
            .builder
            .build(&self.pattern, tokens, window, ast)
            .map_err(|source| ReduceError::Build {
                rule: self.name(),
                span,
                source,
            })?;
        tokens.insert(offset, Token::node(self.pattern.produces, id, ast.span(id)));
        Ok(id)
    }
}

/// The first token wrapping a node that is missing from `ast`, already has
/// a parent, or appears twice in the window.
fn first_foreign<'t, L: Language>(
    window: &'t [Token<L::Value>],
    ast: &Ast<L>,
) -> Option<&'t Token<L::Value>> {
    window.iter().enumerate().find_map(|(i, token)| {
        let id = token.node_id()?;
        let free = ast.try_node(id).is_some_and(|node| node.parent().is_none());
        let repeated = window[..i].iter().any(|t| t.node_id() == Some(id));
        (!free || repeated).then_some(token)
    })
}

impl<L: Language> fmt::Debug for Rule<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name(), self.pattern)
    }
}

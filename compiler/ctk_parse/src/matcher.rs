//! Single-token predicates.

use std::fmt;

use ctk_ast::{Ast, Language, NodeType};
use ctk_ir::{Token, TokenKind};

/// Tests one token of a rule window.
#[derive(Clone, PartialEq)]
pub enum Matcher<V> {
    /// The token's kind equals the given kind.
    Kind(TokenKind),

    /// The token carries a leaf value equal to the given one.
    Value(V),

    /// The token wraps a node whose type is, or descends from, the given type.
    Node(&'static NodeType),

    /// Reduce starting at this slot first, then test `inner` on whatever
    /// token ends up there.
    ///
    /// The nested pass runs with precedence bound `bound`, or the rule's own
    /// precedence when `bound` is `None`.
    ParseThen {
        bound: Option<u32>,
        inner: Box<Matcher<V>>,
    },
}

impl<V> Matcher<V> {
    #[inline]
    pub fn kind(kind: TokenKind) -> Self {
        Matcher::Kind(kind)
    }

    #[inline]
    pub fn value(value: V) -> Self {
        Matcher::Value(value)
    }

    #[inline]
    pub fn node(ty: &'static NodeType) -> Self {
        Matcher::Node(ty)
    }

    /// Sub-parse at the enclosing rule's precedence, then test `inner`.
    pub fn parse_then(inner: Matcher<V>) -> Self {
        Matcher::ParseThen {
            bound: None,
            inner: Box::new(inner),
        }
    }

    /// Sub-parse with an explicit precedence bound, then test `inner`.
    ///
    /// A bound above the rule's precedence keeps the nested pass from
    /// applying the same rule again, which makes the rule left-associative.
    pub fn parse_then_bound(bound: u32, inner: Matcher<V>) -> Self {
        Matcher::ParseThen {
            bound: Some(bound),
            inner: Box::new(inner),
        }
    }

    /// Check if this matcher triggers a sub-parse.
    pub fn is_parse_then(&self) -> bool {
        matches!(self, Matcher::ParseThen { .. })
    }
}

impl<V: PartialEq> Matcher<V> {
    /// Test `token` without running any sub-parse.
    ///
    /// `ParseThen` tests its inner matcher; the reducer runs the nested
    /// pass before calling this.
    pub fn test<L>(&self, token: &Token<V>, ast: &Ast<L>) -> bool
    where
        L: Language<Value = V>,
    {
        match self {
            Matcher::Kind(kind) => token.kind() == *kind,
            Matcher::Value(value) => token.leaf_value() == Some(value),
            Matcher::Node(ty) => token
                .node_id()
                .and_then(|id| ast.try_node(id))
                .is_some_and(|node| node.is_a(ty)),
            Matcher::ParseThen { inner, .. } => inner.test(token, ast),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Matcher<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Kind(kind) => write!(f, "{kind:?}"),
            Matcher::Value(value) => write!(f, "{value:?}"),
            Matcher::Node(ty) => write!(f, "<{ty:?}>"),
            Matcher::ParseThen {
                bound: Some(bound),
                inner,
            } => write!(f, "parse@{bound}({inner:?})"),
            Matcher::ParseThen { bound: None, inner } => write!(f, "parse({inner:?})"),
        }
    }
}

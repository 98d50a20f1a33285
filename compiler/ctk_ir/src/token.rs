//! Tokens consumed and produced by the reducer.
//!
//! A [`TokenKind`] is a nominal tag. Lexical kinds (`Number`, `Plus`) and
//! produced kinds (`Expression`, `Statement`) share the same tag space: a
//! reduction consumes N tokens and emits one token of a produced kind whose
//! payload is the newly built node.

use std::fmt;

use crate::{NodeId, Span};

/// Nominal tag of a token.
///
/// Grammar authors declare kinds as constants:
///
/// ```text
/// pub const NUMBER: TokenKind = TokenKind::new("Number");
/// pub const EXPRESSION: TokenKind = TokenKind::new("Expression");
/// ```
///
/// Two kinds are equal when their names are equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TokenKind(&'static str);

impl TokenKind {
    /// Synthetic end-of-stream kind used to pad rule windows.
    pub const EOF: TokenKind = TokenKind("<eof>");

    #[inline]
    pub const fn new(name: &'static str) -> Self {
        TokenKind(name)
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// What a token carries.
///
/// Traversal dispatches on this tag instead of inspecting the payload's type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Payload<V> {
    /// No value (punctuation, end of stream).
    Empty,
    /// Raw lexical value.
    Leaf(V),
    /// A reduced subtree.
    Node(NodeId),
}

impl<V> Payload<V> {
    #[inline]
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Payload::Leaf(value) => Some(value),
            Payload::Empty | Payload::Node(_) => None,
        }
    }

    #[inline]
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Payload::Node(id) => Some(*id),
            Payload::Empty | Payload::Leaf(_) => None,
        }
    }
}

/// A token with its payload and span in the source.
///
/// Immutable once constructed: fields are only readable.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token<V> {
    kind: TokenKind,
    payload: Payload<V>,
    span: Span,
}

impl<V> Token<V> {
    #[inline]
    pub fn new(kind: TokenKind, payload: Payload<V>, span: Span) -> Self {
        Token {
            kind,
            payload,
            span,
        }
    }

    /// A token carrying a lexical value.
    #[inline]
    pub fn leaf(kind: TokenKind, value: V, span: Span) -> Self {
        Token::new(kind, Payload::Leaf(value), span)
    }

    /// A token wrapping a reduced node.
    #[inline]
    pub fn node(kind: TokenKind, id: NodeId, span: Span) -> Self {
        Token::new(kind, Payload::Node(id), span)
    }

    /// A token without payload.
    #[inline]
    pub fn empty(kind: TokenKind, span: Span) -> Self {
        Token::new(kind, Payload::Empty, span)
    }

    /// End-of-stream token.
    #[inline]
    pub fn eof(span: Span) -> Self {
        Token::empty(TokenKind::EOF, span)
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &Payload<V> {
        &self.payload
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// The lexical value, if this token carries one.
    #[inline]
    pub fn leaf_value(&self) -> Option<&V> {
        self.payload.as_leaf()
    }

    /// The wrapped node, if this token is a reduction result.
    #[inline]
    pub fn node_id(&self) -> Option<NodeId> {
        self.payload.as_node()
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }
}

impl<V: fmt::Debug> fmt::Debug for Token<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Empty => write!(f, "{:?} @ {}", self.kind, self.span),
            Payload::Leaf(value) => write!(f, "{:?}({:?}) @ {}", self.kind, value, self.span),
            Payload::Node(id) => write!(f, "{:?}({:?}) @ {}", self.kind, id, self.span),
        }
    }
}

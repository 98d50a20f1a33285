//! Focused traits for interface segregation.

use super::{Span, Token};

/// Trait for types that have a source location span.
pub trait Spanned {
    /// Get the source location span.
    fn span(&self) -> Span;
}

impl<V> Spanned for Token<V> {
    fn span(&self) -> Span {
        Token::span(self)
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

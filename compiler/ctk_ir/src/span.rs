//! Source location spans.
//!
//! Spans are line/column ranges into a source unit. `merge` is commutative
//! and associative with [`Span::EMPTY`] as identity, so any sequence of spans
//! folds into the span covering all of them.

use std::fmt;

use crate::{SourceId, Spanned};

/// A line/column position in a source unit.
///
/// Ordered lexicographically: line first, then column.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Smallest representable position.
    pub const MIN: Position = Position { line: 0, column: 0 };

    /// Largest representable position.
    pub const MAX: Position = Position {
        line: u32::MAX,
        column: u32::MAX,
    };

    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source location span.
///
/// `start` is inclusive, `end` is exclusive. `source` identifies the source
/// unit the span points into; the span does not own the source text.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    pub source: SourceId,
}

impl Span {
    /// Identity of [`Span::merge`].
    ///
    /// Starts after every position and ends before every position, so merging
    /// it with any span `s` yields `s`.
    pub const EMPTY: Span = Span {
        start: Position::MAX,
        end: Position::MIN,
        source: SourceId::DETACHED,
    };

    /// Create a new span.
    #[inline]
    pub const fn new(start: Position, end: Position, source: SourceId) -> Self {
        Span { start, end, source }
    }

    /// Create a span from raw line/column pairs.
    #[inline]
    pub const fn from_coords(
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
        source: SourceId,
    ) -> Self {
        Span {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
            source,
        }
    }

    /// Create a point span (zero-length).
    #[inline]
    pub const fn point(at: Position, source: SourceId) -> Self {
        Span {
            start: at,
            end: at,
            source,
        }
    }

    /// Check if the span covers no text.
    ///
    /// True for point spans and for [`Span::EMPTY`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if a position is within this span.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if another span is fully contained within this span.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Merge two spans to create one covering both.
    ///
    /// Takes the earlier start, the later end, and the smaller source id, which
    /// keeps the operation commutative and associative even across sources.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            source: self.source.min(other.source),
        }
    }

    /// Fold a sequence of spans with [`Span::merge`], starting from
    /// [`Span::EMPTY`].
    #[must_use]
    pub fn merge_all(spans: impl IntoIterator<Item = Span>) -> Span {
        spans.into_iter().fold(Span::EMPTY, Span::merge)
    }

    /// Span covering every item, [`Span::EMPTY`] when there are none.
    #[must_use]
    pub fn covering<'a, S: Spanned + 'a>(items: impl IntoIterator<Item = &'a S>) -> Span {
        Span::merge_all(items.into_iter().map(Spanned::span))
    }

    /// Point span at the end of this span.
    #[inline]
    #[must_use]
    pub const fn end_point(self) -> Span {
        Span::point(self.end, self.source)
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::EMPTY
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Span::EMPTY {
            return write!(f, "<empty>");
        }
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

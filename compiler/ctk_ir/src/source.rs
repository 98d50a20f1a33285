//! Source units and their ids.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Position, Span};

/// Handle of a source unit, assigned by whoever owns the sources.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SourceId(u32);

impl SourceId {
    /// Marks spans that point into no source.
    ///
    /// Sorts after every real id, so [`Span::merge`] keeps the attached source.
    pub const DETACHED: SourceId = SourceId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        SourceId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_detached(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            write!(f, "SourceId::DETACHED")
        } else {
            write!(f, "SourceId({})", self.0)
        }
    }
}

/// A source file (or in-memory snippet) handed to the lexer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    name: String,
    path: Option<PathBuf>,
    contents: String,
}

impl Source {
    pub fn new(contents: impl Into<String>) -> Self {
        Source {
            name: String::new(),
            path: None,
            contents: contents.into(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Text of a 1-based line, without its terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.contents.lines().nth(index)
    }

    /// Text covered by a single-line span. Columns are 0-based character
    /// offsets into the line.
    pub fn snippet(&self, span: Span) -> Option<&str> {
        if span.start.line != span.end.line || span.end < span.start {
            return None;
        }
        let line = self.line(span.start.line)?;
        let start = char_to_byte(line, span.start.column)?;
        let end = char_to_byte(line, span.end.column)?;
        line.get(start..end)
    }

    /// Position just past the last character of the source.
    pub fn end_position(&self) -> Position {
        let mut line = 1u32;
        let mut column = 0u32;
        for ch in self.contents.chars() {
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Position::new(line, column)
    }
}

fn char_to_byte(line: &str, column: u32) -> Option<usize> {
    let column = usize::try_from(column).ok()?;
    if column == line.chars().count() {
        return Some(line.len());
    }
    line.char_indices().nth(column).map(|(byte, _)| byte)
}

#[cfg(test)]
mod tests;

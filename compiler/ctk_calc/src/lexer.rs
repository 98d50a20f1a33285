//! Lexer for the calculator using logos.

use logos::Logos;

use ctk_diagnostic::{Diagnostic, ErrorCode};
use ctk_ir::{Position, Source, SourceId, Span, Token, TokenKind};

pub const NUMBER: TokenKind = TokenKind::new("Number");
pub const KEYWORD: TokenKind = TokenKind::new("Keyword");
pub const PLUS: TokenKind = TokenKind::new("Plus");
pub const MINUS: TokenKind = TokenKind::new("Minus");
pub const STAR: TokenKind = TokenKind::new("Star");
pub const COMMA: TokenKind = TokenKind::new("Comma");

/// Produced by every expression rule.
pub const EXPRESSION: TokenKind = TokenKind::new("Expression");

/// Raw token from logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"\s+")]
enum RawToken {
    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Keyword,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token(",")]
    Comma,
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::Number => NUMBER,
            RawToken::Keyword => KEYWORD,
            RawToken::Plus => PLUS,
            RawToken::Minus => MINUS,
            RawToken::Star => STAR,
            RawToken::Comma => COMMA,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{text}`")]
    UnexpectedCharacter { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::E0001)
            .with_message(self.to_string())
            .with_label(self.span(), "not a number, keyword or operator")
    }
}

/// Lex `source` into leaf tokens. Every token carries its source text.
///
/// Whitespace is skipped. Spans use 1-based lines and 0-based character
/// columns.
pub fn lex(source: &Source, id: SourceId) -> Result<Vec<Token<String>>, LexError> {
    let text = source.contents();
    let lines = LineIndex::new(text);
    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(text);

    while let Some(result) = logos.next() {
        let range = logos.span();
        let span = Span::new(
            lines.position(text, range.start),
            lines.position(text, range.end),
            id,
        );
        let slice = logos.slice();

        match result {
            Ok(raw) => tokens.push(Token::leaf(raw.kind(), slice.to_owned(), span)),
            Err(()) => {
                return Err(LexError::UnexpectedCharacter {
                    text: slice.to_owned(),
                    span,
                })
            }
        }
    }

    tracing::trace!(tokens = tokens.len(), "lexed");
    Ok(tokens)
}

/// Byte offsets of line starts, for byte-to-position conversion.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { starts }
    }

    fn position(&self, text: &str, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts.get(line.saturating_sub(1)).copied().unwrap_or(0);
        let column = text.get(line_start..offset).map_or(0, |s| s.chars().count());
        Position::new(
            u32::try_from(line).unwrap_or(u32::MAX),
            u32::try_from(column).unwrap_or(u32::MAX),
        )
    }
}

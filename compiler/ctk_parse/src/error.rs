//! Reduction error types.

use ctk_diagnostic::{Diagnostic, ErrorCode};
use ctk_ir::Span;

/// Raised by a node constructor that cannot be built from its window.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("pattern has no slot named `{slot}`")]
    UnknownSlot { slot: &'static str },

    #[error("slot `{slot}` does not hold a node")]
    ExpectedNode { slot: &'static str, span: Span },

    #[error("slot `{slot}` does not hold a value")]
    ExpectedLeaf { slot: &'static str, span: Span },

    /// Reported by the constructor itself, e.g. a literal out of range.
    #[error("{message}")]
    Invalid { message: String, span: Span },
}

impl BuildError {
    pub fn invalid(message: impl Into<String>, span: Span) -> Self {
        BuildError::Invalid {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            BuildError::UnknownSlot { .. } => None,
            BuildError::ExpectedNode { span, .. }
            | BuildError::ExpectedLeaf { span, .. }
            | BuildError::Invalid { span, .. } => Some(*span),
        }
    }
}

/// A reduction that could not complete.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    #[error("sub-parses nested deeper than {depth} levels")]
    NestingTooDeep { depth: usize, span: Span },

    #[error("cannot build `{rule}`: {source}")]
    Build {
        rule: &'static str,
        span: Span,
        source: BuildError,
    },

    /// Single-token rules kept rewriting the same token without end.
    #[error("rule `{rule}` keeps reducing a single token in a cycle")]
    CyclicUnitRules { rule: &'static str, span: Span },

    /// A token in the window wraps a node the tree does not hold, or one
    /// another node already consumed.
    #[error("rule `{rule}` matched a node that is not an unconsumed node of this tree")]
    ForeignNode { rule: &'static str, span: Span },
}

impl ReduceError {
    pub fn span(&self) -> Span {
        match self {
            ReduceError::NestingTooDeep { span, .. }
            | ReduceError::Build { span, .. }
            | ReduceError::CyclicUnitRules { span, .. }
            | ReduceError::ForeignNode { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReduceError::NestingTooDeep { .. } => ErrorCode::E1002,
            ReduceError::Build { .. } => ErrorCode::E1003,
            ReduceError::CyclicUnitRules { .. } => ErrorCode::E1004,
            ReduceError::ForeignNode { .. } => ErrorCode::E1005,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            ReduceError::NestingTooDeep { span, .. } => diag
                .with_label(*span, "nested too deeply here")
                .with_note("raise `ParserConfig::max_depth` or simplify the input"),
            ReduceError::Build { span, source, .. } => {
                let diag = diag.with_label(*span, "matched here");
                match source.span() {
                    Some(inner) if inner != *span => diag.with_secondary_label(inner, "this token"),
                    _ => diag,
                }
            }
            ReduceError::CyclicUnitRules { span, .. } => diag
                .with_label(*span, "reduced repeatedly here")
                .with_note("a rule consuming one token should not produce a kind it also accepts"),
            ReduceError::ForeignNode { span, .. } => diag
                .with_label(*span, "this token")
                .with_note("reduce tokens into the tree they were produced with"),
        }
    }
}

/// Tokens a full pass left unreduced.
///
/// The reducer never raises this itself; [`ParseOutput`](crate::ParseOutput)
/// reports it when the caller asks for a single root.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.spans))]
pub struct LeftoverTokens {
    pub spans: Vec<Span>,
}

fn describe(spans: &[Span]) -> String {
    match spans.len() {
        0 => "nothing to reduce".to_owned(),
        1 => "1 token left unreduced".to_owned(),
        n => format!("{n} tokens left unreduced"),
    }
}

impl LeftoverTokens {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E1001
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.to_string());
        let mut spans = self.spans.iter();
        if let Some(first) = spans.next() {
            diag = diag.with_label(*first, "no rule reduces this token");
        }
        for span in spans {
            diag = diag.with_secondary_label(*span, "also unreduced");
        }
        diag
    }
}

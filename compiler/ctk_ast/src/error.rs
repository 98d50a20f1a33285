//! Grammar-definition and step-execution errors.

use ctk_diagnostic::{Diagnostic, ErrorCode};
use ctk_ir::Span;

/// A node type or rule that can never be used until its definition is fixed.
///
/// Raised when a type is registered, before any instance exists.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("node type `{node}` does not implement compilation step(s): {}", .missing.join(", "))]
    MissingSteps {
        node: &'static str,
        missing: Vec<&'static str>,
    },

    #[error("node type `{node}` implements `{step}`, which no ancestor declares")]
    UnknownStep {
        node: &'static str,
        step: &'static str,
    },

    #[error("compilation step `{step}` is declared by both `{first}` and `{second}`")]
    DuplicateStep {
        step: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("node type `{node}` is abstract and cannot be instantiated")]
    AbstractType { node: &'static str },

    #[error("rule for `{node}` has no slots")]
    EmptyPattern { node: &'static str },
}

impl GrammarError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GrammarError::MissingSteps { .. } => ErrorCode::E2001,
            GrammarError::UnknownStep { .. } => ErrorCode::E2002,
            GrammarError::DuplicateStep { .. } => ErrorCode::E2003,
            GrammarError::AbstractType { .. } => ErrorCode::E2004,
            GrammarError::EmptyPattern { .. } => ErrorCode::E2005,
        }
    }

    /// Grammar errors concern definitions, not source text, so the
    /// diagnostic carries notes instead of span labels.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            GrammarError::MissingSteps { missing, .. } => missing.iter().fold(diag, |d, step| {
                d.with_note(format!("add an implementation of `{step}` to the step table"))
            }),
            GrammarError::UnknownStep { step, .. } => {
                diag.with_note(format!("declare `{step}` on an ancestor or remove it"))
            }
            GrammarError::DuplicateStep { .. } => {
                diag.with_note("a step may be declared once per hierarchy")
            }
            GrammarError::AbstractType { .. } => {
                diag.with_note("only concrete node types can produce nodes")
            }
            GrammarError::EmptyPattern { .. } => {
                diag.with_note("a rule has to consume at least one token")
            }
        }
    }
}

/// An error raised while running a compilation step.
///
/// Terminal for the invocation that raised it; callers decide whether to
/// continue with other top-level units.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// Reported by a step implementation.
    #[error("{message}")]
    Failed { message: String, spans: Vec<Span> },

    /// The step was run on a node whose type does not require it.
    #[error("compilation step `{step}` is not scheduled for node type `{node}`")]
    NotScheduled {
        node: &'static str,
        step: &'static str,
        span: Span,
    },
}

impl StepError {
    /// A step failure at one span.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        StepError::Failed {
            message: message.into(),
            spans: vec![span],
        }
    }

    /// Attach a related span.
    #[must_use]
    pub fn with_span(mut self, extra: Span) -> Self {
        if let StepError::Failed { spans, .. } = &mut self {
            spans.push(extra);
        }
        self
    }

    pub fn spans(&self) -> &[Span] {
        match self {
            StepError::Failed { spans, .. } => spans,
            StepError::NotScheduled { span, .. } => std::slice::from_ref(span),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StepError::Failed { .. } => ErrorCode::E3001,
            StepError::NotScheduled { .. } => ErrorCode::E3002,
        }
    }

    /// The first span is the primary label, the rest are secondary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.to_string());
        let mut spans = self.spans().iter();
        if let Some(primary) = spans.next() {
            diag = diag.with_label(*primary, "raised here");
        }
        for related in spans {
            diag = diag.with_secondary_label(*related, "related");
        }
        diag
    }
}

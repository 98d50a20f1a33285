use std::fmt;

/// Error codes for all toolkit diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors (grammar crates)
/// - E1xxx: Reduction errors
/// - E2xxx: Grammar definition errors
/// - E3xxx: Compilation step errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Invalid character in source
    E0001,

    // Reduction Errors (E1xxx)
    /// Tokens left un-reduced after a full pass
    E1001,
    /// Sub-parse nesting exceeded the configured depth
    E1002,
    /// Node constructor rejected a matched window
    E1003,
    /// Single-token rules keep re-reducing the same token
    E1004,
    /// Window wraps a node the arena does not hold, or one already consumed
    E1005,

    // Grammar Definition Errors (E2xxx)
    /// Concrete node type is missing a compilation step
    E2001,
    /// Node type implements a step no ancestor declares
    E2002,
    /// Step name declared twice along a node type's ancestry
    E2003,
    /// Abstract node type registered as a production
    E2004,
    /// Rule pattern consumes no tokens
    E2005,

    // Compilation Step Errors (E3xxx)
    /// Step implementation reported an error
    E3001,
    /// Step run on a node type that does not require it
    E3002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
        }
    }

    pub fn is_reduction_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_grammar_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_step_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(format!("{}", ErrorCode::E2003), "E2003");
    }

    #[test]
    fn test_error_code_phases() {
        assert!(ErrorCode::E1002.is_reduction_error());
        assert!(ErrorCode::E2001.is_grammar_error());
        assert!(ErrorCode::E3001.is_step_error());
        assert!(!ErrorCode::E0001.is_reduction_error());
    }
}

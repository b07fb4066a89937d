//! Error types for the Ember assembler.

use thiserror::Error;

/// Errors produced while assembling IR text into a package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A required token was missing or of the wrong kind.
    #[error("line {line}: expected {expected}, found {found}")]
    Expected {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// A numeric literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A string literal ran to the end of the line.
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },

    /// An unrecognized type name.
    #[error("line {line}: unknown type '{token}'")]
    UnknownType { line: usize, token: String },

    /// An unrecognized instruction mnemonic.
    #[error("line {line}: unknown instruction '{token}'")]
    UnknownInstruction { line: usize, token: String },

    /// The text does not start with a `package` line.
    #[error("missing package declaration")]
    MissingPackage,

    /// A second `package` line.
    #[error("line {line}: package already declared")]
    DuplicatePackage { line: usize },

    /// Block labels must count up from `bb0`.
    #[error("line {line}: expected label bb{expected}, found bb{found}")]
    BlockOrder {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A block label or `end` before the previous block's terminator.
    #[error("line {line}: block bb{block} has no terminator")]
    UnterminatedBlock { line: usize, block: usize },

    /// An instruction line with no open block to hold it.
    #[error("line {line}: instruction outside a block")]
    OutsideBlock { line: usize },

    /// A `local` declaration after the first block label.
    #[error("line {line}: locals must be declared before the first block")]
    LateLocal { line: usize },

    /// A function still open at the end of the text.
    #[error("function '{name}' is missing 'end'")]
    UnclosedFunction { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unexpected_token() {
        let e = AsmError::UnexpectedToken {
            line: 4,
            token: ")".to_string(),
        };
        assert_eq!(e.to_string(), "line 4: unexpected token ')'");
    }

    #[test]
    fn error_display_expected() {
        let e = AsmError::Expected {
            line: 7,
            expected: "slot",
            found: "end of line".to_string(),
        };
        assert_eq!(e.to_string(), "line 7: expected slot, found end of line");
    }

    #[test]
    fn error_display_block_order() {
        let e = AsmError::BlockOrder {
            line: 9,
            expected: 1,
            found: 3,
        };
        assert_eq!(e.to_string(), "line 9: expected label bb1, found bb3");
    }

    #[test]
    fn error_display_unknown_type() {
        let e = AsmError::UnknownType {
            line: 2,
            token: "integer".to_string(),
        };
        assert_eq!(e.to_string(), "line 2: unknown type 'integer'");
    }

    #[test]
    fn error_display_unclosed_function() {
        let e = AsmError::UnclosedFunction {
            name: "main".to_string(),
        };
        assert_eq!(e.to_string(), "function 'main' is missing 'end'");
    }
}

//! Parse errors for textual forms of common types.

use thiserror::Error;

/// Errors from parsing type names and literal text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not name a known type kind.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// The text is not a decimal literal of the form `[+-]digits[.digits][e[+-]digits]`.
    #[error("invalid decimal literal '{0}'")]
    InvalidDecimal(String),
}

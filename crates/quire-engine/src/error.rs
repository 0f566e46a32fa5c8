//! Error types for formula evaluation.

use thiserror::Error;

/// Why a formula could not be evaluated.
///
/// These never reach spreadsheet users directly: [`crate::evaluate`] turns
/// every variant into the `#ERROR` marker.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Empty expression")]
    Empty,

    #[error("Unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("Unexpected {found} at offset {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result is not a finite number")]
    NonFinite,
}

pub type Result<T> = std::result::Result<T, FormulaError>;

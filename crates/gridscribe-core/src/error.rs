//! Error types for gridscribe-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridscribe-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Address does not match the letters-then-digits grammar
    #[error("Invalid cell reference format: {0}")]
    InvalidFormat(String),

    /// Row number is below 1 or past the last sheet row
    #[error("Invalid row number: {0}")]
    InvalidRow(String),

    /// Column letters are past the last sheet column
    #[error("Invalid column: {0}")]
    InvalidColumn(String),

    /// Row or column index argument is outside the sheet
    #[error("Invalid {axis} index: {index}")]
    InvalidIndex { axis: &'static str, index: u64 },

    /// Numeric argument could not be parsed
    #[error("Invalid number: {0}")]
    NumberParse(String),
}

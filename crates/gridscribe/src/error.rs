//! Error types for the gridscribe facade
//!
//! Directive failures are never errors here; they are reported per directive
//! in [`InterpretReport`](crate::InterpretReport). These errors cover the
//! collaborators around interpretation: the text generator and the store.

use thiserror::Error;

/// Result type alias using [`InterpretError`]
pub type InterpretResult<T> = std::result::Result<T, InterpretError>;

/// Errors from loading, generating or saving around an interpretation run
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The text generator did not return a response
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Reading or writing a CSV grid failed
    #[error(transparent)]
    Csv(#[from] gridscribe_csv::CsvError),

    /// Core error
    #[error(transparent)]
    Core(#[from] gridscribe_core::Error),

    /// File extension has no store
    #[error("Unsupported file format: {0}")]
    Unsupported(String),
}

/// Failure reported by a [`TextGenerator`](crate::TextGenerator)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Text generator failed: {message}")]
pub struct GeneratorError {
    message: String,
}

impl GeneratorError {
    /// Create a generator error with a message
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

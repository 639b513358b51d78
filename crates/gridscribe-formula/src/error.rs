//! Formula error types

use crate::ast::BinaryOperator;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur during formula parsing or evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Operator needs numbers but an operand resolved to something else
    #[error("Cannot perform {} on non-numeric values: {left} {} {right}", .op.name(), .op.symbol())]
    NonNumericOperand {
        op: BinaryOperator,
        left: String,
        right: String,
    },

    /// Divisor resolved to exactly zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Formula text does not have the single-operator shape
    #[error("Malformed formula '{formula}': {reason}")]
    MalformedExpression { formula: String, reason: String },

    /// A formula cell was reached again while it was still being evaluated
    #[error("Circular reference detected at {0}")]
    CyclicReference(String),

    /// Chain of formula cells nested deeper than the configured limit
    #[error("Formula references nested deeper than {0} levels")]
    DepthExceeded(usize),

    /// Operand looked like a reference but is not a valid address
    #[error(transparent)]
    Address(#[from] gridscribe_core::Error),
}

impl FormulaError {
    pub(crate) fn malformed(formula: &str, reason: impl Into<String>) -> Self {
        FormulaError::MalformedExpression {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

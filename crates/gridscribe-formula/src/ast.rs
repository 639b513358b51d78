//! Formula expression types

use std::fmt;

/// Parsed formula
///
/// Operand tokens are kept as trimmed text; whether a token is a cell
/// reference or a literal is decided when it is resolved against a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// A lone operand, returned as resolved
    Operand(String),

    /// Two operands joined by an operator
    BinaryOp {
        op: BinaryOperator,
        left: String,
        right: String,
    },
}

impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Operand(token) => write!(f, "{}", token),
            FormulaExpr::BinaryOp { op, left, right } => {
                write!(f, "{}{}{}", left, op.symbol(), right)
            }
        }
    }
}

/// Binary operators, listed in detection priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+` (sum, or concatenation when an operand is not numeric)
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl BinaryOperator {
    /// Operators in the order they are looked for
    pub const PRIORITY: [BinaryOperator; 4] = [
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
    ];

    /// Get the operator character
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    /// Get the operation name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "addition",
            BinaryOperator::Subtract => "subtraction",
            BinaryOperator::Multiply => "multiplication",
            BinaryOperator::Divide => "division",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

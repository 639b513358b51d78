//! Formula parser
//!
//! A formula is at most one binary operation. Operators are looked for in a
//! fixed priority (`+`, `-`, `*`, `/`) and the first operator present splits
//! the text at its first occurrence. A `-` in the first position is a sign,
//! not an operator.

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};

/// Parse formula text into an expression
///
/// A single leading `=` is optional. Surrounding whitespace on the formula
/// and on each operand is ignored.
///
/// # Examples
/// ```
/// use gridscribe_formula::{parse_formula, BinaryOperator, FormulaExpr};
///
/// let expr = parse_formula("=B1 + C1").unwrap();
/// assert_eq!(
///     expr,
///     FormulaExpr::BinaryOp {
///         op: BinaryOperator::Add,
///         left: "B1".into(),
///         right: "C1".into(),
///     }
/// );
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let trimmed = formula.trim();
    let body = trimmed.strip_prefix('=').unwrap_or(trimmed).trim();

    if body.is_empty() {
        return Err(FormulaError::malformed(formula, "empty formula"));
    }

    for op in BinaryOperator::PRIORITY {
        let Some(pos) = find_operator(body, op) else {
            continue;
        };

        let left = body[..pos].trim();
        let right = body[pos + 1..].trim();

        if left.is_empty() || right.is_empty() {
            return Err(FormulaError::malformed(
                formula,
                format!("missing operand for '{}'", op),
            ));
        }

        // A second `-` may still be a sign on the right operand
        if op != BinaryOperator::Subtract && right.contains(op.symbol()) {
            return Err(FormulaError::malformed(
                formula,
                format!("expected exactly two operands for '{}'", op),
            ));
        }

        return Ok(FormulaExpr::BinaryOp {
            op,
            left: left.to_string(),
            right: right.to_string(),
        });
    }

    Ok(FormulaExpr::Operand(body.to_string()))
}

/// Byte offset of the first occurrence of `op` that acts as an operator
fn find_operator(body: &str, op: BinaryOperator) -> Option<usize> {
    match op {
        BinaryOperator::Subtract => body
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i),
        _ => body.find(op.symbol()),
    }
}

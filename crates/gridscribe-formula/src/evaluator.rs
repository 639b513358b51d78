//! Formula evaluator
//!
//! Evaluates parsed formulas against a grid. Operands that look like cell
//! references are read from the grid; everything else is a literal.

use crate::ast::{BinaryOperator, FormulaExpr};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_formula;
use ahash::AHashSet;
use gridscribe_core::{format_number, try_parse_number, CellAddress, CellError, CellValue, Grid};
use std::fmt;
use tracing::trace;

/// Default limit on how many formula cells a reference chain may pass through
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Error(CellError),
    Empty,
}

impl FormulaValue {
    /// Resolve a literal token: a number if it parses as one, else the raw text
    pub fn literal(token: &str) -> Self {
        match try_parse_number(token) {
            Some(n) => FormulaValue::Number(n),
            None => FormulaValue::String(token.to_string()),
        }
    }

    /// Convert to number, if possible
    ///
    /// Blank text and empty cells count as zero. Booleans and errors are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::String(s) if s.trim().is_empty() => Some(0.0),
            FormulaValue::String(s) => try_parse_number(s),
            FormulaValue::Empty => Some(0.0),
            FormulaValue::Boolean(_) | FormulaValue::Error(_) => None,
        }
    }

    /// Convert to string
    pub fn as_string(&self) -> String {
        match self {
            FormulaValue::Number(n) => format_number(*n),
            FormulaValue::String(s) => s.clone(),
            FormulaValue::Boolean(true) => "TRUE".to_string(),
            FormulaValue::Boolean(false) => "FALSE".to_string(),
            FormulaValue::Error(e) => e.to_string(),
            FormulaValue::Empty => String::new(),
        }
    }
}

impl fmt::Display for FormulaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl From<CellValue> for FormulaValue {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => FormulaValue::Empty,
            CellValue::Number(n) => FormulaValue::Number(n),
            CellValue::String(s) => FormulaValue::String(s),
            CellValue::Boolean(b) => FormulaValue::Boolean(b),
            CellValue::Error(e) => FormulaValue::Error(e),
            // Unevaluated text; the evaluator resolves formula cells itself
            CellValue::Formula(text) => FormulaValue::String(text),
        }
    }
}

impl From<FormulaValue> for CellValue {
    fn from(value: FormulaValue) -> Self {
        match value {
            FormulaValue::Number(n) => CellValue::Number(n),
            FormulaValue::String(s) => CellValue::String(s),
            FormulaValue::Boolean(b) => CellValue::Boolean(b),
            FormulaValue::Error(e) => CellValue::Error(e),
            FormulaValue::Empty => CellValue::Empty,
        }
    }
}

/// Context for formula evaluation
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Grid that cell references are read from
    pub grid: &'a Grid,
    /// Maximum number of nested formula cells followed for one evaluation
    pub max_depth: usize,
}

impl<'a> EvaluationContext<'a> {
    /// Create a context over a grid with the default depth limit
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Evaluate a parsed formula
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Resolver::new(ctx).evaluate(expr)
}

/// Parse and evaluate formula text
pub fn evaluate_formula(formula: &str, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let expr = parse_formula(formula)?;
    evaluate(&expr, ctx)
}

/// Tracks the formula cells currently being evaluated
struct Resolver<'c, 'a> {
    ctx: &'c EvaluationContext<'a>,
    visiting: AHashSet<CellAddress>,
}

impl<'c, 'a> Resolver<'c, 'a> {
    fn new(ctx: &'c EvaluationContext<'a>) -> Self {
        Self {
            ctx,
            visiting: AHashSet::new(),
        }
    }

    fn evaluate(&mut self, expr: &FormulaExpr) -> FormulaResult<FormulaValue> {
        match expr {
            FormulaExpr::Operand(token) => self.resolve(token),
            FormulaExpr::BinaryOp { op, left, right } => {
                let left_val = self.resolve(left)?;
                let right_val = self.resolve(right)?;
                evaluate_binary_op(*op, left_val, right_val)
            }
        }
    }

    fn resolve(&mut self, token: &str) -> FormulaResult<FormulaValue> {
        if !CellAddress::is_address(token) {
            return Ok(FormulaValue::literal(token));
        }

        let addr = CellAddress::parse(token)?;
        match self.ctx.grid.get(addr.row, addr.col) {
            Some(CellValue::Formula(text)) => self.resolve_formula_cell(addr, text),
            Some(value) => Ok(value.clone().into()),
            None => {
                trace!(cell = %addr, "reference to blank cell");
                Ok(FormulaValue::Empty)
            }
        }
    }

    fn resolve_formula_cell(&mut self, addr: CellAddress, text: &str) -> FormulaResult<FormulaValue> {
        if self.visiting.contains(&addr) {
            return Err(FormulaError::CyclicReference(addr.to_string()));
        }
        if self.visiting.len() >= self.ctx.max_depth {
            return Err(FormulaError::DepthExceeded(self.ctx.max_depth));
        }

        trace!(cell = %addr, formula = text, "evaluating referenced formula cell");
        self.visiting.insert(addr);
        let result = parse_formula(text).and_then(|expr| self.evaluate(&expr));
        self.visiting.remove(&addr);
        result
    }
}

fn evaluate_binary_op(
    op: BinaryOperator,
    left: FormulaValue,
    right: FormulaValue,
) -> FormulaResult<FormulaValue> {
    // Error cells are not numbers: `+` joins their codes as text, the rest fail
    if op == BinaryOperator::Add {
        return Ok(match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => FormulaValue::Number(l + r),
            _ => FormulaValue::String(format!("{}{}", left.as_string(), right.as_string())),
        });
    }

    let (l, r) = match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => (l, r),
        _ => {
            return Err(FormulaError::NonNumericOperand {
                op,
                left: left.as_string(),
                right: right.as_string(),
            })
        }
    };

    let value = match op {
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide if r == 0.0 => return Err(FormulaError::DivisionByZero),
        BinaryOperator::Divide => l / r,
        BinaryOperator::Add => l + r,
    };
    Ok(FormulaValue::Number(value))
}

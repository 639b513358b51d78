//! # gridscribe-formula
//!
//! Formula parser and evaluator for gridscribe.
//!
//! Formulas are deliberately small: a single operand, or two operands joined
//! by one of `+`, `-`, `*` or `/`. Operands are either cell references
//! (`B1`) or literals (`10`, `Hello`).
//!
//! This crate provides:
//! - Formula parsing (text → [`FormulaExpr`])
//! - Formula evaluation against a [`Grid`](gridscribe_core::Grid), following
//!   references into other formula cells with cycle detection
//!
//! ## Example
//!
//! ```rust
//! use gridscribe_core::Grid;
//! use gridscribe_formula::{evaluate_formula, EvaluationContext, FormulaValue};
//!
//! let mut grid = Grid::new();
//! grid.set_value("B1", 10.0).unwrap();
//! grid.set_value("C1", 20.0).unwrap();
//!
//! let ctx = EvaluationContext::new(&grid);
//! assert_eq!(evaluate_formula("=B1+C1", &ctx).unwrap(), FormulaValue::Number(30.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_formula, EvaluationContext, FormulaValue, DEFAULT_MAX_DEPTH};
pub use parser::parse_formula;

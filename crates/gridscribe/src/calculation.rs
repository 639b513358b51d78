//! Whole-grid calculation
//!
//! Replaces every formula text cell in a grid with its evaluated value, the
//! way a finished edit is usually saved.
//!
//! # Example
//!
//! ```rust
//! use gridscribe::prelude::*;
//!
//! let mut grid = Grid::new();
//! grid.set_value("A1", 10.0).unwrap();
//! grid.set_value("A2", 20.0).unwrap();
//! grid.set_value("A3", CellValue::formula("=A1+A2")).unwrap();
//!
//! let stats = grid.calculate();
//! assert_eq!(stats.cells_calculated, 1);
//! assert_eq!(grid.value("A3").unwrap(), CellValue::Number(30.0));
//! ```

use crate::{evaluate_formula, CellAddress, EvaluationContext, FormulaError, FormulaResult, FormulaValue, Grid};
use gridscribe_formula::DEFAULT_MAX_DEPTH;
use tracing::{debug, warn};

/// Options for grid calculation
#[derive(Debug, Clone)]
pub struct CalculationOptions {
    /// Maximum number of nested formula cells followed per formula
    pub max_formula_depth: usize,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            max_formula_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Statistics from a calculation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationStats {
    /// Total number of formula cells
    pub formula_count: usize,
    /// Number of cells replaced by their value
    pub cells_calculated: usize,
    /// Number of cells that kept their formula because evaluation failed
    pub errors: usize,
    /// Number of failures caused by circular references
    pub circular_references: usize,
}

/// Extension trait adding calculation to [`Grid`]
pub trait GridCalculationExt {
    /// Calculate all formula cells with default options
    fn calculate(&mut self) -> CalculationStats;

    /// Calculate all formula cells
    ///
    /// Every formula is evaluated against the grid as it was before the
    /// call, then all values are written at once.
    fn calculate_with_options(&mut self, options: &CalculationOptions) -> CalculationStats;
}

impl GridCalculationExt for Grid {
    fn calculate(&mut self) -> CalculationStats {
        self.calculate_with_options(&CalculationOptions::default())
    }

    fn calculate_with_options(&mut self, options: &CalculationOptions) -> CalculationStats {
        let mut stats = CalculationStats::default();

        let outcomes: Vec<(CellAddress, FormulaResult<FormulaValue>)> = {
            let ctx = EvaluationContext::new(self).with_max_depth(options.max_formula_depth);
            self.formula_cells()
                .map(|(row, col, text)| (CellAddress::new(row, col), evaluate_formula(text, &ctx)))
                .collect()
        };
        stats.formula_count = outcomes.len();

        for (addr, outcome) in outcomes {
            match outcome {
                Ok(value) => {
                    self.set(addr.row, addr.col, value.into());
                    stats.cells_calculated += 1;
                }
                Err(err) => {
                    if matches!(err, FormulaError::CyclicReference(_)) {
                        stats.circular_references += 1;
                    }
                    warn!(cell = %addr, error = %err, "formula cell left unevaluated");
                    stats.errors += 1;
                }
            }
        }

        debug!(
            formulas = stats.formula_count,
            calculated = stats.cells_calculated,
            errors = stats.errors,
            "grid calculated"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_calculate_chain() {
        let mut grid = Grid::new();
        grid.set_value("A1", 2.0).unwrap();
        grid.set_value("A2", CellValue::formula("=A1*3")).unwrap();
        grid.set_value("A3", CellValue::formula("=A2+A1")).unwrap();
        grid.set_value("B1", CellValue::formula("=A3/0")).unwrap();

        let stats = grid.calculate();

        assert_eq!(
            stats,
            CalculationStats {
                formula_count: 3,
                cells_calculated: 2,
                errors: 1,
                circular_references: 0,
            }
        );
        assert_eq!(grid.value("A2").unwrap(), CellValue::Number(6.0));
        assert_eq!(grid.value("A3").unwrap(), CellValue::Number(8.0));
        assert_eq!(grid.value("B1").unwrap(), CellValue::formula("=A3/0"));
    }

    #[test]
    fn test_calculate_counts_cycles() {
        let mut grid = Grid::new();
        grid.set_value("A1", CellValue::formula("=B1+1")).unwrap();
        grid.set_value("B1", CellValue::formula("=A1+1")).unwrap();
        grid.set_value("C1", CellValue::formula("=5*5")).unwrap();

        let stats = grid.calculate();

        assert_eq!(stats.circular_references, 2);
        assert_eq!(stats.cells_calculated, 1);
        assert_eq!(grid.value("C1").unwrap(), CellValue::Number(25.0));
        assert_eq!(grid.value("A1").unwrap(), CellValue::formula("=B1+1"));
    }

    #[test]
    fn test_calculate_empty_grid() {
        let mut grid = Grid::new();
        assert_eq!(grid.calculate(), CalculationStats::default());
    }
}

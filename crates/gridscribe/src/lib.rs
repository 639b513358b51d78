//! # gridscribe
//!
//! Apply spreadsheet edits described by generated text to an in-memory grid.
//!
//! A text generator answers an edit request in prose with bracketed
//! directives embedded, such as `[SET_CELL:A1:Total]` or
//! `[APPLY_FORMULA:B4:B1+B2]`. This crate finds those directives, applies them
//! to a [`Grid`] in a fixed phase order and reports one result per directive.
//!
//! ## Features
//!
//! - Directive extraction ([`extract`])
//! - Mutation interpretation with deferred formula evaluation ([`interpret`])
//! - Prompt assembly and a [`TextGenerator`] seam for the round trip
//! - Whole-grid formula calculation ([`GridCalculationExt`])
//! - CSV load/save ([`GridFileExt`])
//!
//! ## Example
//!
//! ```rust
//! use gridscribe::prelude::*;
//!
//! let mut grid = Grid::new();
//! grid.set_value("B1", 10.0).unwrap();
//! grid.set_value("C1", 20.0).unwrap();
//!
//! let response = "Sure. [SET_CELL:D1:Sum] [APPLY_FORMULA:A1:B1+C1]";
//! let report = interpret(&mut grid, response, &InterpretOptions::default());
//!
//! assert_eq!(report.succeeded(), 2);
//! assert_eq!(grid.value("A1").unwrap(), CellValue::Number(30.0));
//!
//! // Save to file
//! // grid.save("output.csv").unwrap();
//! ```

pub mod calculation;
pub mod directive;
pub mod error;
pub mod interpreter;
pub mod prelude;
pub mod prompt;

pub use calculation::{CalculationOptions, CalculationStats, GridCalculationExt};
pub use directive::{extract, Command, CommandKind};
pub use error::{GeneratorError, InterpretError, InterpretResult};
pub use interpreter::{interpret, CommandResult, FormulaTask, InterpretOptions, InterpretReport};
pub use prompt::{directive_guide, edit_with_generator, render_grid, EditOutcome, EditPrompt, TextGenerator};

// Re-export core types
pub use gridscribe_core::{CellAddress, CellError, CellValue, Error, Grid, Result, MAX_COLS, MAX_ROWS};

// Re-export formula types
pub use gridscribe_formula::{
    evaluate, evaluate_formula, parse_formula, EvaluationContext, FormulaError, FormulaExpr,
    FormulaResult, FormulaValue,
};

// Re-export I/O types
pub use gridscribe_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};

use std::path::Path;

/// Extension trait for Grid to add file I/O
pub trait GridFileExt: Sized {
    /// Open a grid from a file
    fn open<P: AsRef<Path>>(path: P) -> InterpretResult<Self>;

    /// Save the grid to a file
    fn save<P: AsRef<Path>>(&self, path: P) -> InterpretResult<()>;
}

impl GridFileExt for Grid {
    fn open<P: AsRef<Path>>(path: P) -> InterpretResult<Grid> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("csv") => Ok(CsvReader::read_file(path, &CsvReadOptions::default())?),
            _ => Err(InterpretError::Unsupported(path.display().to_string())),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> InterpretResult<()> {
        let path = path.as_ref();
        match extension(path).as_deref() {
            Some("csv") => Ok(CsvWriter::write_file(self, path, &CsvWriteOptions::default())?),
            _ => Err(InterpretError::Unsupported(path.display().to_string())),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

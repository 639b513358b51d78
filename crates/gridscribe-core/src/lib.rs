//! # gridscribe-core
//!
//! Core data structures for the gridscribe directive engine.
//!
//! This crate provides the fundamental types used throughout gridscribe:
//! - [`CellValue`] - Represents cell values (numbers, strings, booleans, errors, formula text)
//! - [`CellAddress`] - A1-style cell addressing
//! - [`Grid`] - The sparse sheet that directives edit
//!
//! ## Example
//!
//! ```rust
//! use gridscribe_core::{CellValue, Grid};
//!
//! let mut grid = Grid::new();
//!
//! // Using string addresses
//! grid.set_value("A1", "Hello").unwrap();
//! grid.set_value("B1", 42.0).unwrap();
//!
//! // Or using row/column indices (0-based)
//! grid.set(1, 0, CellValue::string("World"));
//! grid.insert_row(0, vec![CellValue::from("header")]).unwrap();
//!
//! assert_eq!(grid.value("A2").unwrap(), CellValue::string("Hello"));
//! ```

pub mod cell;
pub mod error;
pub mod grid;

// Re-exports for convenience
pub use cell::{
    format_number, parse_bool_literal, try_parse_number, CellAddress, CellError, CellValue,
};
pub use error::{Error, Result};
pub use grid::{Grid, DEFAULT_SHEET_NAME};

/// Maximum number of rows in a grid (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a grid (Excel limit)
pub const MAX_COLS: u16 = 16_384;

//! # gridscribe-csv
//!
//! CSV reader and writer for gridscribe grids.
//!
//! Fields starting with `=` load as formula cells and are written back
//! verbatim, so a grid survives a save/load cycle with its formulas intact.
//!
//! Text cells that would otherwise load as another type (`=B1+C1`, `42`,
//! `TRUE`, `#N/A`, padded or empty text) are written with a leading `'`,
//! which the type-detecting reader strips again.

mod error;
mod options;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use options::{CsvReadOptions, CsvWriteOptions, LineTerminator};
pub use reader::CsvReader;
pub use writer::CsvWriter;

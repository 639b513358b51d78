//! Prelude module - common imports for gridscribe users
//!
//! ```rust
//! use gridscribe::prelude::*;
//! ```

pub use crate::{
    // Calculation types
    CalculationOptions,
    CalculationStats,
    // Cell types
    CellAddress,
    CellError,
    CellValue,
    // Directives
    Command,
    CommandKind,
    CommandResult,
    // I/O types
    CsvReader,
    CsvWriter,
    // Prompt types
    EditPrompt,
    // Error types
    Error,
    // Main types
    Grid,
    // Extension traits
    GridCalculationExt,
    GridFileExt,
    InterpretError,
    InterpretOptions,
    InterpretReport,
    Result,
    TextGenerator,
    // Functions
    extract,
    interpret,
};

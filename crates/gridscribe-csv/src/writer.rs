//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::{CsvWriteOptions, LineTerminator};
use crate::reader::{CsvReader, TEXT_PREFIX};
use gridscribe_core::{CellValue, Grid};
use tracing::debug;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a grid to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        grid: &Grid,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::write(grid, file, options)?;
        debug!(path = %path.display(), rows = grid.row_count(), "wrote csv");
        Ok(())
    }

    /// Write a grid to a writer
    ///
    /// Output is rectangular: every record spans the grid's column count, and
    /// missing cells and rows are written as empty fields.
    pub fn write<W: Write>(grid: &Grid, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .terminator(terminator)
            .from_writer(writer);

        let columns = grid.column_count();
        for row in 0..grid.row_count() {
            let record: Vec<String> = (0..columns)
                .map(|col| field(grid.value_at(row, col as u16)))
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Write a grid to an in-memory CSV string
    pub fn write_string(grid: &Grid, options: &CsvWriteOptions) -> CsvResult<String> {
        let mut buf = Vec::new();
        Self::write(grid, &mut buf, options)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Render a cell as a CSV field
///
/// Text that would load back as another type (or lose padding) gets a `'` prefix.
fn field(value: CellValue) -> String {
    match value {
        CellValue::String(text) => {
            if text.starts_with(TEXT_PREFIX)
                || CsvReader::detect_type(&text) != CellValue::String(text.clone())
            {
                format!("{}{}", TEXT_PREFIX, text)
            } else {
                text
            }
        }
        other => other.to_string(),
    }
}

//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use gridscribe_core::{parse_bool_literal, try_parse_number, CellError, CellValue, Grid, MAX_COLS};
use tracing::debug;

/// Marks a field as literal text
pub(crate) const TEXT_PREFIX: char = '\'';

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a grid named after the file stem
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Grid> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut grid = Self::read(file, options)?;

        if options.sheet_name.is_none() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                grid.set_name(stem);
            }
        }

        debug!(path = %path.display(), rows = grid.row_count(), "loaded csv");
        Ok(grid)
    }

    /// Read CSV from a reader into a grid
    ///
    /// Every record is a grid row; there is no header handling. Records may
    /// have different lengths.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Grid> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid = match &options.sheet_name {
            Some(name) => Grid::with_name(name.as_str()),
            None => Grid::new(),
        };

        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(row_idx).map_err(|_| {
                gridscribe_core::Error::InvalidIndex {
                    axis: "row",
                    index: row_idx as u64,
                }
            })?;

            for (col, field) in record.iter().enumerate() {
                if col >= MAX_COLS as usize {
                    return Err(gridscribe_core::Error::InvalidIndex {
                        axis: "column",
                        index: col as u64,
                    }
                    .into());
                }

                let value = if options.auto_detect_types {
                    Self::detect_type(field)
                } else if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::string(field)
                };

                grid.set(row, col as u16, value);
            }
        }

        Ok(grid)
    }

    /// Detect the type of a field value
    ///
    /// A leading `'` marks the rest of the field as literal text.
    pub(crate) fn detect_type(field: &str) -> CellValue {
        if let Some(text) = field.strip_prefix(TEXT_PREFIX) {
            return CellValue::string(text);
        }

        let field = field.trim();

        if field.is_empty() {
            return CellValue::Empty;
        }

        if field.starts_with('=') {
            return CellValue::formula(field);
        }

        if let Some(e) = CellError::parse(field) {
            return CellValue::Error(e);
        }

        if let Some(b) = parse_bool_literal(field) {
            return CellValue::Boolean(b);
        }

        if let Some(n) = try_parse_number(field) {
            return CellValue::Number(n);
        }

        CellValue::string(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_detects_types() {
        let data = "Name,Score,Passed\nAda, 91.5 ,true\n=B2*2,#DIV/0!,\n";
        let grid = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.value("A1").unwrap(), CellValue::string("Name"));
        assert_eq!(grid.value("B2").unwrap(), CellValue::Number(91.5));
        assert_eq!(grid.value("C2").unwrap(), CellValue::Boolean(true));
        assert_eq!(grid.value("A3").unwrap(), CellValue::formula("=B2*2"));
        assert_eq!(grid.value("B3").unwrap(), CellValue::Error(CellError::Div0));
        assert_eq!(grid.value("C3").unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_read_ragged_rows() {
        let data = "1\n1,2,3\n4,5\n";
        let grid = CsvReader::read(data.as_bytes(), &CsvReadOptions::default()).unwrap();

        assert_eq!(grid.value("C2").unwrap(), CellValue::Number(3.0));
        assert_eq!(grid.value("B3").unwrap(), CellValue::Number(5.0));
    }

    #[test]
    fn test_read_without_type_detection() {
        let options = CsvReadOptions {
            auto_detect_types: false,
            sheet_name: Some("Raw".into()),
            ..Default::default()
        };
        let grid = CsvReader::read("42,true".as_bytes(), &options).unwrap();

        assert_eq!(grid.name(), "Raw");
        assert_eq!(grid.value("A1").unwrap(), CellValue::string("42"));
        assert_eq!(grid.value("B1").unwrap(), CellValue::string("true"));
    }

    #[test]
    fn test_read_file_uses_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.csv");
        std::fs::write(&path, "a;b\n1;2\n").unwrap();

        let options = CsvReadOptions {
            delimiter: b';',
            ..Default::default()
        };
        let grid = CsvReader::read_file(&path, &options).unwrap();

        assert_eq!(grid.name(), "budget");
        assert_eq!(grid.value("B2").unwrap(), CellValue::Number(2.0));
    }
}

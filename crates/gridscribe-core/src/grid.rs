//! Grid type
//!
//! Sparse row-based storage for a single sheet, plus the structural edits
//! (row/column insert and delete) that directives apply to it.
//!
//! Structure: `BTreeMap<row_index, BTreeMap<col_index, CellValue>>`. Only
//! non-empty cells are stored; rows without cells are dropped.

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellValue};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// Default sheet name for new grids
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// A mutable in-memory sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Sheet name
    name: String,
    /// Row index → column map
    rows: BTreeMap<u32, BTreeMap<u16, CellValue>>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self::with_name(DEFAULT_SHEET_NAME)
    }

    /// Create a new empty grid with the given sheet name
    pub fn with_name<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rows: BTreeMap::new(),
        }
    }

    /// Build a grid from dense rows, starting at A1
    ///
    /// # Example
    /// ```
    /// use gridscribe_core::{CellValue, Grid};
    ///
    /// let grid = Grid::from_rows(vec![
    ///     vec![CellValue::from("Name"), CellValue::from("Score")],
    ///     vec![CellValue::from("Ann"), CellValue::from(91.0)],
    /// ]);
    /// assert_eq!(grid.row_count(), 2);
    /// assert_eq!(grid.value_at(1, 1), CellValue::Number(91.0));
    /// ```
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = CellValue>,
    {
        let mut grid = Self::new();
        for (row, cells) in rows.into_iter().enumerate().take(MAX_ROWS as usize) {
            for (col, value) in cells.into_iter().enumerate().take(MAX_COLS as usize) {
                grid.set(row as u32, col as u16, value);
            }
        }
        grid
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell value by row and column indices
    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get cell value by indices, `Empty` when absent
    pub fn value_at(&self, row: u32, col: u16) -> CellValue {
        self.get(row, col).cloned().unwrap_or_default()
    }

    /// Get cell value by address string (e.g., "A1")
    pub fn value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.value_at(addr.row, addr.col))
    }

    /// Set a cell value
    ///
    /// Setting `Empty` removes the cell.
    pub fn set(&mut self, row: u32, col: u16, value: CellValue) {
        if value.is_empty() {
            self.remove(row, col);
        } else {
            self.rows.entry(row).or_default().insert(col, value);
        }
    }

    /// Set a cell value by address string
    pub fn set_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set(addr.row, addr.col, value.into());
        Ok(())
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellValue> {
        let row_map = self.rows.get_mut(&row)?;
        let removed = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        removed
    }

    // === Dimensions ===

    /// Number of rows up to and including the last populated one
    pub fn row_count(&self) -> u32 {
        self.rows.keys().next_back().map_or(0, |&r| r.saturating_add(1))
    }

    /// Number of columns up to and including the last populated one in any row
    pub fn column_count(&self) -> u32 {
        self.rows
            .values()
            .filter_map(|cols| cols.keys().next_back())
            .map(|&c| c as u32 + 1)
            .max()
            .unwrap_or(0)
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all cells in row order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, value)| (row, col, value)))
    }

    /// Iterate over cells in a specific row
    pub fn iter_row(&self, row: u32) -> impl Iterator<Item = (u16, &CellValue)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cols| cols.iter().map(|(&col, value)| (col, value)))
    }

    /// Iterate over formula cells: (row, col, formula text)
    pub fn formula_cells(&self) -> impl Iterator<Item = (u32, u16, &str)> {
        self.iter()
            .filter_map(|(row, col, value)| value.formula_text().map(|text| (row, col, text)))
    }

    // === Structural Edits ===

    /// Insert a row at `index`, shifting that row and every later row down by one
    ///
    /// `cells` populate the new row from column 0; `Empty` entries leave a gap.
    pub fn insert_row(&mut self, index: u32, cells: Vec<CellValue>) -> Result<()> {
        check_row(index)?;
        if cells.len() > MAX_COLS as usize {
            return Err(Error::InvalidIndex {
                axis: "column",
                index: cells.len() as u64,
            });
        }
        // Rows at or past `index` move down one; none may leave the sheet
        let last = self.rows.keys().next_back().copied();
        if last.is_some_and(|r| r >= index && r >= MAX_ROWS - 1) {
            return Err(Error::InvalidIndex {
                axis: "row",
                index: MAX_ROWS as u64,
            });
        }

        let tail = self.rows.split_off(&index);
        self.rows
            .extend(tail.into_iter().map(|(row, cols)| (row + 1, cols)));

        for (col, value) in cells.into_iter().enumerate() {
            self.set(index, col as u16, value);
        }
        Ok(())
    }

    /// Delete the row at `index`, shifting every later row up by one
    ///
    /// Returns whether the row held any cells. Deleting an absent row still
    /// closes the gap it leaves.
    pub fn delete_row(&mut self, index: u32) -> Result<bool> {
        check_row(index)?;

        let existed = self.rows.remove(&index).is_some();
        let tail = self.rows.split_off(&index);
        self.rows
            .extend(tail.into_iter().map(|(row, cols)| (row - 1, cols)));
        Ok(existed)
    }

    /// Insert a column at `index`, shifting cells at or right of it by one
    ///
    /// Row `i` receives `cells[i]` in the new column; rows past the end of
    /// `cells` get an empty cell. Moved cells keep their value unchanged.
    pub fn insert_column(&mut self, index: u16, cells: Vec<CellValue>) -> Result<()> {
        check_col(index as u32)?;
        if cells.len() > MAX_ROWS as usize {
            return Err(Error::InvalidIndex {
                axis: "row",
                index: cells.len() as u64,
            });
        }
        let overflows = self
            .rows
            .values()
            .filter_map(|cols| cols.keys().next_back())
            .any(|&c| c >= index && c >= MAX_COLS - 1);
        if overflows {
            return Err(Error::InvalidIndex {
                axis: "column",
                index: MAX_COLS as u64,
            });
        }

        for cols in self.rows.values_mut() {
            let tail = cols.split_off(&index);
            cols.extend(tail.into_iter().map(|(col, value)| (col + 1, value)));
        }

        for (row, value) in cells.into_iter().enumerate() {
            self.set(row as u32, index, value);
        }
        Ok(())
    }

    /// Delete the column at `index`, shifting cells right of it left by one
    pub fn delete_column(&mut self, index: u16) -> Result<()> {
        check_col(index as u32)?;

        for cols in self.rows.values_mut() {
            cols.remove(&index);
            let tail = cols.split_off(&index);
            cols.extend(tail.into_iter().map(|(col, value)| (col - 1, value)));
        }
        self.rows.retain(|_, cols| !cols.is_empty());
        Ok(())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

fn check_row(index: u32) -> Result<()> {
    if index >= MAX_ROWS {
        return Err(Error::InvalidIndex {
            axis: "row",
            index: index as u64,
        });
    }
    Ok(())
}

fn check_col(index: u32) -> Result<()> {
    if index >= MAX_COLS as u32 {
        return Err(Error::InvalidIndex {
            axis: "column",
            index: index as u64,
        });
    }
    Ok(())
}

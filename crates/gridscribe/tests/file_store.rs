//! Tests for loading and saving grids through the file extension trait

use gridscribe::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_open_apply_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sales.csv");
    std::fs::write(&path, "Item,Price,Qty\nPen,1.5,4\nBook,12,2\n").unwrap();

    let mut grid = Grid::open(&path).unwrap();
    assert_eq!(grid.name(), "sales");

    let report = interpret(
        &mut grid,
        "[INSERT_COLUMN:3:Total] [APPLY_FORMULA:D2:B2*C2] [APPLY_FORMULA:D3:B3*C3]",
        &InterpretOptions::default(),
    );
    assert_eq!(report.failed(), 0);

    let out = dir.path().join("sales-out.csv");
    grid.save(&out).unwrap();

    let saved = std::fs::read_to_string(&out).unwrap();
    assert_eq!(saved, "Item,Price,Qty,Total\nPen,1.5,4,6\nBook,12,2,24\n");
}

#[test]
fn test_formula_cells_survive_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.CSV");

    let mut grid = Grid::with_name("grid");
    grid.set_value("A1", 2.0).unwrap();
    grid.set_value("A2", CellValue::formula("=A1*4")).unwrap();
    grid.save(&path).unwrap();

    let loaded = Grid::open(&path).unwrap();
    assert_eq!(loaded.value("A2").unwrap(), CellValue::formula("=A1*4"));
}

#[test]
fn test_unsupported_extension() {
    let grid = Grid::new();
    let err = grid.save("report.xlsx").unwrap_err();
    assert!(matches!(err, InterpretError::Unsupported(_)));

    assert!(matches!(
        Grid::open("notes.txt"),
        Err(InterpretError::Unsupported(_))
    ));
}

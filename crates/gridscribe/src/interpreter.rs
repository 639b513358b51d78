//! Mutation interpreter
//!
//! Applies extracted directives to a [`Grid`] in phase order. Structural
//! commands run immediately; `APPLY_FORMULA` commands are queued and
//! evaluated once every structural edit has settled. Each directive gets
//! exactly one [`CommandResult`], and a failing directive never stops the
//! ones after it.

use crate::directive::{extract, Command, CommandKind};
use gridscribe_core::{CellAddress, CellValue, Error, Grid, Result, MAX_COLS, MAX_ROWS};
use gridscribe_formula::{evaluate_formula, EvaluationContext, DEFAULT_MAX_DEPTH};
use tracing::{debug, info, warn};

/// Options for interpreting generated text
#[derive(Debug, Clone)]
pub struct InterpretOptions {
    /// Maximum number of nested formula cells followed while evaluating one formula
    pub max_formula_depth: usize,
    /// Whether `SET_CELL` turns `true`/`false` into booleans
    pub infer_booleans: bool,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            max_formula_depth: DEFAULT_MAX_DEPTH,
            infer_booleans: true,
        }
    }
}

/// Outcome of one directive
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandResult {
    pub success: bool,
    pub kind: CommandKind,
    /// Arguments as written, e.g. `A1=Hello`
    pub params: String,
    pub message: String,
}

impl CommandResult {
    fn succeeded(command: &Command, message: String) -> Self {
        Self {
            success: true,
            kind: command.kind(),
            params: command.params(),
            message,
        }
    }

    fn failed(command: &Command, message: String) -> Self {
        Self {
            success: false,
            kind: command.kind(),
            params: command.params(),
            message,
        }
    }
}

/// A formula waiting for structural edits to finish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaTask {
    pub address: CellAddress,
    pub formula: String,
    /// Position of this directive's entry in the result list
    pub result_index: usize,
}

/// Results of one interpretation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpretReport {
    /// One entry per extracted directive, in processing order
    pub results: Vec<CommandResult>,
    /// Number of queued formulas that evaluated and were written
    pub formulas_evaluated: usize,
}

impl InterpretReport {
    /// Number of directives that succeeded
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of directives that failed
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// True when no directive was found
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Failed results only
    pub fn failures(&self) -> impl Iterator<Item = &CommandResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

/// What applying a single command did
enum Applied {
    Done(String),
    Queued(CellAddress, String),
}

/// Extract the directives in `text` and apply them to `grid`
///
/// Never fails: problems are reported per directive in the returned report.
/// Edits are not transactional, so directives that succeeded stay applied
/// even when later ones fail.
///
/// # Example
/// ```
/// use gridscribe::{interpret, InterpretOptions};
/// use gridscribe_core::{CellValue, Grid};
///
/// let mut grid = Grid::new();
/// grid.set_value("B1", 10.0).unwrap();
/// grid.set_value("C1", 20.0).unwrap();
///
/// let report = interpret(&mut grid, "[APPLY_FORMULA:A1:B1+C1]", &InterpretOptions::default());
/// assert!(report.results[0].success);
/// assert_eq!(grid.value("A1").unwrap(), CellValue::Number(30.0));
/// ```
pub fn interpret(grid: &mut Grid, text: &str, options: &InterpretOptions) -> InterpretReport {
    if text.trim().is_empty() {
        warn!("generated text is empty, nothing to apply");
        return InterpretReport::default();
    }

    let commands = extract(text);
    debug!(count = commands.len(), "interpreting directives");

    let mut results = Vec::with_capacity(commands.len());
    let mut queue = Vec::new();

    for command in &commands {
        let result = match apply_command(grid, command, options) {
            Ok(Applied::Done(message)) => {
                info!(kind = %command.kind(), params = %command.params(), "{}", message);
                CommandResult::succeeded(command, message)
            }
            Ok(Applied::Queued(address, formula)) => {
                debug!(cell = %address, formula = %formula, "queued formula");
                queue.push(FormulaTask {
                    address,
                    formula,
                    result_index: results.len(),
                });
                CommandResult::succeeded(
                    command,
                    format!("Formula calculation queued for cell {}", address),
                )
            }
            Err(err) => {
                warn!(kind = %command.kind(), params = %command.params(), error = %err, "directive failed");
                CommandResult::failed(command, err.to_string())
            }
        };
        results.push(result);
    }

    let formulas_evaluated = run_formulas(grid, queue, &mut results, options);

    let report = InterpretReport {
        results,
        formulas_evaluated,
    };
    info!(
        total = report.results.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        formulas = report.formulas_evaluated,
        "interpretation finished"
    );
    report
}

/// Apply one command, returning its success message
///
/// `APPLY_FORMULA` only validates its address here and is queued.
fn apply_command(grid: &mut Grid, command: &Command, options: &InterpretOptions) -> Result<Applied> {
    match command {
        Command::SetCell { address, value } => {
            let addr = CellAddress::parse(address)?;
            let cell = if options.infer_booleans {
                CellValue::infer(value)
            } else {
                CellValue::infer_numeric(value)
            };
            grid.set(addr.row, addr.col, cell);
            Ok(Applied::Done(format!("Successfully set cell {} to {}", address, value)))
        }
        Command::InsertRow { index, values } => {
            let row = parse_row_index(index)?;
            grid.insert_row(row, infer_values(values))?;
            Ok(Applied::Done(format!("Successfully inserted row at {}", row)))
        }
        Command::InsertColumn { index, values } => {
            let col = parse_column_index(index)?;
            grid.insert_column(col, infer_values(values))?;
            Ok(Applied::Done(format!("Successfully inserted column at {}", col)))
        }
        Command::DeleteRow { index } => {
            let row = parse_row_index(index)?;
            if !grid.delete_row(row)? {
                debug!(row, "deleted row had no cells");
            }
            Ok(Applied::Done(format!("Successfully deleted row {}", row)))
        }
        Command::DeleteColumn { index } => {
            let col = parse_column_index(index)?;
            grid.delete_column(col)?;
            Ok(Applied::Done(format!("Successfully deleted column {}", col)))
        }
        Command::ApplyFormula { address, formula } => {
            let addr = CellAddress::parse(address)?;
            Ok(Applied::Queued(addr, formula.clone()))
        }
    }
}

/// Evaluate queued formulas in order, writing values and updating results
fn run_formulas(
    grid: &mut Grid,
    queue: Vec<FormulaTask>,
    results: &mut [CommandResult],
    options: &InterpretOptions,
) -> usize {
    let mut evaluated = 0;

    for task in queue {
        let ctx = EvaluationContext::new(grid).with_max_depth(options.max_formula_depth);
        let outcome = evaluate_formula(&task.formula, &ctx);
        let result = &mut results[task.result_index];

        match outcome {
            Ok(value) => {
                result.message = format!(
                    "Successfully calculated and set result {} to cell {}",
                    value, task.address
                );
                info!(cell = %task.address, formula = %task.formula, value = %value, "formula evaluated");
                grid.set(task.address.row, task.address.col, value.into());
                evaluated += 1;
            }
            Err(err) => {
                warn!(cell = %task.address, formula = %task.formula, error = %err, "formula failed");
                result.success = false;
                result.message = format!("Error processing formula for cell {}: {}", task.address, err);
            }
        }
    }

    evaluated
}

/// Values for inserted rows and columns: trimmed, number else text
fn infer_values(values: &[String]) -> Vec<CellValue> {
    values
        .iter()
        .map(|raw| CellValue::infer_numeric(raw.trim()))
        .collect()
}

fn parse_index(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::NumberParse(raw.to_string()))
}

fn parse_row_index(raw: &str) -> Result<u32> {
    let index = parse_index(raw)?;
    if index >= MAX_ROWS as u64 {
        return Err(Error::InvalidIndex { axis: "row", index });
    }
    Ok(index as u32)
}

fn parse_column_index(raw: &str) -> Result<u16> {
    let index = parse_index(raw)?;
    if index >= MAX_COLS as u64 {
        return Err(Error::InvalidIndex {
            axis: "column",
            index,
        });
    }
    Ok(index as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridscribe_core::CellError;
    use pretty_assertions::assert_eq;

    fn run(grid: &mut Grid, text: &str) -> InterpretReport {
        interpret(grid, text, &InterpretOptions::default())
    }

    #[test]
    fn test_set_cell_inference() {
        let mut grid = Grid::new();
        let report = run(
            &mut grid,
            "[SET_CELL:A1:42] [SET_CELL:B1:TRUE] [SET_CELL:c1:Hello world] [SET_CELL:D1:#N/A]",
        );

        assert_eq!(report.succeeded(), 4);
        assert_eq!(grid.value("A1").unwrap(), CellValue::Number(42.0));
        assert_eq!(grid.value("B1").unwrap(), CellValue::Boolean(true));
        assert_eq!(grid.value("C1").unwrap(), CellValue::string("Hello world"));
        assert_eq!(grid.value("D1").unwrap(), CellValue::string("#N/A"));
        assert_eq!(report.results[2].message, "Successfully set cell c1 to Hello world");
        assert_eq!(report.results[2].params, "c1=Hello world");
    }

    #[test]
    fn test_set_cell_without_boolean_inference() {
        let mut grid = Grid::new();
        let options = InterpretOptions {
            infer_booleans: false,
            ..Default::default()
        };
        interpret(&mut grid, "[SET_CELL:A1:true]", &options);
        assert_eq!(grid.value("A1").unwrap(), CellValue::string("true"));
    }

    #[test]
    fn test_invalid_addresses_fail_locally() {
        let mut grid = Grid::new();
        let report = run(&mut grid, "[SET_CELL:1A:x] [SET_CELL:A0:y] [SET_CELL:B2:z]");

        assert_eq!(report.failed(), 2);
        assert_eq!(
            report.results[0].message,
            "Invalid cell reference format: no column letters in '1A'"
        );
        assert!(!report.results[1].success);
        assert!(report.results[2].success);
        assert_eq!(grid.value("B2").unwrap(), CellValue::string("z"));
    }

    #[test]
    fn test_insert_row_values() {
        let mut grid = Grid::new();
        let report = run(&mut grid, "[INSERT_ROW:0: 5 ,x,,2.5]");

        assert_eq!(report.results[0].message, "Successfully inserted row at 0");
        assert_eq!(grid.value("A1").unwrap(), CellValue::Number(5.0));
        assert_eq!(grid.value("B1").unwrap(), CellValue::string("x"));
        assert_eq!(grid.value("C1").unwrap(), CellValue::string(""));
        assert_eq!(grid.value("D1").unwrap(), CellValue::Number(2.5));
    }

    #[test]
    fn test_insert_column_blanks_rows_past_values() {
        let mut grid = Grid::from_rows(vec![
            vec![CellValue::from("a"), CellValue::from(1.0)],
            vec![CellValue::from("b"), CellValue::formula("=B1*2")],
            vec![CellValue::from("c"), CellValue::Error(CellError::Ref)],
        ]);
        run(&mut grid, "[INSERT_COLUMN:1:x,y]");

        assert_eq!(grid.value("B1").unwrap(), CellValue::string("x"));
        assert_eq!(grid.value("B2").unwrap(), CellValue::string("y"));
        assert_eq!(grid.value("B3").unwrap(), CellValue::Empty);
        assert_eq!(grid.value("C2").unwrap(), CellValue::formula("=B1*2"));
        assert_eq!(grid.value("C3").unwrap(), CellValue::Error(CellError::Ref));
    }

    #[test]
    fn test_delete_column() {
        let mut grid = Grid::from_rows(vec![vec![
            CellValue::from(1.0),
            CellValue::from(2.0),
            CellValue::from(3.0),
        ]]);
        let report = run(&mut grid, "[DELETE_COLUMN:0]");

        assert_eq!(report.results[0].message, "Successfully deleted column 0");
        assert_eq!(grid.value("A1").unwrap(), CellValue::Number(2.0));
        assert_eq!(grid.value("B1").unwrap(), CellValue::Number(3.0));
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn test_index_errors() {
        let mut grid = Grid::new();
        let report = run(
            &mut grid,
            "[DELETE_ROW:1048576] [DELETE_COLUMN:16384] [DELETE_ROW:99999999999999999999999]",
        );

        let messages: Vec<&str> = report.results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid row index: 1048576",
                "Invalid number: 99999999999999999999999",
                "Invalid column index: 16384",
            ]
        );
        assert_eq!(report.failed(), 3);
    }

    #[test]
    fn test_formula_queued_then_evaluated() {
        let mut grid = Grid::new();
        grid.set_value("B1", 10.0).unwrap();
        grid.set_value("C1", 20.0).unwrap();

        let report = run(&mut grid, "[APPLY_FORMULA:A1:B1+C1]");

        assert_eq!(report.formulas_evaluated, 1);
        assert_eq!(
            report.results[0],
            CommandResult {
                success: true,
                kind: CommandKind::ApplyFormula,
                params: "A1=B1+C1".into(),
                message: "Successfully calculated and set result 30 to cell A1".into(),
            }
        );
        assert_eq!(grid.value("A1").unwrap(), CellValue::Number(30.0));
    }

    #[test]
    fn test_formula_sees_structural_edits() {
        // The row insert runs before the formula even though it appears later
        let mut grid = Grid::new();
        grid.set_value("A1", 4.0).unwrap();
        let report = run(&mut grid, "[APPLY_FORMULA:B1:A2*2] [INSERT_ROW:0:7]");

        assert_eq!(grid.value("B1").unwrap(), CellValue::Number(8.0));
        assert_eq!(report.results[0].kind, CommandKind::InsertRow);
        assert_eq!(report.results[1].kind, CommandKind::ApplyFormula);
    }

    #[test]
    fn test_failed_formula_leaves_target() {
        let mut grid = Grid::new();
        grid.set_value("A1", "keep").unwrap();
        let report = run(&mut grid, "[APPLY_FORMULA:A1:10/0]");

        assert_eq!(report.formulas_evaluated, 0);
        assert!(!report.results[0].success);
        assert_eq!(
            report.results[0].message,
            "Error processing formula for cell A1: Division by zero"
        );
        assert_eq!(grid.value("A1").unwrap(), CellValue::string("keep"));
    }

    #[test]
    fn test_error_cell_operands() {
        let mut grid = Grid::new();
        grid.set_value("A1", "keep").unwrap();
        grid.set_value("B1", CellError::Ref).unwrap();
        grid.set_value("C1", 1.0).unwrap();

        let report = run(&mut grid, "[APPLY_FORMULA:A1:B1-C1]");
        assert!(!report.results[0].success);
        assert_eq!(
            report.results[0].message,
            "Error processing formula for cell A1: \
             Cannot perform subtraction on non-numeric values: #REF! - 1"
        );
        assert_eq!(grid.value("A1").unwrap(), CellValue::string("keep"));

        let report = run(&mut grid, "[APPLY_FORMULA:A1:B1+5]");
        assert!(report.results[0].success);
        assert_eq!(grid.value("A1").unwrap(), CellValue::string("#REF!5"));
    }

    #[test]
    fn test_formulas_on_same_cell_keep_own_results() {
        let mut grid = Grid::new();
        let report = run(&mut grid, "[APPLY_FORMULA:A1:1+1] [APPLY_FORMULA:A1:A1*5]");

        assert_eq!(
            report.results[0].message,
            "Successfully calculated and set result 2 to cell A1"
        );
        assert_eq!(
            report.results[1].message,
            "Successfully calculated and set result 10 to cell A1"
        );
        assert_eq!(grid.value("A1").unwrap(), CellValue::Number(10.0));
    }

    #[test]
    fn test_formula_invalid_address_not_queued() {
        let mut grid = Grid::new();
        let report = run(&mut grid, "[APPLY_FORMULA:9Z:1+1]");

        assert_eq!(report.formulas_evaluated, 0);
        assert!(!report.results[0].success);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let mut grid = Grid::new();
        assert!(run(&mut grid, "   \n").is_empty());
        assert!(run(&mut grid, "No directives here.").is_empty());
    }
}

//! Prompt assembly and the text generator seam
//!
//! A generator is asked to answer a user's edit request with bracketed
//! directives. [`EditPrompt`] carries the instructions plus a text snapshot of
//! the grid; [`edit_with_generator`] runs the full round trip.

use crate::error::{GeneratorError, InterpretResult};
use crate::interpreter::{interpret, InterpretOptions, InterpretReport};
use gridscribe_core::{CellValue, Grid};
use gridscribe_formula::{evaluate_formula, EvaluationContext};
use tracing::debug;

const DIRECTIVE_GUIDE: &str = "\
If the user wants to modify the spreadsheet data, embed commands in this format directly in your response:
[SET_CELL:A1:New Value] - set cell A1 to 'New Value'
[INSERT_ROW:3:value1,value2,value3] - insert a row at position 3 with these values
[INSERT_COLUMN:2:value1,value2,value3] - insert a column at position 2 with these values
[DELETE_ROW:5] - delete row 5
[DELETE_COLUMN:1] - delete column 1
[APPLY_FORMULA:A1:B1+C1] - apply the formula 'B1+C1' in cell A1
Row and column positions start at 0. Formulas take one operator (+, -, * or /) between two cell references or numbers.";

const SYSTEM_PREAMBLE: &str = "You are a spreadsheet assistant. You analyze tabular data and carry out edits the user asks for. \
The user provides the sheet contents and a command. Be precise and only change what the command requires.";

/// Instructions describing the directive grammar to a text generator
pub fn directive_guide() -> &'static str {
    DIRECTIVE_GUIDE
}

/// Render a grid as `Sheet: <name>` followed by one tab-separated line per row
///
/// Formula text cells show their evaluated value when evaluation succeeds.
///
/// # Example
/// ```
/// use gridscribe::render_grid;
/// use gridscribe_core::{CellValue, Grid};
///
/// let mut grid = Grid::with_name("Budget");
/// grid.set_value("A1", "Rent").unwrap();
/// grid.set_value("B1", 1200.0).unwrap();
/// grid.set_value("B2", CellValue::formula("=B1*12")).unwrap();
///
/// assert_eq!(render_grid(&grid), "Sheet: Budget\nRent\t1200\n\t14400\n");
/// ```
pub fn render_grid(grid: &Grid) -> String {
    let ctx = EvaluationContext::new(grid);
    let mut out = format!("Sheet: {}\n", grid.name());

    for row in 0..grid.row_count() {
        let cells: Vec<(u16, &CellValue)> = grid.iter_row(row).collect();
        if let Some(&(last, _)) = cells.last() {
            let mut line = vec![String::new(); last as usize + 1];
            for (col, value) in cells {
                line[col as usize] = match value {
                    CellValue::Formula(text) => evaluate_formula(text, &ctx)
                        .map(|v| v.to_string())
                        .unwrap_or_else(|_| text.clone()),
                    other => other.to_string(),
                };
            }
            out.push_str(&line.join("\t"));
        }
        out.push('\n');
    }

    out
}

/// System and user messages asking a generator for an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPrompt {
    pub system: String,
    pub user: String,
}

impl EditPrompt {
    /// Build the prompt for `command` against the current grid
    pub fn new(grid: &Grid, command: &str) -> Self {
        let system = format!("{}\n\n{}", SYSTEM_PREAMBLE, DIRECTIVE_GUIDE);
        let user = format!(
            "Here is the spreadsheet data:\n\n{}\nUser command: {}\n\n\
             Please carry out this request using the command format described in the system message.",
            render_grid(grid),
            command
        );
        Self { system, user }
    }

    /// Messages as `(role, content)` pairs
    pub fn messages(&self) -> [(&'static str, &str); 2] {
        [("system", &self.system), ("user", &self.user)]
    }
}

/// Source of generated text, such as a chat completion client
pub trait TextGenerator {
    /// Produce a response for the prompt
    fn generate(&self, prompt: &EditPrompt) -> Result<String, GeneratorError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&EditPrompt) -> Result<String, GeneratorError>,
{
    fn generate(&self, prompt: &EditPrompt) -> Result<String, GeneratorError> {
        self(prompt)
    }
}

/// Result of a generator round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub report: InterpretReport,
    /// Raw generator response
    pub response: String,
}

/// Ask `generator` to carry out `command` and apply its directives to `grid`
///
/// If the generator fails the grid is left untouched.
pub fn edit_with_generator<G>(
    grid: &mut Grid,
    command: &str,
    generator: &G,
    options: &InterpretOptions,
) -> InterpretResult<EditOutcome>
where
    G: TextGenerator + ?Sized,
{
    let prompt = EditPrompt::new(grid, command);
    let response = generator.generate(&prompt)?;
    debug!(length = response.len(), "generator response received");

    let report = interpret(grid, &response, options);
    Ok(EditOutcome { report, response })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterpretError;
    use pretty_assertions::assert_eq;

    fn sample_grid() -> Grid {
        let mut grid = Grid::with_name("Scores");
        grid.set_value("A1", "Ann").unwrap();
        grid.set_value("B1", 10.0).unwrap();
        grid.set_value("A3", "Bob").unwrap();
        grid.set_value("C3", CellValue::formula("=B1+C9")).unwrap();
        grid.set_value("D3", CellValue::formula("=Ann*2")).unwrap();
        grid
    }

    #[test]
    fn test_render_grid() {
        assert_eq!(
            render_grid(&sample_grid()),
            "Sheet: Scores\nAnn\t10\n\nBob\t\t10\t=Ann*2\n"
        );
    }

    #[test]
    fn test_render_empty_grid() {
        assert_eq!(render_grid(&Grid::new()), "Sheet: Sheet1\n");
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = EditPrompt::new(&sample_grid(), "double Bob's score");

        assert!(prompt.system.contains("[APPLY_FORMULA:A1:B1+C1]"));
        assert!(prompt.user.contains("Sheet: Scores\nAnn\t10\n"));
        assert!(prompt.user.contains("User command: double Bob's score"));
        assert_eq!(prompt.messages()[0].0, "system");
    }

    #[test]
    fn test_edit_with_generator() {
        let mut grid = sample_grid();
        let generator = |prompt: &EditPrompt| -> Result<String, GeneratorError> {
            assert!(prompt.user.contains("add a total"));
            Ok("Done! [SET_CELL:A4:Total] [APPLY_FORMULA:B4:B1*3]".to_string())
        };

        let outcome =
            edit_with_generator(&mut grid, "add a total", &generator, &InterpretOptions::default())
                .unwrap();

        assert_eq!(outcome.report.succeeded(), 2);
        assert!(outcome.response.starts_with("Done!"));
        assert_eq!(grid.value("B4").unwrap(), CellValue::Number(30.0));
    }

    #[test]
    fn test_generator_failure_leaves_grid() {
        let mut grid = sample_grid();
        let generator =
            |_: &EditPrompt| -> Result<String, GeneratorError> { Err(GeneratorError::new("timeout")) };

        let err = edit_with_generator(&mut grid, "anything", &generator, &InterpretOptions::default())
            .unwrap_err();

        assert!(matches!(err, InterpretError::Generator(_)));
        assert_eq!(err.to_string(), "Text generator failed: timeout");
        assert_eq!(grid, sample_grid());
    }
}

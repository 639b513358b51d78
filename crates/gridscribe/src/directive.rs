//! Directive extraction
//!
//! Scans free-form text for the bracketed directive grammar:
//!
//! | Directive | Example |
//! |---|---|
//! | `SET_CELL` | `[SET_CELL:A1:New Value]` |
//! | `INSERT_ROW` | `[INSERT_ROW:3:value1,value2,value3]` |
//! | `INSERT_COLUMN` | `[INSERT_COLUMN:2:value1,value2,value3]` |
//! | `DELETE_ROW` | `[DELETE_ROW:5]` |
//! | `DELETE_COLUMN` | `[DELETE_COLUMN:1]` |
//! | `APPLY_FORMULA` | `[APPLY_FORMULA:A1:B1+C1]` |
//!
//! Commands come back grouped by kind in [`CommandKind::PHASES`] order and,
//! within a kind, in order of appearance. Anything that does not match one of
//! the patterns is ignored.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Directive kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CommandKind {
    SetCell,
    InsertRow,
    InsertColumn,
    DeleteRow,
    DeleteColumn,
    ApplyFormula,
}

impl CommandKind {
    /// Processing order. Structural edits settle before formulas run.
    pub const PHASES: [CommandKind; 6] = [
        CommandKind::SetCell,
        CommandKind::InsertRow,
        CommandKind::InsertColumn,
        CommandKind::DeleteRow,
        CommandKind::DeleteColumn,
        CommandKind::ApplyFormula,
    ];

    /// Tag as written inside the brackets
    pub fn tag(&self) -> &'static str {
        match self {
            CommandKind::SetCell => "SET_CELL",
            CommandKind::InsertRow => "INSERT_ROW",
            CommandKind::InsertColumn => "INSERT_COLUMN",
            CommandKind::DeleteRow => "DELETE_ROW",
            CommandKind::DeleteColumn => "DELETE_COLUMN",
            CommandKind::ApplyFormula => "APPLY_FORMULA",
        }
    }

    /// Regex for this kind's bracket form
    fn pattern(&self) -> &'static str {
        match self {
            CommandKind::SetCell => r"\[SET_CELL:([A-Za-z0-9]+):(.+?)\]",
            CommandKind::InsertRow => r"\[INSERT_ROW:(\d+):(.+?)\]",
            CommandKind::InsertColumn => r"\[INSERT_COLUMN:(\d+):(.+?)\]",
            CommandKind::DeleteRow => r"\[DELETE_ROW:(\d+)\]",
            CommandKind::DeleteColumn => r"\[DELETE_COLUMN:(\d+)\]",
            CommandKind::ApplyFormula => r"\[APPLY_FORMULA:([A-Za-z0-9]+):(.+?)\]",
        }
    }

    /// Build a command from this kind's captures
    fn build(&self, caps: &Captures<'_>) -> Command {
        let first = group(caps, 1).to_string();
        match self {
            CommandKind::SetCell => Command::SetCell {
                address: first,
                value: group(caps, 2).to_string(),
            },
            CommandKind::InsertRow => Command::InsertRow {
                index: first,
                values: split_values(group(caps, 2)),
            },
            CommandKind::InsertColumn => Command::InsertColumn {
                index: first,
                values: split_values(group(caps, 2)),
            },
            CommandKind::DeleteRow => Command::DeleteRow { index: first },
            CommandKind::DeleteColumn => Command::DeleteColumn { index: first },
            CommandKind::ApplyFormula => Command::ApplyFormula {
                address: first,
                formula: group(caps, 2).to_string(),
            },
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A directive found in text
///
/// Arguments are kept as written; the interpreter validates addresses and
/// indices when it applies the command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    SetCell { address: String, value: String },
    InsertRow { index: String, values: Vec<String> },
    InsertColumn { index: String, values: Vec<String> },
    DeleteRow { index: String },
    DeleteColumn { index: String },
    ApplyFormula { address: String, formula: String },
}

impl Command {
    /// Kind of this command
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::SetCell { .. } => CommandKind::SetCell,
            Command::InsertRow { .. } => CommandKind::InsertRow,
            Command::InsertColumn { .. } => CommandKind::InsertColumn,
            Command::DeleteRow { .. } => CommandKind::DeleteRow,
            Command::DeleteColumn { .. } => CommandKind::DeleteColumn,
            Command::ApplyFormula { .. } => CommandKind::ApplyFormula,
        }
    }

    /// Arguments echoed back in results (`A1=value`, `3:a,b`, `5`, `A1=B1+C1`)
    pub fn params(&self) -> String {
        match self {
            Command::SetCell { address, value } => format!("{}={}", address, value),
            Command::InsertRow { index, values } | Command::InsertColumn { index, values } => {
                format!("{}:{}", index, values.join(","))
            }
            Command::DeleteRow { index } | Command::DeleteColumn { index } => index.clone(),
            Command::ApplyFormula { address, formula } => format!("{}={}", address, formula),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetCell { address, value } => write!(f, "[SET_CELL:{}:{}]", address, value),
            Command::InsertRow { index, values } => {
                write!(f, "[INSERT_ROW:{}:{}]", index, values.join(","))
            }
            Command::InsertColumn { index, values } => {
                write!(f, "[INSERT_COLUMN:{}:{}]", index, values.join(","))
            }
            Command::DeleteRow { index } => write!(f, "[DELETE_ROW:{}]", index),
            Command::DeleteColumn { index } => write!(f, "[DELETE_COLUMN:{}]", index),
            Command::ApplyFormula { address, formula } => {
                write!(f, "[APPLY_FORMULA:{}:{}]", address, formula)
            }
        }
    }
}

/// Compiled patterns, indexed like [`CommandKind::PHASES`]
static PATTERNS: OnceLock<Vec<(CommandKind, Regex)>> = OnceLock::new();

fn patterns() -> &'static [(CommandKind, Regex)] {
    PATTERNS.get_or_init(|| {
        CommandKind::PHASES
            .iter()
            .map(|kind| {
                let regex = Regex::new(kind.pattern()).expect("directive pattern is valid");
                (*kind, regex)
            })
            .collect()
    })
}

/// Extract every directive from `text`, in processing order
///
/// # Example
/// ```
/// use gridscribe::{extract, Command};
///
/// let commands = extract("Sure! [APPLY_FORMULA:A3:A1+A2] [SET_CELL:A1:Hello]");
/// assert_eq!(
///     commands[0],
///     Command::SetCell { address: "A1".into(), value: "Hello".into() }
/// );
/// assert_eq!(commands.len(), 2);
/// ```
pub fn extract(text: &str) -> Vec<Command> {
    let mut commands = Vec::new();

    for (kind, regex) in patterns() {
        let before = commands.len();
        commands.extend(regex.captures_iter(text).map(|caps| kind.build(&caps)));

        let found = commands.len() - before;
        if found > 0 {
            debug!(kind = %kind, count = found, "extracted directives");
        }
    }

    commands
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Comma-separated values, trailing empties kept
fn split_values(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

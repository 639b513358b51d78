//! gridscribe CLI - apply generated spreadsheet directives to CSV grids

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridscribe::prelude::*;
use gridscribe::{directive_guide, render_grid, CsvWriteOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridscribe")]
#[command(
    author,
    version,
    about = "Apply bracketed spreadsheet directives from generated text to CSV grids"
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the directives in a response to a grid
    Apply {
        /// Grid file (csv)
        grid: PathBuf,

        /// Response text file, or '-' for stdin (default: stdin)
        #[arg(short, long)]
        response: Option<PathBuf>,

        /// Write the edited grid here (default: print CSV to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the result report as JSON
        #[arg(long)]
        json: bool,

        /// Maximum nesting of formula cells followed by one formula
        #[arg(long, env = "GRIDSCRIBE_MAX_FORMULA_DEPTH", default_value_t = 16)]
        max_formula_depth: usize,

        /// Store `true`/`false` from SET_CELL as text instead of booleans
        #[arg(long)]
        no_booleans: bool,

        /// Replace every remaining formula cell with its value before saving
        #[arg(long)]
        evaluate_all: bool,
    },

    /// List the directives found in a text, in processing order
    Extract {
        /// Text file, or '-' for stdin (default: stdin)
        input: Option<PathBuf>,
    },

    /// Print the directive guide given to text generators
    Guide,

    /// Print a grid the way it is shown to text generators
    Show {
        /// Grid file (csv)
        grid: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Apply {
            grid,
            response,
            output,
            json,
            max_formula_depth,
            no_booleans,
            evaluate_all,
        } => {
            let options = InterpretOptions {
                max_formula_depth,
                infer_booleans: !no_booleans,
            };
            apply(
                &grid,
                response.as_deref(),
                output.as_deref(),
                json,
                evaluate_all,
                &options,
            )
        }
        Commands::Extract { input } => list_directives(input.as_deref()),
        Commands::Guide => {
            println!("{}", directive_guide());
            Ok(())
        }
        Commands::Show { grid } => show_grid(&grid),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn apply(
    grid_path: &Path,
    response: Option<&Path>,
    output: Option<&Path>,
    json: bool,
    evaluate_all: bool,
    options: &InterpretOptions,
) -> Result<()> {
    let mut grid =
        Grid::open(grid_path).with_context(|| format!("Failed to open '{}'", grid_path.display()))?;
    let text = read_text(response)?;

    let report = interpret(&mut grid, &text, options);

    if evaluate_all {
        let stats = grid.calculate_with_options(&CalculationOptions {
            max_formula_depth: options.max_formula_depth,
        });
        eprintln!(
            "Calculated {} formulas ({} errors)",
            stats.cells_calculated, stats.errors
        );
    }

    match output {
        Some(path) => {
            grid.save(path)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            print_report(&report, json, &mut io::stdout())?;
            eprintln!("Wrote {} rows to '{}'", grid.row_count(), path.display());
        }
        None => {
            // stdout carries the grid, so the report goes to stderr
            print_report(&report, json, &mut io::stderr())?;
            CsvWriter::write(&grid, io::stdout(), &CsvWriteOptions::default())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn print_report<W: Write>(report: &InterpretReport, json: bool, out: &mut W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report).context("Failed to encode report")?;
        writeln!(out)?;
        return Ok(());
    }

    for result in &report.results {
        let status = if result.success { "ok" } else { "FAILED" };
        writeln!(
            out,
            "{:<6} {:<13} {:<20} {}",
            status,
            result.kind.tag(),
            result.params,
            result.message
        )?;
    }
    writeln!(
        out,
        "{} directives: {} succeeded, {} failed",
        report.results.len(),
        report.succeeded(),
        report.failed()
    )?;
    Ok(())
}

fn list_directives(input: Option<&Path>) -> Result<()> {
    let text = read_text(input)?;
    let commands = extract(&text);
    debug!(count = commands.len(), "directives found");

    for command in &commands {
        println!("{}\t{}", command.kind(), command);
    }
    Ok(())
}

fn show_grid(path: &Path) -> Result<()> {
    let grid = Grid::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;

    print!("{}", render_grid(&grid));
    io::stdout().flush().context("Failed to write to stdout")?;
    Ok(())
}

/// Read text from a file, or from stdin when the path is absent or `-`
fn read_text(source: Option<&Path>) -> Result<String> {
    match source {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

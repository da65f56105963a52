//! tripsplit-check - Validate a trip snapshot.
//!
//! Exit codes: 0 when no errors were found (warnings allowed), 1 when at
//! least one error was found, 2 when the snapshot could not be loaded.

use crate::cmd::completions::ShellType;
use crate::render::{self, OutputFormat};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tripsplit_loader::Loader;
use tripsplit_validate::{validate, Severity, ValidationError};

/// A diagnostic message in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    /// Severity: "error" or "warning"
    pub severity: &'static str,
    /// Error code (e.g., "V3001")
    pub code: &'static str,
    /// Error message
    pub message: String,
    /// Expense the diagnostic refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<String>,
    /// Member the diagnostic refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

impl From<&ValidationError> for JsonDiagnostic {
    fn from(error: &ValidationError) -> Self {
        Self {
            severity: severity_label(error.code.severity()),
            code: error.code.code(),
            message: error.message.clone(),
            expense_id: error.expense_id.as_ref().map(ToString::to_string),
            member_id: error.member_id.as_ref().map(ToString::to_string),
        }
    }
}

/// JSON output structure for all diagnostics.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// List of diagnostics
    pub diagnostics: Vec<JsonDiagnostic>,
    /// Total error count
    pub error_count: usize,
    /// Total warning count
    pub warning_count: usize,
}

const fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

/// Validate trip snapshots and report problems.
#[derive(Parser, Debug)]
#[command(name = "tripsplit-check")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The trip snapshot to check
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output (just use exit code)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

fn run(args: &Args) -> Result<ExitCode> {
    let file = args.file.as_ref().context("no snapshot file given")?;
    let snapshot = Loader::new()
        .load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let errors = validate(&snapshot.members, &snapshot.expenses);
    let error_count = errors.iter().filter(|e| e.is_error()).count();
    tracing::debug!(
        error_count,
        warning_count = errors.len() - error_count,
        "validation finished"
    );

    if !args.quiet {
        let mut stdout = io::stdout().lock();
        write_diagnostics(&mut stdout, &errors, args.format)?;
        stdout.flush()?;
    }

    Ok(if error_count > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn write_diagnostics<W: Write>(
    writer: &mut W,
    errors: &[ValidationError],
    format: OutputFormat,
) -> Result<()> {
    let error_count = errors.iter().filter(|e| e.is_error()).count();
    let warning_count = errors.len() - error_count;

    match format {
        OutputFormat::Json => render::write_json(
            writer,
            &JsonOutput {
                diagnostics: errors.iter().map(JsonDiagnostic::from).collect(),
                error_count,
                warning_count,
            },
        ),
        OutputFormat::Text => {
            for error in errors {
                let label = severity_label(error.code.severity());
                match &error.expense_id {
                    Some(id) => writeln!(writer, "{label}: expense {id}: {error}")?,
                    None => writeln!(writer, "{label}: {error}")?,
                }
            }
            if errors.is_empty() {
                writeln!(writer, "No problems found.")?;
            } else {
                writeln!(writer)?;
                writeln!(writer, "{error_count} error(s), {warning_count} warning(s)")?;
            }
            Ok(())
        }
    }
}

/// Main entry point for the check command.
pub fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, "tripsplit-check");
        return ExitCode::SUCCESS;
    }

    crate::cmd::init_tracing(args.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

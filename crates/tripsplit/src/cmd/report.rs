//! tripsplit-report - Show where a trip stands.
//!
//! # Usage
//!
//! ```bash
//! tripsplit-report lisbon.json balances
//! tripsplit-report lisbon.json debts --currency EUR
//! tripsplit-report lisbon.json budget --format json
//! ```
//!
//! # Reports
//!
//! - `balances` - Net balance per member
//! - `debts` - Suggested transfers to settle up
//! - `budget` - Spending against the trip budget
//! - `summary` - Headline figures and spending by category

use crate::cmd::completions::ShellType;
use crate::render::{self, OutputFormat, TripSummary};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tripsplit_loader::{Loader, Options, Snapshot};

/// Generate reports from trip snapshots.
#[derive(Parser, Debug)]
#[command(name = "tripsplit-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The trip snapshot to read
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    file: Option<PathBuf>,

    /// The report to generate
    #[command(subcommand)]
    report: Option<Report>,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Display currency code, overriding the trip setting
    #[arg(long, value_name = "CODE", global = true)]
    currency: Option<String>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    generate_completions: Option<ShellType>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Report {
    /// Show each member's net balance
    Balances,
    /// Show suggested transfers to settle up
    Debts,
    /// Show spending against the budget
    Budget,
    /// Show trip totals and spending by category
    Summary,
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, "tripsplit-report");
        return ExitCode::SUCCESS;
    }

    crate::cmd::init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let file = args.file.as_ref().context("no snapshot file given")?;
    let report = args
        .report
        .context("no report given (balances, debts, budget or summary)")?;

    let snapshot = Loader::new()
        .load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;

    let mut stdout = io::stdout().lock();
    write_report(
        &mut stdout,
        &snapshot,
        report,
        args.format,
        args.currency.as_deref(),
    )?;
    stdout.flush()?;
    Ok(())
}

fn write_report<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    report: Report,
    format: OutputFormat,
    currency: Option<&str>,
) -> Result<()> {
    let options = Options::resolve(currency, snapshot);
    tracing::debug!(
        currency = options.currency.code,
        source = ?options.currency_source,
        ?report,
        "rendering report"
    );
    let currency = &options.currency;

    match (report, format) {
        (Report::Balances, OutputFormat::Text) => {
            render::write_balances(writer, &snapshot.balances(), currency)
        }
        (Report::Balances, OutputFormat::Json) => render::write_json(writer, &snapshot.balances()),
        (Report::Debts, OutputFormat::Text) => {
            render::write_debts(writer, &snapshot.debts(), currency)
        }
        (Report::Debts, OutputFormat::Json) => render::write_json(writer, &snapshot.debts()),
        (Report::Budget, OutputFormat::Text) => {
            render::write_budget(writer, &snapshot.budget_summary(), currency)
        }
        (Report::Budget, OutputFormat::Json) => {
            render::write_json(writer, &snapshot.budget_summary())
        }
        (Report::Summary, OutputFormat::Text) => {
            render::write_summary(writer, &TripSummary::new(snapshot), currency)
        }
        (Report::Summary, OutputFormat::Json) => {
            render::write_json(writer, &TripSummary::new(snapshot))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    fn fixture() -> Snapshot {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/lisbon.json");
        tripsplit_loader::load(&path).unwrap()
    }

    fn report(report: Report, format: OutputFormat, currency: Option<&str>) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, &fixture(), report, format, currency).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_args_are_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_report_with_global_flags() {
        let args =
            Args::try_parse_from(["tripsplit-report", "trip.json", "debts", "--format", "json"])
                .unwrap();
        assert_eq!(args.report, Some(Report::Debts));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_debts_use_snapshot_currency() {
        let out = report(Report::Debts, OutputFormat::Text, None);
        assert!(out.contains("Carol pays Alice €40.00"), "{out}");
    }

    #[test]
    fn test_currency_flag_overrides_snapshot() {
        let out = report(Report::Balances, OutputFormat::Text, Some("GBP"));
        assert!(out.contains("+£50.00"), "{out}");
    }

    #[test]
    fn test_budget_json() {
        let out = report(Report::Budget, OutputFormat::Json, None);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[0]["category"], "total");
        assert_eq!(value[1]["category"], "food");
    }

    #[test]
    fn test_summary_text() {
        let out = report(Report::Summary, OutputFormat::Text, None);
        assert!(out.starts_with("Lisbon\n"), "{out}");
        assert!(out.contains("Expenses:     2 (0 settlements)"), "{out}");
    }
}

//! tripsplit-settle - Record a settlement transfer.
//!
//! # Usage
//!
//! ```bash
//! # Record the first suggested transfer from `tripsplit-report FILE debts`
//! tripsplit-settle lisbon.json --index 1
//!
//! # Record an arbitrary transfer
//! tripsplit-settle lisbon.json --from b --to a --amount 25
//! ```

use crate::cmd::completions::ShellType;
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rust_decimal::Decimal;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tripsplit_core::{
    find_member, format_amount, round_money, settlement_expense, Debt, Expense, ExpenseId,
    SETTLEMENT_TOLERANCE,
};
use tripsplit_loader::{save, Loader, Options, Snapshot};
use tripsplit_validate::validate_expense;
use uuid::Uuid;

/// Record a settlement in a trip snapshot.
#[derive(Parser, Debug)]
#[command(name = "tripsplit-settle")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The trip snapshot to update
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub file: Option<PathBuf>,

    /// Settle the Nth suggested transfer (1-based, as listed by `tripsplit-report debts`)
    #[arg(
        long,
        short = 'n',
        value_name = "N",
        conflicts_with_all = ["from", "to", "amount"]
    )]
    pub index: Option<usize>,

    /// Member id paying
    #[arg(long, value_name = "ID", requires_all = ["to", "amount"])]
    pub from: Option<String>,

    /// Member id being paid
    #[arg(long, value_name = "ID", requires_all = ["from", "amount"])]
    pub to: Option<String>,

    /// Amount transferred
    #[arg(long, value_name = "AMOUNT", requires_all = ["from", "to"])]
    pub amount: Option<Decimal>,

    /// Settlement date (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Display currency code, overriding the trip setting
    #[arg(long, value_name = "CODE")]
    pub currency: Option<String>,

    /// Show what would be recorded without saving
    #[arg(long)]
    pub dry_run: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Which transfer to record.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Suggested(usize),
    Manual {
        from: String,
        to: String,
        amount: Decimal,
    },
}

impl Args {
    fn target(&self) -> Result<Target> {
        match (self.index, &self.from, &self.to, self.amount) {
            (Some(index), None, None, None) => Ok(Target::Suggested(index)),
            (None, Some(from), Some(to), Some(amount)) => Ok(Target::Manual {
                from: from.clone(),
                to: to.clone(),
                amount,
            }),
            _ => bail!("give either --index N or all of --from, --to and --amount"),
        }
    }
}

/// Pick or build the transfer to record.
fn resolve_debt(snapshot: &Snapshot, target: &Target) -> Result<Debt> {
    match target {
        Target::Suggested(index) => {
            let debts = snapshot.debts();
            if debts.is_empty() {
                bail!("everyone is settled up; nothing to record");
            }
            let Some(debt) = index.checked_sub(1).and_then(|i| debts.get(i)) else {
                bail!(
                    "no suggested transfer #{index}; there are {} (numbered from 1)",
                    debts.len()
                );
            };
            Ok(debt.clone())
        }
        Target::Manual { from, to, amount } => {
            if from == to {
                bail!("a member cannot settle with themselves");
            }
            let amount = round_money(*amount);
            if amount < SETTLEMENT_TOLERANCE {
                bail!("amount must be at least {SETTLEMENT_TOLERANCE}");
            }
            let payer = find_member(&snapshot.members, from)
                .with_context(|| format!("unknown member {from}"))?;
            let payee = find_member(&snapshot.members, to)
                .with_context(|| format!("unknown member {to}"))?;
            Ok(Debt {
                from: payer.to_ref(),
                to: payee.to_ref(),
                amount,
            })
        }
    }
}

/// Build the settlement record and check it against the roster.
fn record(snapshot: &Snapshot, debt: &Debt, id: ExpenseId, date: NaiveDate) -> Result<Expense> {
    let settlement = settlement_expense(debt, id, Some(date));
    let problems: Vec<_> = validate_expense(&settlement, &snapshot.members)
        .into_iter()
        .filter(tripsplit_validate::ValidationError::is_error)
        .collect();
    if let Some(first) = problems.first() {
        bail!("settlement rejected: {first}");
    }
    Ok(settlement)
}

fn run(args: &Args) -> Result<()> {
    let file = args.file.as_ref().context("no snapshot file given")?;
    let target = args.target()?;

    let mut snapshot = Loader::new()
        .load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let options = Options::resolve(args.currency.as_deref(), &snapshot);

    let debt = resolve_debt(&snapshot, &target)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let settlement = record(&snapshot, &debt, Uuid::new_v4().to_string().into(), date)?;

    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "{} {} pays {} {} on {date}",
        if args.dry_run { "Would record:" } else { "Recorded:" },
        debt.from.name,
        debt.to.name,
        format_amount(debt.amount, &options.currency)
    )?;

    if args.dry_run {
        return Ok(());
    }

    tracing::info!(
        id = %settlement.id,
        from = %debt.from.id,
        to = %debt.to.id,
        amount = %debt.amount,
        "recording settlement"
    );
    snapshot.expenses.push(settlement);
    save(file, &snapshot).with_context(|| format!("failed to save {}", file.display()))?;

    let remaining = snapshot.debts().len();
    writeln!(stdout, "{remaining} transfer(s) left to settle up.")?;
    Ok(())
}

/// Main entry point for the settle command.
pub fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, "tripsplit-settle");
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

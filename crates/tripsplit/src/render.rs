//! Text and JSON rendering for reports.
//!
//! Every renderer writes to a caller-supplied writer so the commands can
//! target stdout while tests capture into a buffer.

use anyhow::Result;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tripsplit_core::money::is_settled;
use tripsplit_core::{
    format_amount, format_signed, spending_by_category, Balance, BudgetSummary, Category,
    Currency, Debt,
};
use tripsplit_loader::Snapshot;

/// Output format for reports and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn heading<W: Write>(writer: &mut W, title: &str) -> Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(48))?;
    Ok(())
}

/// Render member balances.
pub fn write_balances<W: Write>(
    writer: &mut W,
    balances: &[Balance],
    currency: &Currency,
) -> Result<()> {
    heading(writer, "Balances")?;
    if balances.is_empty() {
        writeln!(writer, "No members yet.")?;
        return Ok(());
    }

    for balance in balances {
        let status = if is_settled(balance.amount) {
            "settled up"
        } else if balance.is_creditor() {
            "gets back"
        } else {
            "owes"
        };
        writeln!(
            writer,
            "{:<24} {:>12}  {status}",
            balance.member_name,
            format_signed(balance.amount, currency)
        )?;
    }
    Ok(())
}

/// Render suggested transfers, numbered from 1.
pub fn write_debts<W: Write>(writer: &mut W, debts: &[Debt], currency: &Currency) -> Result<()> {
    heading(writer, "Suggested transfers")?;
    if debts.is_empty() {
        writeln!(writer, "Everyone is settled up.")?;
        return Ok(());
    }

    for (i, debt) in debts.iter().enumerate() {
        writeln!(
            writer,
            "{:>3}. {} pays {} {}",
            i + 1,
            debt.from.name,
            debt.to.name,
            format_amount(debt.amount, currency)
        )?;
    }
    Ok(())
}

/// Render budget lines.
pub fn write_budget<W: Write>(
    writer: &mut W,
    summary: &[BudgetSummary],
    currency: &Currency,
) -> Result<()> {
    heading(writer, "Budget")?;
    if summary.is_empty() {
        writeln!(writer, "No budget set.")?;
        return Ok(());
    }

    for line in summary {
        let label = format!("{} {}", line.category.emoji(), line.category.display_name());
        write!(
            writer,
            "{label:<24} {:>12} of {:>12}  {:>6}%",
            format_amount(line.spent, currency),
            format_amount(line.budgeted, currency),
            line.percentage.round_dp(0)
        )?;
        if line.is_over_budget {
            write!(
                writer,
                "  over by {}",
                format_amount(-line.remaining, currency)
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Headline figures for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    /// Trip name, if the snapshot carries one.
    pub name: Option<String>,
    /// Roster size.
    pub members: usize,
    /// Number of purchases, settlements excluded.
    pub expenses: usize,
    /// Number of recorded settlements.
    pub settlements: usize,
    /// Total spent on purchases.
    pub total_spent: Decimal,
    /// Spending per category.
    pub by_category: BTreeMap<Category, Decimal>,
    /// Transfers still needed to settle up.
    pub open_transfers: usize,
}

impl TripSummary {
    /// Summarize a snapshot.
    #[must_use]
    pub fn new(snapshot: &Snapshot) -> Self {
        let settlements = snapshot.expenses.iter().filter(|e| e.is_settlement).count();
        Self {
            name: snapshot.trip.as_ref().map(|t| t.name.clone()),
            members: snapshot.members.len(),
            expenses: snapshot.expenses.len() - settlements,
            settlements,
            total_spent: snapshot.total_spent(),
            by_category: spending_by_category(&snapshot.expenses),
            open_transfers: snapshot.debts().len(),
        }
    }
}

/// Render a trip summary.
pub fn write_summary<W: Write>(
    writer: &mut W,
    summary: &TripSummary,
    currency: &Currency,
) -> Result<()> {
    heading(writer, summary.name.as_deref().unwrap_or("Trip"))?;
    writeln!(writer, "Members:      {}", summary.members)?;
    writeln!(
        writer,
        "Expenses:     {} ({} settlements)",
        summary.expenses, summary.settlements
    )?;
    writeln!(
        writer,
        "Total spent:  {}",
        format_amount(summary.total_spent, currency)
    )?;
    writeln!(writer, "Open transfers: {}", summary.open_transfers)?;

    if !summary.by_category.is_empty() {
        writeln!(writer)?;
        for (category, spent) in &summary.by_category {
            let label = format!("{} {}", category.emoji(), category.display_name());
            writeln!(writer, "  {label:<22} {:>12}", format_amount(*spent, currency))?;
        }
    }
    Ok(())
}

//! Recording a suggested debt as paid.
//!
//! Settling up does not mutate any balance: it produces a settlement
//! [`Expense`] that the application stores alongside the trip's other
//! expenses. The next call to [`crate::calculate_balances`] picks it up and
//! moves both parties toward zero by exactly the transferred amount.

use chrono::NaiveDate;

use crate::debt::Debt;
use crate::expense::Expense;
use crate::id::ExpenseId;

/// Build the settlement record for a debt.
///
/// The debtor is the payer and the creditor the sole other participant.
///
/// # Examples
///
/// ```
/// use tripsplit_core::{calculate_balances, calculate_debts, settlement_expense, Expense, Member};
/// use rust_decimal_macros::dec;
///
/// let members = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
/// let mut expenses = vec![Expense::new("e-1", dec!(50), "a").with_participants(["a", "b"])];
///
/// let debts = calculate_debts(&calculate_balances(&expenses, &members), &members);
/// expenses.push(settlement_expense(&debts[0], "s-1", None));
///
/// let after = calculate_balances(&expenses, &members);
/// assert!(after.iter().all(|b| b.amount.is_zero()));
/// ```
#[must_use]
pub fn settlement_expense(
    debt: &Debt,
    id: impl Into<ExpenseId>,
    date: Option<NaiveDate>,
) -> Expense {
    let expense = Expense::new(id, debt.amount, debt.from.id.clone())
        .with_description(format!("Settlement from {} to {}", debt.from, debt.to))
        .with_participants([debt.from.id.clone(), debt.to.id.clone()])
        .as_settlement();

    match date {
        Some(date) => expense.with_date(date),
        None => expense,
    }
}

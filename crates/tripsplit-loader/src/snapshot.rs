//! The stored shape of a trip.

use serde::{Deserialize, Serialize};
use tripsplit_core::{
    calculate_balances, calculate_budget_summary, calculate_debts, Balance, Budget, BudgetSummary,
    Debt, Decimal, Expense, Member,
};

/// Trip metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Trip id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-trip settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Display currency code, e.g. `EUR`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Everything stored for one trip: roster, expense history and budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Trip metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<Trip>,
    /// Per-trip settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    /// Current roster, in display order.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Expense history, oldest first.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Optional budget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
}

impl Snapshot {
    /// Create an empty snapshot for a roster.
    #[must_use]
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    /// The currency code stored in the trip settings.
    #[must_use]
    pub fn currency_code(&self) -> Option<&str> {
        self.settings.as_ref()?.currency.as_deref()
    }

    /// Net balance per roster member.
    #[must_use]
    pub fn balances(&self) -> Vec<Balance> {
        calculate_balances(&self.expenses, &self.members)
    }

    /// Suggested transfers that would settle the trip.
    #[must_use]
    pub fn debts(&self) -> Vec<Debt> {
        calculate_debts(&self.balances(), &self.members)
    }

    /// Budget vs. spending, empty when no budget is set.
    #[must_use]
    pub fn budget_summary(&self) -> Vec<BudgetSummary> {
        calculate_budget_summary(self.budget.as_ref(), &self.expenses)
    }

    /// Total spent on real purchases, settlements excluded. Saturates at
    /// the `Decimal` range.
    #[must_use]
    pub fn total_spent(&self) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| !e.is_settlement)
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }
}

//! Trip budget tracking.
//!
//! Compares what a trip has spent, per category, against a budget. Settlement
//! transfers only move money between members, so they never count as
//! spending.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::expense::{Category, Expense};
use crate::money::round_money;

/// A spending budget for a trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Budget for all spending.
    pub total_budget: Decimal,
    /// Optional per-category budgets.
    #[serde(default)]
    pub category_budgets: BTreeMap<Category, Decimal>,
}

impl Budget {
    /// Create a budget with only a total.
    #[must_use]
    pub fn new(total_budget: Decimal) -> Self {
        Self {
            total_budget,
            category_budgets: BTreeMap::new(),
        }
    }

    /// Set the budget for one category.
    #[must_use]
    pub fn with_category(mut self, category: Category, amount: Decimal) -> Self {
        self.category_budgets.insert(category, amount);
        self
    }
}

/// Which line of the summary a [`BudgetSummary`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetLine {
    /// All spending against the total budget.
    Total,
    /// Spending in a single category.
    Category(Category),
}

impl BudgetLine {
    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Total => "Total Budget",
            Self::Category(c) => c.display_name(),
        }
    }

    /// Emoji shown next to the line.
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Total => "💰",
            Self::Category(c) => c.emoji(),
        }
    }
}

impl fmt::Display for BudgetLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total => f.write_str("total"),
            Self::Category(c) => write!(f, "{c}"),
        }
    }
}

impl Serialize for BudgetLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Budget against spending for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// The line being summarized.
    pub category: BudgetLine,
    /// Amount budgeted.
    pub budgeted: Decimal,
    /// Amount spent.
    pub spent: Decimal,
    /// `budgeted - spent`, negative when over budget.
    pub remaining: Decimal,
    /// Spent as a percentage of budgeted, 0 when nothing is budgeted.
    pub percentage: Decimal,
    /// Whether spending exceeds the budget.
    pub is_over_budget: bool,
}

impl BudgetSummary {
    fn new(category: BudgetLine, budgeted: Decimal, spent: Decimal) -> Self {
        let percentage = if budgeted > Decimal::ZERO {
            spent
                .checked_div(budgeted)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or_else(
                    || {
                        if spent.is_sign_negative() {
                            Decimal::MIN
                        } else {
                            Decimal::MAX
                        }
                    },
                    round_money,
                )
        } else {
            Decimal::ZERO
        };
        Self {
            category,
            budgeted,
            spent,
            remaining: budgeted.saturating_sub(spent),
            percentage,
            is_over_budget: spent > budgeted,
        }
    }
}

/// Total non-settlement spending per category.
///
/// A record that would push its category total out of `Decimal` range is
/// left out.
#[must_use]
pub fn spending_by_category(expenses: &[Expense]) -> BTreeMap<Category, Decimal> {
    expenses
        .iter()
        .filter(|e| !e.is_settlement)
        .fold(BTreeMap::new(), |mut acc, e| {
            let total = acc.entry(e.category).or_default();
            match total.checked_add(e.amount) {
                Some(sum) => *total = sum,
                None => tracing::debug!(
                    expense = %e.id,
                    "skipping expense: category total out of range"
                ),
            }
            acc
        })
}

/// Summarize spending against a budget.
///
/// The first entry is always the total. Category entries follow in
/// [`Category::BUDGETED`] order, only for categories with a positive budget.
/// Without a budget the summary is empty.
///
/// # Examples
///
/// ```
/// use tripsplit_core::{calculate_budget_summary, Budget, BudgetLine, Category, Expense};
/// use rust_decimal_macros::dec;
///
/// let budget = Budget::new(dec!(500)).with_category(Category::Food, dec!(100));
/// let lunch = Expense::new("e-1", dec!(120), "a")
///     .with_category(Category::Food)
///     .with_participant("a");
///
/// let summary = calculate_budget_summary(Some(&budget), &[lunch]);
/// assert_eq!(summary.len(), 2);
/// assert_eq!(summary[0].category, BudgetLine::Total);
/// assert!(!summary[0].is_over_budget);
/// assert!(summary[1].is_over_budget);
/// assert_eq!(summary[1].percentage, dec!(120));
/// ```
#[must_use]
pub fn calculate_budget_summary(budget: Option<&Budget>, expenses: &[Expense]) -> Vec<BudgetSummary> {
    let Some(budget) = budget else {
        return Vec::new();
    };

    let spending = spending_by_category(expenses);
    let total_spent = spending
        .values()
        .fold(Decimal::ZERO, |acc, spent| acc.saturating_add(*spent));

    let mut summaries = vec![BudgetSummary::new(
        BudgetLine::Total,
        budget.total_budget,
        total_spent,
    )];

    summaries.extend(Category::BUDGETED.iter().filter_map(|category| {
        let budgeted = budget
            .category_budgets
            .get(category)
            .copied()
            .unwrap_or_default();
        (budgeted > Decimal::ZERO).then(|| {
            let spent = spending.get(category).copied().unwrap_or_default();
            BudgetSummary::new(BudgetLine::Category(*category), budgeted, spent)
        })
    }));

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spend(id: &str, amount: Decimal, category: Category) -> Expense {
        Expense::new(id, amount, "a")
            .with_participant("a")
            .with_category(category)
    }

    #[test]
    fn test_no_budget_is_empty() {
        let expenses = vec![spend("1", dec!(10), Category::Food)];
        assert!(calculate_budget_summary(None, &expenses).is_empty());
    }

    #[test]
    fn test_settlements_are_not_spending() {
        let expenses = vec![
            spend("1", dec!(40), Category::Food),
            Expense::new("s", dec!(20), "a")
                .with_participants(["a", "b"])
                .as_settlement(),
        ];
        let summary = calculate_budget_summary(Some(&Budget::new(dec!(100))), &expenses);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].spent, dec!(40));
        assert_eq!(summary[0].remaining, dec!(60));
        assert_eq!(summary[0].percentage, dec!(40));
    }

    #[test]
    fn test_category_lines_in_fixed_order_only_when_budgeted() {
        let budget = Budget::new(dec!(1000))
            .with_category(Category::Other, dec!(50))
            .with_category(Category::Food, dec!(300))
            .with_category(Category::Activities, dec!(0));
        let expenses = vec![
            spend("1", dec!(75.50), Category::Food),
            spend("2", dec!(60), Category::Other),
            spend("3", dec!(200), Category::Accommodation),
        ];
        let summary = calculate_budget_summary(Some(&budget), &expenses);

        let lines: Vec<BudgetLine> = summary.iter().map(|s| s.category).collect();
        assert_eq!(
            lines,
            vec![
                BudgetLine::Total,
                BudgetLine::Category(Category::Food),
                BudgetLine::Category(Category::Other),
            ]
        );
        assert_eq!(summary[0].spent, dec!(335.50));
        assert_eq!(summary[1].percentage, dec!(25.17));
        assert!(summary[2].is_over_budget);
        assert_eq!(summary[2].remaining, dec!(-10));
    }

    #[test]
    fn test_zero_total_budget_percentage_is_zero() {
        let expenses = vec![spend("1", dec!(10), Category::Food)];
        let summary = calculate_budget_summary(Some(&Budget::new(dec!(0))), &expenses);
        assert_eq!(summary[0].percentage, dec!(0));
        assert!(summary[0].is_over_budget);
    }

    #[test]
    fn test_budget_serde() {
        let json = r#"{"totalBudget": "500", "categoryBudgets": {"food": 200, "transportation": "80.5"}}"#;
        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.total_budget, dec!(500));
        assert_eq!(budget.category_budgets.get(&Category::Food), Some(&dec!(200)));
        assert_eq!(
            budget.category_budgets.get(&Category::Transportation),
            Some(&dec!(80.5))
        );
    }

    #[test]
    fn test_summary_serializes_line_as_string() {
        let summary = BudgetSummary::new(BudgetLine::Category(Category::Food), dec!(10), dec!(5));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["category"], "food");
        assert_eq!(json["isOverBudget"], false);
    }

    #[test]
    fn test_overflowing_spending_is_skipped() {
        let huge = |id: &str| {
            Expense::new(id, Decimal::MAX, "a")
                .with_participant("a")
                .with_category(Category::Food)
        };
        let spending = spending_by_category(&[huge("e1"), huge("e2")]);
        assert_eq!(spending.get(&Category::Food), Some(&Decimal::MAX));
    }

    #[test]
    fn test_summary_survives_extreme_amounts() {
        let budget = Budget::new(dec!(0.0001)).with_category(Category::Food, dec!(1));
        let expenses = vec![
            Expense::new("e1", Decimal::MAX, "a")
                .with_participant("a")
                .with_category(Category::Food),
            Expense::new("e2", Decimal::MAX, "a")
                .with_participant("a")
                .with_category(Category::Other),
        ];

        let summary = calculate_budget_summary(Some(&budget), &expenses);
        assert_eq!(summary[0].spent, Decimal::MAX);
        assert_eq!(summary[0].percentage, Decimal::MAX);
        assert!(summary[0].is_over_budget);
        assert_eq!(summary[1].percentage, Decimal::MAX);
        assert_eq!(summary[1].remaining, dec!(1) - Decimal::MAX);
    }
}

//! Expense records.
//!
//! An [`Expense`] is one financial event on a trip: either a real purchase
//! that someone fronted for a group of participants, or a settlement
//! transfer recorded when one member pays another back.
//!
//! The stored form keeps the application's loosely-typed `splitType` and
//! optional `shares` fields; in memory they collapse into the closed
//! [`Split`] enum so an uneven split always carries its shares.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::id::{ExpenseId, MemberId};

/// Classification tag used for budget reporting.
///
/// Irrelevant to balance math.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Food and dining.
    Food,
    /// Hotels, rentals.
    Accommodation,
    /// Flights, trains, fuel.
    Transportation,
    /// Tours, tickets.
    Activities,
    /// Anything else.
    #[default]
    Other,
    /// Debt settlement transfers.
    Settlement,
}

impl Category {
    /// Categories that can carry a budget, in reporting order.
    pub const BUDGETED: [Self; 5] = [
        Self::Food,
        Self::Accommodation,
        Self::Transportation,
        Self::Activities,
        Self::Other,
    ];

    /// The tag as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Accommodation => "accommodation",
            Self::Transportation => "transportation",
            Self::Activities => "activities",
            Self::Other => "other",
            Self::Settlement => "settlement",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Food => "Food & Dining",
            Self::Accommodation => "Accommodation",
            Self::Transportation => "Transportation",
            Self::Activities => "Activities",
            Self::Other => "Other",
            Self::Settlement => "Settlement",
        }
    }

    /// Emoji shown next to the category.
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Food => "🍔",
            Self::Accommodation => "🏠",
            Self::Transportation => "🚗",
            Self::Activities => "🎯",
            Self::Other | Self::Settlement => "📦",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "accommodation" => Ok(Self::Accommodation),
            "transportation" => Ok(Self::Transportation),
            "activities" => Ok(Self::Activities),
            "other" => Ok(Self::Other),
            "settlement" => Ok(Self::Settlement),
            _ => Err(format!("unknown expense category: {s}")),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stored `splitType` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Divide evenly across participants.
    #[default]
    Equal,
    /// Divide according to explicit shares.
    Uneven,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Uneven => write!(f, "uneven"),
        }
    }
}

/// How the cost of an expense is divided.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Split {
    /// `amount / participants.len()` per participant.
    #[default]
    Equal,
    /// Exact amount owed per member.
    ///
    /// Only members that appear as keys are charged; a participant missing
    /// from the map owes nothing for this expense.
    Uneven(BTreeMap<MemberId, Decimal>),
}

impl Split {
    /// The tag stored for this split.
    #[must_use]
    pub const fn split_type(&self) -> SplitType {
        match self {
            Self::Equal => SplitType::Equal,
            Self::Uneven(_) => SplitType::Uneven,
        }
    }
}

/// One financial event on a trip.
///
/// # Examples
///
/// ```
/// use tripsplit_core::{Category, Expense};
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new("e-1", dec!(90), "alice")
///     .with_description("Dinner")
///     .with_category(Category::Food)
///     .with_participants(["alice", "bob", "carol"]);
///
/// assert_eq!(dinner.participants.len(), 3);
/// assert!(!dinner.is_settlement);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ExpenseRecord", into = "ExpenseRecord")]
pub struct Expense {
    /// Expense id.
    pub id: ExpenseId,
    /// Free-text description.
    pub description: String,
    /// Total amount, non-negative for well-formed records.
    pub amount: Decimal,
    /// Member who fronted the money.
    pub paid_by: MemberId,
    /// Members sharing the cost.
    pub participants: Vec<MemberId>,
    /// How the cost is divided.
    pub split: Split,
    /// Budget category.
    pub category: Category,
    /// Marks a debt-settlement transfer rather than a purchase.
    pub is_settlement: bool,
    /// Day the expense happened.
    pub date: Option<NaiveDate>,
}

impl Expense {
    /// Create an equal-split expense with no participants yet.
    #[must_use]
    pub fn new(id: impl Into<ExpenseId>, amount: Decimal, paid_by: impl Into<MemberId>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            amount,
            paid_by: paid_by.into(),
            participants: Vec::new(),
            split: Split::Equal,
            category: Category::Other,
            is_settlement: false,
            date: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a participant.
    #[must_use]
    pub fn with_participant(mut self, member: impl Into<MemberId>) -> Self {
        self.participants.push(member.into());
        self
    }

    /// Add several participants.
    #[must_use]
    pub fn with_participants<I, M>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        self.participants.extend(members.into_iter().map(Into::into));
        self
    }

    /// Set one member's share, switching the expense to an uneven split.
    #[must_use]
    pub fn with_share(mut self, member: impl Into<MemberId>, share: Decimal) -> Self {
        match &mut self.split {
            Split::Uneven(shares) => {
                shares.insert(member.into(), share);
            }
            Split::Equal => {
                let mut shares = BTreeMap::new();
                shares.insert(member.into(), share);
                self.split = Split::Uneven(shares);
            }
        }
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Mark this record as a settlement transfer.
    #[must_use]
    pub fn as_settlement(mut self) -> Self {
        self.is_settlement = true;
        self.category = Category::Settlement;
        self
    }

    /// The uneven shares, if any.
    #[must_use]
    pub const fn shares(&self) -> Option<&BTreeMap<MemberId, Decimal>> {
        match &self.split {
            Split::Uneven(shares) => Some(shares),
            Split::Equal => None,
        }
    }

    /// For a settlement, the member being paid: the first participant that
    /// is not the payer.
    #[must_use]
    pub fn counterparty(&self) -> Option<&MemberId> {
        self.participants.iter().find(|p| **p != self.paid_by)
    }

    /// Check if the member pays for, takes part in, or holds a share of
    /// this expense.
    #[must_use]
    pub fn involves(&self, member: &str) -> bool {
        self.paid_by == member
            || self.participants.iter().any(|p| *p == member)
            || self
                .shares()
                .is_some_and(|shares| shares.contains_key(member))
    }
}

/// Stored form of an [`Expense`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseRecord {
    id: ExpenseId,
    #[serde(default)]
    description: String,
    amount: Decimal,
    paid_by: MemberId,
    #[serde(default)]
    participants: Vec<MemberId>,
    #[serde(default)]
    split_type: SplitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shares: Option<BTreeMap<MemberId, Decimal>>,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    is_settlement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        // "uneven" without a shares map is split equally.
        let split = match (record.split_type, record.shares) {
            (SplitType::Uneven, Some(shares)) => Split::Uneven(shares),
            _ => Split::Equal,
        };
        Self {
            id: record.id,
            description: record.description,
            amount: record.amount,
            paid_by: record.paid_by,
            participants: record.participants,
            split,
            category: record.category,
            is_settlement: record.is_settlement,
            date: record.date,
        }
    }
}

impl From<Expense> for ExpenseRecord {
    fn from(expense: Expense) -> Self {
        let split_type = expense.split.split_type();
        let shares = match expense.split {
            Split::Uneven(shares) => Some(shares),
            Split::Equal => None,
        };
        Self {
            id: expense.id,
            description: expense.description,
            amount: expense.amount,
            paid_by: expense.paid_by,
            participants: expense.participants,
            split_type,
            shares,
            category: expense.category,
            is_settlement: expense.is_settlement,
            date: expense.date,
        }
    }
}

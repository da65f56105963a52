//! Net balance per member.
//!
//! [`calculate_balances`] folds a trip's expenses into one running total per
//! roster member:
//!
//! - a purchase credits the payer with the full amount and debits each
//!   participant with their share;
//! - a settlement credits the payer and debits the member being paid.
//!
//! The fold is total. A malformed record (negative amount, negative share,
//! nobody to charge, totals out of `Decimal` range) contributes nothing, and ids that are not on the roster
//! are ignored, so one bad historical record never hides everyone else's
//! balance. Totals are rounded to cents once, at the end.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::expense::{Expense, Split};
use crate::id::MemberId;
use crate::member::Member;
use crate::money::{round_money, SHARE_DP};

/// A member's net position.
///
/// Positive means the group owes the member; negative means the member owes
/// the group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Member id.
    pub member_id: MemberId,
    /// Member display name.
    pub member_name: String,
    /// Net amount, rounded to cents.
    pub amount: Decimal,
}

impl Balance {
    /// Create a balance for a member.
    #[must_use]
    pub fn new(member: &Member, amount: Decimal) -> Self {
        Self {
            member_id: member.id.clone(),
            member_name: member.name.clone(),
            amount,
        }
    }

    /// Check if the group owes this member.
    #[must_use]
    pub fn is_creditor(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Check if this member owes the group.
    #[must_use]
    pub fn is_debtor(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Why an expense leaves every balance untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The amount is below zero.
    NegativeAmount,
    /// An uneven share is below zero.
    NegativeShare(MemberId),
    /// A purchase with nobody to charge.
    NoParticipants,
    /// A settlement without anyone other than the payer.
    NoCounterparty,
    /// Adding the record would push a running total past the `Decimal` range.
    Overflow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "negative amount"),
            Self::NegativeShare(member) => write!(f, "negative share for member {member}"),
            Self::NoParticipants => write!(f, "no participants"),
            Self::NoCounterparty => write!(f, "settlement has no counterparty"),
            Self::Overflow => write!(f, "running total out of range"),
        }
    }
}

/// The balance movements a single expense produces, before roster
/// filtering.
///
/// Positive deltas are credits, negative deltas are debits. The same member
/// may appear more than once (a payer who also participates).
///
/// # Examples
///
/// ```
/// use tripsplit_core::{expense_effects, Expense, MemberId};
/// use rust_decimal_macros::dec;
///
/// let taxi = Expense::new("e-1", dec!(30), "a").with_participants(["a", "b"]);
/// let effects = expense_effects(&taxi).unwrap();
///
/// assert_eq!(effects.len(), 3);
/// assert_eq!(effects[0], (MemberId::from("a"), dec!(30)));
/// assert_eq!(effects[1], (MemberId::from("a"), dec!(-15)));
/// assert_eq!(effects[2], (MemberId::from("b"), dec!(-15)));
/// ```
pub fn expense_effects(expense: &Expense) -> Result<Vec<(MemberId, Decimal)>, SkipReason> {
    let amount = expense.amount;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SkipReason::NegativeAmount);
    }

    if expense.is_settlement {
        let receiver = expense.counterparty().ok_or(SkipReason::NoCounterparty)?;
        return Ok(vec![
            (expense.paid_by.clone(), amount),
            (receiver.clone(), -amount),
        ]);
    }

    if expense.participants.is_empty() {
        return Err(SkipReason::NoParticipants);
    }

    let mut effects = Vec::with_capacity(expense.participants.len() + 1);
    effects.push((expense.paid_by.clone(), amount));

    match &expense.split {
        Split::Uneven(shares) => {
            if let Some((member, _)) = shares.iter().find(|(_, share)| **share < Decimal::ZERO) {
                return Err(SkipReason::NegativeShare(member.clone()));
            }
            effects.extend(shares.iter().map(|(member, share)| (member.clone(), -*share)));
        }
        Split::Equal => {
            let per_person = (amount / Decimal::from(expense.participants.len()))
                .round_dp_with_strategy(SHARE_DP, RoundingStrategy::MidpointAwayFromZero);
            effects.extend(
                expense
                    .participants
                    .iter()
                    .map(|member| (member.clone(), -per_person)),
            );
        }
    }

    Ok(effects)
}

/// Running totals keyed by roster member.
#[derive(Debug, Clone, Default)]
struct Ledger {
    totals: HashMap<MemberId, Decimal>,
}

impl Ledger {
    fn for_roster(members: &[Member]) -> Self {
        Self {
            totals: members
                .iter()
                .map(|m| (m.id.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Fold one expense in, returning the updated ledger.
    ///
    /// A record is applied whole or not at all.
    fn apply(mut self, expense: &Expense) -> Self {
        match expense_effects(expense).and_then(|effects| self.stage(expense, effects)) {
            Ok(staged) => self.totals.extend(staged),
            Err(reason) => {
                tracing::debug!(expense = %expense.id, %reason, "skipping expense");
            }
        }
        self
    }

    /// New totals for the members an expense touches.
    fn stage(
        &self,
        expense: &Expense,
        effects: Vec<(MemberId, Decimal)>,
    ) -> Result<HashMap<MemberId, Decimal>, SkipReason> {
        let mut staged: HashMap<MemberId, Decimal> = HashMap::new();
        for (member, delta) in effects {
            // Ids not on the roster (e.g. removed members) are ignored.
            let Some(current) = self.totals.get(&member) else {
                tracing::debug!(
                    expense = %expense.id,
                    member = %member,
                    "ignoring member not on roster"
                );
                continue;
            };
            let total = staged.entry(member).or_insert(*current);
            *total = total.checked_add(delta).ok_or(SkipReason::Overflow)?;
        }
        Ok(staged)
    }

    fn total(&self, member: &MemberId) -> Decimal {
        self.totals.get(member).copied().unwrap_or_default()
    }
}

/// Compute each member's net balance from a trip's expenses.
///
/// One [`Balance`] is returned per roster member, in roster order. The
/// result does not depend on the order of `expenses` unless a record is
/// skipped for overflowing a running total, in which case the first record
/// to overflow is the one dropped.
///
/// # Examples
///
/// ```
/// use tripsplit_core::{calculate_balances, Expense, Member};
/// use rust_decimal_macros::dec;
///
/// let members = vec![
///     Member::new("a", "Alice"),
///     Member::new("b", "Bob"),
///     Member::new("c", "Carol"),
/// ];
/// let dinner = Expense::new("e-1", dec!(90), "a").with_participants(["a", "b", "c"]);
///
/// let balances = calculate_balances(&[dinner], &members);
/// assert_eq!(balances[0].amount, dec!(60));
/// assert_eq!(balances[1].amount, dec!(-30));
/// assert_eq!(balances[2].amount, dec!(-30));
/// ```
#[must_use]
pub fn calculate_balances(expenses: &[Expense], members: &[Member]) -> Vec<Balance> {
    let ledger = expenses
        .iter()
        .fold(Ledger::for_roster(members), Ledger::apply);

    members
        .iter()
        .map(|member| Balance::new(member, round_money(ledger.total(&member.id))))
        .collect()
}

//! Expense validation rules.
//!
//! The balance engine accepts any snapshot and quietly skips records it
//! cannot use. This crate holds the rules the application checks *before*
//! a record is stored, so that bad data is rejected at the form instead of
//! silently ignored later:
//!
//! - Amount and description requirements
//! - Roster membership of payers and participants
//! - Uneven shares adding up to the total
//! - Settlement shape
//! - Member removal while still referenced
//!
//! # Error Codes
//!
//! | Code | Description |
//! |------|-------------|
//! | V1001 | Amount below the 0.01 minimum |
//! | V1002 | Missing description |
//! | V1003 | Purchase with no participants |
//! | V2001 | Payer not on the roster |
//! | V2002 | Participant not on the roster |
//! | V3001 | Uneven shares do not add up to the amount |
//! | V3002 | Share assigned to a non-participant (warning) |
//! | V3003 | Negative share |
//! | V3004 | Participant without a share is not charged (warning) |
//! | V4001 | Settlement without a counterparty |
//! | V4002 | Settlement with more than one counterparty (warning) |
//! | V5001 | Member still referenced by expenses |
//! | V5002 | Duplicate member id in roster |
//! | V5003 | Duplicate expense id |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;
use tripsplit_core::money::{eq_with_tolerance, SETTLEMENT_TOLERANCE};
use tripsplit_core::{Expense, ExpenseId, Member, MemberId, Split};

/// Smallest amount an expense may record.
pub const MIN_AMOUNT: Decimal = SETTLEMENT_TOLERANCE;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // === Expense Errors (V1xxx) ===
    /// V1001: Amount below the minimum.
    AmountTooSmall,
    /// V1002: Missing description.
    MissingDescription,
    /// V1003: Purchase with no participants.
    NoParticipants,

    // === Roster Errors (V2xxx) ===
    /// V2001: Payer not on the roster.
    UnknownPayer,
    /// V2002: Participant not on the roster.
    UnknownParticipant,

    // === Share Errors (V3xxx) ===
    /// V3001: Shares do not add up to the amount.
    SharesMismatch,
    /// V3002: Share assigned to someone who is not a participant.
    ShareWithoutParticipant,
    /// V3003: Negative share.
    NegativeShare,
    /// V3004: Participant missing from the shares map.
    ParticipantWithoutShare,

    // === Settlement Errors (V4xxx) ===
    /// V4001: Settlement without a counterparty.
    SettlementWithoutCounterparty,
    /// V4002: Settlement naming several counterparties.
    SettlementMultipleCounterparties,

    // === Roster Integrity Errors (V5xxx) ===
    /// V5001: Member still referenced by expenses.
    MemberInUse,
    /// V5002: Duplicate member id.
    DuplicateMember,
    /// V5003: Duplicate expense id.
    DuplicateExpense,
}

impl ErrorCode {
    /// Get the error code string (e.g., "V1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AmountTooSmall => "V1001",
            Self::MissingDescription => "V1002",
            Self::NoParticipants => "V1003",
            Self::UnknownPayer => "V2001",
            Self::UnknownParticipant => "V2002",
            Self::SharesMismatch => "V3001",
            Self::ShareWithoutParticipant => "V3002",
            Self::NegativeShare => "V3003",
            Self::ParticipantWithoutShare => "V3004",
            Self::SettlementWithoutCounterparty => "V4001",
            Self::SettlementMultipleCounterparties => "V4002",
            Self::MemberInUse => "V5001",
            Self::DuplicateMember => "V5002",
            Self::DuplicateExpense => "V5003",
        }
    }

    /// Check if this is a warning (not an error).
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::ShareWithoutParticipant
                | Self::ParticipantWithoutShare
                | Self::SettlementMultipleCounterparties
        )
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Severity level for validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The record must not be stored.
    Error,
    /// Suspicious but accepted.
    Warning,
}

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ValidationError {
    /// Error code.
    pub code: ErrorCode,
    /// Error message.
    pub message: String,
    /// Expense that failed, if the rule is about an expense.
    pub expense_id: Option<ExpenseId>,
    /// Member involved, if any.
    pub member_id: Option<MemberId>,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            expense_id: None,
            member_id: None,
        }
    }

    /// Attach the expense this error is about.
    #[must_use]
    pub fn for_expense(mut self, id: &ExpenseId) -> Self {
        self.expense_id = Some(id.clone());
        self
    }

    /// Attach the member this error is about.
    #[must_use]
    pub fn for_member(mut self, id: &MemberId) -> Self {
        self.member_id = Some(id.clone());
        self
    }

    /// Check if this error blocks storing the record.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.code.severity(), Severity::Error)
    }
}

/// Validate a whole trip snapshot.
///
/// Returns every problem found, errors and warnings, in roster order then
/// expense order.
#[must_use]
pub fn validate(members: &[Member], expenses: &[Expense]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut seen_members = HashSet::new();
    for member in members {
        if !seen_members.insert(member.id.as_str()) {
            errors.push(
                ValidationError::new(
                    ErrorCode::DuplicateMember,
                    format!("member id {} appears more than once", member.id),
                )
                .for_member(&member.id),
            );
        }
    }

    let mut seen_expenses = HashSet::new();
    for expense in expenses {
        if !seen_expenses.insert(expense.id.as_str()) {
            errors.push(
                ValidationError::new(
                    ErrorCode::DuplicateExpense,
                    format!("expense id {} appears more than once", expense.id),
                )
                .for_expense(&expense.id),
            );
        }
        errors.extend(validate_expense(expense, members));
    }

    tracing::debug!(
        members = members.len(),
        expenses = expenses.len(),
        problems = errors.len(),
        "validated trip"
    );
    errors
}

/// Validate a single expense against the roster.
#[must_use]
pub fn validate_expense(expense: &Expense, members: &[Member]) -> Vec<ValidationError> {
    let roster: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
    let mut errors = Vec::new();
    let mut push = |error: ValidationError| errors.push(error.for_expense(&expense.id));

    if expense.amount < MIN_AMOUNT {
        push(ValidationError::new(
            ErrorCode::AmountTooSmall,
            format!("amount {} is below the minimum of {MIN_AMOUNT}", expense.amount),
        ));
    }

    if !roster.contains(expense.paid_by.as_str()) {
        push(
            ValidationError::new(
                ErrorCode::UnknownPayer,
                format!("payer {} is not a member of this trip", expense.paid_by),
            )
            .for_member(&expense.paid_by),
        );
    }

    for participant in &expense.participants {
        if !roster.contains(participant.as_str()) {
            push(
                ValidationError::new(
                    ErrorCode::UnknownParticipant,
                    format!("participant {participant} is not a member of this trip"),
                )
                .for_member(participant),
            );
        }
    }

    if expense.is_settlement {
        check_settlement(expense, &mut push);
    } else {
        if expense.description.trim().is_empty() {
            push(ValidationError::new(
                ErrorCode::MissingDescription,
                "description is required",
            ));
        }
        if expense.participants.is_empty() {
            push(ValidationError::new(
                ErrorCode::NoParticipants,
                "at least one participant is required",
            ));
        }
        if let Split::Uneven(shares) = &expense.split {
            check_shares(expense, shares, &mut push);
        }
    }

    errors
}

fn check_settlement(expense: &Expense, push: &mut impl FnMut(ValidationError)) {
    let counterparties: HashSet<&str> = expense
        .participants
        .iter()
        .filter(|p| **p != expense.paid_by)
        .map(MemberId::as_str)
        .collect();

    match counterparties.len() {
        0 => push(ValidationError::new(
            ErrorCode::SettlementWithoutCounterparty,
            "settlement must name the member being paid",
        )),
        1 => {}
        n => push(ValidationError::new(
            ErrorCode::SettlementMultipleCounterparties,
            format!("settlement names {n} counterparties; only the first is credited"),
        )),
    }
}

fn check_shares(
    expense: &Expense,
    shares: &std::collections::BTreeMap<MemberId, Decimal>,
    push: &mut impl FnMut(ValidationError),
) {
    match shares
        .values()
        .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(*share))
    {
        Some(total) if eq_with_tolerance(total, expense.amount, SETTLEMENT_TOLERANCE) => {}
        Some(total) => push(ValidationError::new(
            ErrorCode::SharesMismatch,
            format!(
                "shares add up to {total:.2} but the amount is {:.2}",
                expense.amount
            ),
        )),
        None => push(ValidationError::new(
            ErrorCode::SharesMismatch,
            "shares are too large to add up",
        )),
    }

    for (member, share) in shares {
        if *share < Decimal::ZERO {
            push(
                ValidationError::new(
                    ErrorCode::NegativeShare,
                    format!("share for {member} is negative: {share}"),
                )
                .for_member(member),
            );
        }
        if !expense.participants.contains(member) {
            push(
                ValidationError::new(
                    ErrorCode::ShareWithoutParticipant,
                    format!("{member} has a share but is not a participant"),
                )
                .for_member(member),
            );
        }
    }

    for participant in &expense.participants {
        if !shares.contains_key(participant) {
            push(
                ValidationError::new(
                    ErrorCode::ParticipantWithoutShare,
                    format!("{participant} participates but has no share and will not be charged"),
                )
                .for_member(participant),
            );
        }
    }
}

/// Check that a member can be removed from the trip.
///
/// A member who paid for, takes part in, or holds a share of any expense
/// must stay on the roster, otherwise their part of those expenses would
/// silently drop out of everyone's balances.
pub fn check_member_removal(member_id: &str, expenses: &[Expense]) -> Result<(), ValidationError> {
    let referencing = expenses.iter().filter(|e| e.involves(member_id)).count();
    if referencing == 0 {
        return Ok(());
    }
    Err(ValidationError::new(
        ErrorCode::MemberInUse,
        format!("member {member_id} is referenced by {referencing} expense(s)"),
    )
    .for_member(&MemberId::from(member_id)))
}

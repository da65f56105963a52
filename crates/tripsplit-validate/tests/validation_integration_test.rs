//! Integration tests for the validation crate.
//!
//! Tests cover every rule: amounts and descriptions, roster membership,
//! uneven shares, settlement shape, and roster integrity.

use rust_decimal_macros::dec;
use tripsplit_core::{settlement_expense, calculate_debts, calculate_balances, Expense, Member};
use tripsplit_validate::{check_member_removal, validate, validate_expense, ErrorCode, Severity};

// ============================================================================
// Helper Functions
// ============================================================================

fn roster() -> Vec<Member> {
    vec![
        Member::new("a", "Alice"),
        Member::new("b", "Bob"),
        Member::new("c", "Carol"),
    ]
}

fn codes_for(expense: &Expense) -> Vec<ErrorCode> {
    validate_expense(expense, &roster())
        .iter()
        .map(|e| e.code)
        .collect()
}

fn dinner() -> Expense {
    Expense::new("e1", dec!(90), "a")
        .with_description("Dinner")
        .with_participants(["a", "b", "c"])
}

// ============================================================================
// Expense Tests (V1xxx)
// ============================================================================

#[test]
fn test_clean_trip() {
    assert!(validate(&roster(), &[dinner()]).is_empty());
}

#[test]
fn test_v1001_amount_too_small() {
    let mut expense = dinner();
    expense.amount = dec!(0);
    assert_eq!(codes_for(&expense), vec![ErrorCode::AmountTooSmall]);

    expense.amount = dec!(0.01);
    assert!(codes_for(&expense).is_empty(), "0.01 is the minimum");
}

#[test]
fn test_v1002_missing_description() {
    let mut expense = dinner();
    expense.description = "   ".to_string();
    assert_eq!(codes_for(&expense), vec![ErrorCode::MissingDescription]);
}

#[test]
fn test_v1003_no_participants() {
    let expense = Expense::new("e1", dec!(10), "a").with_description("Snacks");
    assert_eq!(codes_for(&expense), vec![ErrorCode::NoParticipants]);
}

// ============================================================================
// Roster Tests (V2xxx)
// ============================================================================

#[test]
fn test_v2001_unknown_payer() {
    let mut expense = dinner();
    expense.paid_by = "zed".into();
    assert_eq!(codes_for(&expense), vec![ErrorCode::UnknownPayer]);
}

#[test]
fn test_v2002_unknown_participant_reported_once_each() {
    let expense = dinner().with_participants(["x", "y"]);
    assert_eq!(
        codes_for(&expense),
        vec![ErrorCode::UnknownParticipant, ErrorCode::UnknownParticipant]
    );
}

// ============================================================================
// Share Tests (V3xxx)
// ============================================================================

#[test]
fn test_uneven_split_matching_total() {
    let expense = Expense::new("e1", dec!(100), "a")
        .with_description("Hotel")
        .with_participants(["a", "b"])
        .with_share("a", dec!(70))
        .with_share("b", dec!(30));
    assert!(codes_for(&expense).is_empty());
}

#[test]
fn test_v3001_shares_mismatch() {
    let expense = Expense::new("e1", dec!(100), "a")
        .with_description("Hotel")
        .with_participants(["a", "b"])
        .with_share("a", dec!(70))
        .with_share("b", dec!(20));
    let errors = validate_expense(&expense, &roster());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::SharesMismatch);
    assert!(errors[0].to_string().contains("90.00"), "{}", errors[0]);
}

#[test]
fn test_v3001_penny_tolerance() {
    let expense = Expense::new("e1", dec!(100), "a")
        .with_description("Hotel")
        .with_participants(["a", "b", "c"])
        .with_share("a", dec!(33.33))
        .with_share("b", dec!(33.33))
        .with_share("c", dec!(33.33));
    assert!(codes_for(&expense).is_empty(), "99.99 is within a cent");
}

#[test]
fn test_v3002_v3004_share_and_participant_disagree() {
    let expense = Expense::new("e1", dec!(50), "a")
        .with_description("Museum")
        .with_participants(["a", "b"])
        .with_share("a", dec!(25))
        .with_share("c", dec!(25));
    let errors = validate_expense(&expense, &roster());
    let codes: Vec<_> = errors.iter().map(|e| e.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::ShareWithoutParticipant, ErrorCode::ParticipantWithoutShare]
    );
    assert!(errors.iter().all(|e| e.code.severity() == Severity::Warning));
    assert!(errors.iter().all(|e| !e.is_error()));
}

#[test]
fn test_v3003_negative_share() {
    let expense = Expense::new("e1", dec!(10), "a")
        .with_description("Refund mixup")
        .with_participants(["a", "b"])
        .with_share("a", dec!(20))
        .with_share("b", dec!(-10));
    assert_eq!(codes_for(&expense), vec![ErrorCode::NegativeShare]);
}

// ============================================================================
// Settlement Tests (V4xxx)
// ============================================================================

#[test]
fn test_generated_settlement_is_valid() {
    let expenses = vec![dinner()];
    let balances = calculate_balances(&expenses, &roster());
    let debts = calculate_debts(&balances, &roster());
    assert!(!debts.is_empty());

    for (i, debt) in debts.iter().enumerate() {
        let settlement = settlement_expense(debt, format!("s{i}"), None);
        assert!(codes_for(&settlement).is_empty(), "{settlement:?}");
    }
}

#[test]
fn test_settlement_needs_no_description() {
    let settlement = Expense::new("s1", dec!(5), "b")
        .with_participants(["b", "a"])
        .as_settlement();
    assert!(codes_for(&settlement).is_empty());
}

#[test]
fn test_v4001_settlement_without_counterparty() {
    let settlement = Expense::new("s1", dec!(5), "b")
        .with_participant("b")
        .as_settlement();
    assert_eq!(
        codes_for(&settlement),
        vec![ErrorCode::SettlementWithoutCounterparty]
    );
}

#[test]
fn test_v4002_settlement_multiple_counterparties() {
    let settlement = Expense::new("s1", dec!(5), "b")
        .with_participants(["b", "a", "c"])
        .as_settlement();
    assert_eq!(
        codes_for(&settlement),
        vec![ErrorCode::SettlementMultipleCounterparties]
    );
}

// ============================================================================
// Roster Integrity Tests (V5xxx)
// ============================================================================

#[test]
fn test_v5001_member_in_use() {
    let expenses = vec![dinner()];
    let err = check_member_removal("b", &expenses).unwrap_err();
    assert_eq!(err.code, ErrorCode::MemberInUse);
    assert_eq!(err.code.code(), "V5001");
    assert!(err.member_id.is_some());
}

#[test]
fn test_member_removal_allowed_when_unused() {
    let expenses = vec![Expense::new("e1", dec!(10), "a")
        .with_description("Coffee")
        .with_participant("a")];
    assert!(check_member_removal("c", &expenses).is_ok());
}

#[test]
fn test_member_removal_blocked_by_share_only() {
    let expenses = vec![Expense::new("e1", dec!(10), "a")
        .with_description("Coffee")
        .with_participant("a")
        .with_share("c", dec!(10))];
    assert!(check_member_removal("c", &expenses).is_err());
}

#[test]
fn test_v5002_duplicate_member() {
    let mut members = roster();
    members.push(Member::new("a", "Alice again"));
    let errors = validate(&members, &[]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ErrorCode::DuplicateMember);
}

#[test]
fn test_v5003_duplicate_expense() {
    let errors = validate(&roster(), &[dinner(), dinner()]);
    let codes: Vec<_> = errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorCode::DuplicateExpense]);
}

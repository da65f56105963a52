//! Settlement suggestions.
//!
//! [`calculate_debts`] turns net balances into a short list of pairwise
//! transfers using the greedy match: the largest debtor pays the largest
//! creditor until one of them is square, then the next one steps in. It is
//! not guaranteed to find the fewest possible transfers, but the output is
//! easy to follow and fully determined by the input order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::balance::Balance;
use crate::member::{Member, MemberRef};
use crate::money::{is_settled, round_money, SETTLEMENT_TOLERANCE};

/// A suggested transfer from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Debt {
    /// Member who pays.
    pub from: MemberRef,
    /// Member who is paid.
    pub to: MemberRef,
    /// Amount to transfer, rounded to cents.
    pub amount: Decimal,
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {} {}", self.from, self.to, self.amount)
    }
}

/// A member still in the matching queue.
#[derive(Debug)]
struct Party<'a> {
    member: &'a Member,
    remaining: Decimal,
}

/// Unsettled balances on one side of the ledger, joined to their members.
fn parties<'a>(
    balances: &[Balance],
    roster: &HashMap<&str, &'a Member>,
    keep: fn(&Balance) -> bool,
) -> Vec<Party<'a>> {
    balances
        .iter()
        .filter(|b| keep(b) && !is_settled(b.amount))
        .filter_map(|b| {
            let Some(member) = roster.get(b.member_id.as_str()).copied() else {
                tracing::debug!(member = %b.member_id, "dropping balance for unknown member");
                return None;
            };
            Some(Party {
                member,
                remaining: b.amount.abs(),
            })
        })
        .collect()
}

/// Compute the transfers that settle every balance.
///
/// - Balances within ±0.01 of zero are treated as settled.
/// - Debtors are matched most-indebted first; creditors are drained
///   largest-first, and the current creditor keeps receiving until its
///   remaining credit is within tolerance.
/// - Ties keep the input order.
/// - A balance whose member is not in `members` is dropped.
///
/// # Examples
///
/// ```
/// use tripsplit_core::{calculate_debts, Balance, Member};
/// use rust_decimal_macros::dec;
///
/// let members = vec![
///     Member::new("a", "Alice"),
///     Member::new("b", "Bob"),
///     Member::new("c", "Carol"),
/// ];
/// let balances = vec![
///     Balance::new(&members[0], dec!(-30)),
///     Balance::new(&members[1], dec!(-20)),
///     Balance::new(&members[2], dec!(50)),
/// ];
///
/// let debts = calculate_debts(&balances, &members);
/// assert_eq!(debts.len(), 2);
/// assert_eq!((debts[0].from.name.as_str(), debts[0].amount), ("Alice", dec!(30)));
/// assert_eq!((debts[1].from.name.as_str(), debts[1].amount), ("Bob", dec!(20)));
/// ```
#[must_use]
pub fn calculate_debts(balances: &[Balance], members: &[Member]) -> Vec<Debt> {
    let roster: HashMap<&str, &Member> = members.iter().map(|m| (m.id.as_str(), m)).collect();

    // Largest remaining amount first; the sort is stable so ties keep input order.
    let mut debtors = parties(balances, &roster, Balance::is_debtor);
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    let mut creditors = parties(balances, &roster, Balance::is_creditor);
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut debts = Vec::new();
    let mut head = 0;

    for debtor in &debtors {
        let mut remaining = debtor.remaining;

        while remaining > SETTLEMENT_TOLERANCE {
            let Some(creditor) = creditors.get_mut(head) else {
                break;
            };

            let payment = remaining.min(creditor.remaining);
            if payment > SETTLEMENT_TOLERANCE {
                tracing::trace!(
                    from = %debtor.member.id,
                    to = %creditor.member.id,
                    %payment,
                    "matched transfer"
                );
                debts.push(Debt {
                    from: debtor.member.to_ref(),
                    to: creditor.member.to_ref(),
                    amount: round_money(payment),
                });
                remaining -= payment;
                creditor.remaining -= payment;
            }

            if creditor.remaining <= SETTLEMENT_TOLERANCE {
                head += 1;
            }
        }
    }

    debts
}

/// Apply transfers to balances, as if every debt had been paid.
///
/// Each debt raises the payer's balance and lowers the receiver's by its
/// amount. Debts naming members without a balance are ignored.
#[must_use]
pub fn apply_debts(balances: &[Balance], debts: &[Debt]) -> Vec<Balance> {
    let mut settled = balances.to_vec();
    for debt in debts {
        if let Some(from) = settled.iter_mut().find(|b| b.member_id == debt.from.id) {
            from.amount = from.amount.saturating_add(debt.amount);
        }
        if let Some(to) = settled.iter_mut().find(|b| b.member_id == debt.to.id) {
            to.amount = to.amount.saturating_sub(debt.amount);
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn roster(n: usize) -> Vec<Member> {
        ["a", "b", "c", "d", "e"]
            .iter()
            .take(n)
            .map(|id| Member::new(*id, id.to_uppercase()))
            .collect()
    }

    fn balances(members: &[Member], amounts: &[Decimal]) -> Vec<Balance> {
        members
            .iter()
            .zip(amounts)
            .map(|(m, a)| Balance::new(m, *a))
            .collect()
    }

    fn triples(debts: &[Debt]) -> Vec<(&str, &str, Decimal)> {
        debts
            .iter()
            .map(|d| (d.from.id.as_str(), d.to.id.as_str(), d.amount))
            .collect()
    }

    #[test]
    fn test_two_debtors_one_creditor() {
        let members = roster(3);
        let debts = calculate_debts(
            &balances(&members, &[dec!(-30), dec!(-20), dec!(50)]),
            &members,
        );
        assert_eq!(
            triples(&debts),
            vec![("a", "c", dec!(30)), ("b", "c", dec!(20))]
        );
    }

    #[test]
    fn test_one_debtor_two_creditors() {
        let members = roster(3);
        let debts = calculate_debts(
            &balances(&members, &[dec!(10), dec!(-50), dec!(40)]),
            &members,
        );
        assert_eq!(
            triples(&debts),
            vec![("b", "c", dec!(40)), ("b", "a", dec!(10))]
        );
    }

    #[test]
    fn test_debtors_most_negative_first() {
        let members = roster(4);
        let debts = calculate_debts(
            &balances(&members, &[dec!(-10), dec!(-60), dec!(45), dec!(25)]),
            &members,
        );
        assert_eq!(
            triples(&debts),
            vec![
                ("b", "c", dec!(45)),
                ("b", "d", dec!(15)),
                ("a", "d", dec!(10)),
            ]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let members = roster(4);
        let debts = calculate_debts(
            &balances(&members, &[dec!(20), dec!(-20), dec!(20), dec!(-20)]),
            &members,
        );
        assert_eq!(
            triples(&debts),
            vec![("b", "a", dec!(20)), ("d", "c", dec!(20))]
        );
    }

    #[test]
    fn test_empty_balances() {
        let members = roster(3);
        assert!(calculate_debts(&[], &members).is_empty());
    }

    #[test]
    fn test_near_zero_balances_excluded() {
        let members = roster(3);
        let debts = calculate_debts(
            &balances(&members, &[dec!(0.01), dec!(-0.01), dec!(0)]),
            &members,
        );
        assert!(debts.is_empty());
    }

    #[test]
    fn test_penny_residual_does_not_create_transfer() {
        // Creditors hold 0.01 more than debtors owe.
        let members = roster(3);
        let debts = calculate_debts(
            &balances(&members, &[dec!(33.34), dec!(-66.67), dec!(33.34)]),
            &members,
        );
        assert_eq!(
            triples(&debts),
            vec![("b", "a", dec!(33.34)), ("b", "c", dec!(33.33))]
        );
    }

    #[test]
    fn test_creditor_exactly_at_tolerance_terminates() {
        let members = roster(3);
        // After paying a 9.99, a keeps 0.01 of credit and must be retired.
        let debts = calculate_debts(
            &balances(&members, &[dec!(10.00), dec!(-9.99), dec!(-0.02)]),
            &members,
        );
        assert_eq!(triples(&debts), vec![("b", "a", dec!(9.99))]);
    }

    #[test]
    fn test_unknown_member_dropped() {
        let members = roster(2);
        let ghost = Balance {
            member_id: "ghost".into(),
            member_name: "Ghost".to_string(),
            amount: dec!(-5),
        };
        let mut all = balances(&members, &[dec!(-10), dec!(15)]);
        all.push(ghost);

        let debts = calculate_debts(&all, &members);
        assert_eq!(triples(&debts), vec![("a", "b", dec!(10))]);
    }

    #[test]
    fn test_apply_debts_zeroes_balances() {
        let members = roster(4);
        let start = balances(&members, &[dec!(-10), dec!(-60), dec!(45), dec!(25)]);
        let debts = calculate_debts(&start, &members);

        let after = apply_debts(&start, &debts);
        assert!(after.iter().all(|b| b.amount.is_zero()));
    }

    #[test]
    fn test_no_member_both_debtor_and_creditor() {
        let members = roster(5);
        let debts = calculate_debts(
            &balances(
                &members,
                &[dec!(-12.5), dec!(30), dec!(-7.25), dec!(-40), dec!(29.75)],
            ),
            &members,
        );
        for debt in &debts {
            assert!(!debts.iter().any(|d| d.to.id == debt.from.id));
        }
    }
}

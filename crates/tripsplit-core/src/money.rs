//! Money arithmetic helpers.
//!
//! Every amount in the engine is a [`Decimal`], so sums of many small
//! expenses never pick up binary floating-point drift. Amounts are
//! currency-agnostic; attaching a symbol is a display concern handled by
//! [`crate::currency`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept at computation boundaries.
pub const MONEY_DP: u32 = 2;

/// Decimal places carried by equal-split shares.
///
/// Keeping shares at a fixed scale makes every addition in the balance fold
/// exact, so totals do not depend on the order expenses are folded in.
pub const SHARE_DP: u32 = 12;

/// Balances and transfers at or below this magnitude count as settled.
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round an amount to cents, midpoints away from zero.
///
/// This matches how amounts are presented to users (`12.345` shows as
/// `12.35`, `-12.345` as `-12.35`), so a rounded balance never disagrees
/// with its displayed value.
///
/// # Examples
///
/// ```
/// use tripsplit_core::money::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(12.345)), dec!(12.35));
/// assert_eq!(round_money(dec!(-12.345)), dec!(-12.35));
/// assert_eq!(round_money(dec!(0.125)), dec!(0.13));
/// ```
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Check if an amount is within [`SETTLEMENT_TOLERANCE`] of zero.
#[must_use]
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= SETTLEMENT_TOLERANCE
}

/// Check if two amounts are equal within the given tolerance.
#[must_use]
pub fn eq_with_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    a.checked_sub(b)
        .is_some_and(|difference| difference.abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_constant() {
        assert_eq!(SETTLEMENT_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(0.005)), dec!(0.01));
        assert_eq!(round_money(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
        assert_eq!(round_money(dec!(33.333333)), dec!(33.33));
        assert_eq!(round_money(dec!(-66.666666)), dec!(-66.67));
    }

    #[test]
    fn test_is_settled() {
        assert!(is_settled(dec!(0)));
        assert!(is_settled(dec!(0.01)));
        assert!(is_settled(dec!(-0.01)));
        assert!(!is_settled(dec!(0.02)));
        assert!(!is_settled(dec!(-0.011)));
    }

    #[test]
    fn test_eq_with_tolerance() {
        assert!(eq_with_tolerance(dec!(100.00), dec!(99.99), dec!(0.01)));
        assert!(!eq_with_tolerance(dec!(100.00), dec!(99.98), dec!(0.01)));
    }

    #[test]
    fn test_eq_with_tolerance_far_apart() {
        assert!(!eq_with_tolerance(Decimal::MAX, -Decimal::MAX, SETTLEMENT_TOLERANCE));
        assert!(eq_with_tolerance(Decimal::MAX, Decimal::MAX, SETTLEMENT_TOLERANCE));
    }
}

//! Currency display.
//!
//! Amounts in the engine carry no currency. A trip picks one display
//! currency and every amount is formatted with its symbol; there is no
//! conversion between currencies.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::money::{round_money, MONEY_DP};

/// A display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Currency {
    /// ISO 4217 code.
    pub code: &'static str,
    /// Symbol prefixed to amounts.
    pub symbol: &'static str,
    /// English name.
    pub name: &'static str,
}

/// Currencies a trip can be displayed in.
pub const CURRENCIES: [Currency; 10] = [
    Currency::new("USD", "$", "US Dollar"),
    Currency::new("EUR", "€", "Euro"),
    Currency::new("GBP", "£", "British Pound"),
    Currency::new("JPY", "¥", "Japanese Yen"),
    Currency::new("CAD", "C$", "Canadian Dollar"),
    Currency::new("AUD", "A$", "Australian Dollar"),
    Currency::new("INR", "₹", "Indian Rupee"),
    Currency::new("CNY", "¥", "Chinese Yuan"),
    Currency::new("BRL", "R$", "Brazilian Real"),
    Currency::new("MXN", "Mex$", "Mexican Peso"),
];

impl Currency {
    const fn new(code: &'static str, symbol: &'static str, name: &'static str) -> Self {
        Self { code, symbol, name }
    }

    /// Look up a currency by code, case-insensitively.
    #[must_use]
    pub fn find(code: &str) -> Option<Self> {
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .copied()
    }

    /// Look up a currency by code, falling back to the default.
    #[must_use]
    pub fn by_code(code: &str) -> Self {
        Self::find(code).unwrap_or_default()
    }
}

impl Default for Currency {
    fn default() -> Self {
        CURRENCIES[0]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.symbol)
    }
}

/// Format an amount with the currency symbol and two decimals.
///
/// # Examples
///
/// ```
/// use tripsplit_core::currency::{format_amount, Currency};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(12.5), &Currency::by_code("EUR")), "€12.50");
/// assert_eq!(format_amount(dec!(-3), &Currency::default()), "$-3.00");
/// ```
#[must_use]
pub fn format_amount(amount: Decimal, currency: &Currency) -> String {
    format!("{}{}", currency.symbol, fixed(amount))
}

/// Format a balance with an explicit sign: `+$5.00`, `-$5.00` or `$0.00`.
///
/// # Examples
///
/// ```
/// use tripsplit_core::currency::{format_signed, Currency};
/// use rust_decimal_macros::dec;
///
/// let usd = Currency::default();
/// assert_eq!(format_signed(dec!(5), &usd), "+$5.00");
/// assert_eq!(format_signed(dec!(-5), &usd), "-$5.00");
/// assert_eq!(format_signed(dec!(0), &usd), "$0.00");
/// ```
#[must_use]
pub fn format_signed(amount: Decimal, currency: &Currency) -> String {
    if amount > Decimal::ZERO {
        format!("+{}", format_amount(amount, currency))
    } else if amount < Decimal::ZERO {
        format!("-{}", format_amount(amount.abs(), currency))
    } else {
        format_amount(Decimal::ZERO, currency)
    }
}

fn fixed(amount: Decimal) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(MONEY_DP);
    rounded.to_string()
}

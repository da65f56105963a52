//! Core types and engines for tripsplit.
//!
//! This crate turns a trip's expense records into balances and settlement
//! suggestions:
//!
//! - [`Member`], [`Expense`], [`Split`], [`Category`] - the input snapshot
//! - [`calculate_balances`] - net position per member
//! - [`calculate_debts`] - greedy list of transfers that settles everyone
//! - [`settlement_expense`] - the record stored when a debt is paid
//! - [`calculate_budget_summary`] - spending against a trip budget
//! - [`currency`] - display formatting for amounts
//!
//! Everything here is a pure function of its arguments: no I/O, no shared
//! state, safe to call concurrently for any number of trips.
//!
//! # Example
//!
//! ```
//! use tripsplit_core::{calculate_balances, calculate_debts, Expense, Member};
//! use rust_decimal_macros::dec;
//!
//! let members = vec![
//!     Member::new("a", "Alice"),
//!     Member::new("b", "Bob"),
//!     Member::new("c", "Carol"),
//! ];
//! let expenses = vec![
//!     Expense::new("e-1", dec!(90), "a").with_participants(["a", "b", "c"]),
//!     Expense::new("e-2", dec!(100), "c")
//!         .with_participants(["a", "b"])
//!         .with_share("a", dec!(70))
//!         .with_share("b", dec!(30)),
//! ];
//!
//! let balances = calculate_balances(&expenses, &members);
//! assert_eq!(balances[0].amount, dec!(-10)); // +90 - 30 - 70
//! assert_eq!(balances[1].amount, dec!(-60)); // -30 - 30
//! assert_eq!(balances[2].amount, dec!(70)); // +100 - 30
//!
//! let debts = calculate_debts(&balances, &members);
//! assert_eq!(debts.len(), 2);
//! assert_eq!(debts[0].from.name, "Bob");
//! assert_eq!(debts[0].amount, dec!(60));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod budget;
pub mod currency;
pub mod debt;
pub mod expense;
pub mod id;
pub mod member;
pub mod money;
pub mod settle;

pub use balance::{calculate_balances, expense_effects, Balance, SkipReason};
pub use budget::{calculate_budget_summary, spending_by_category, Budget, BudgetLine, BudgetSummary};
pub use currency::{format_amount, format_signed, Currency};
pub use debt::{apply_debts, calculate_debts, Debt};
pub use expense::{Category, Expense, Split, SplitType};
pub use id::{ExpenseId, Id, MemberId, StringInterner};
pub use member::{find_member, Member, MemberRef};
pub use money::{round_money, SETTLEMENT_TOLERANCE};
pub use settle::settlement_expense;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;

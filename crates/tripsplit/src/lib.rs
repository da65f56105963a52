//! Trip expense CLI tools.
//!
//! This crate provides command-line tools for working with trip snapshots:
//!
//! - `tripsplit-report`: Show balances, suggested transfers, budget and a trip summary
//! - `tripsplit-check`: Validate a snapshot
//! - `tripsplit-settle`: Record a settlement transfer
//!
//! # Example Usage
//!
//! ```bash
//! tripsplit-report lisbon.json balances
//! tripsplit-report lisbon.json debts --format json
//! tripsplit-check lisbon.json
//! tripsplit-settle lisbon.json --index 1
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod render;

//! Core of the simulated securities market: the in-memory store, the
//! price simulator, the trade ledger, portfolio valuation and account
//! management.
//!
//! Everything here is synchronous and lock-scoped; the HTTP binding and
//! the tick scheduler live in `market-server`.

pub mod auth;
pub mod catalog;
pub mod ledger;
pub mod simulator;
pub mod store;
pub mod valuation;

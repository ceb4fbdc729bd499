//! Shared data model for the simulated securities market.
//!
//! This crate defines the domain types (instruments, accounts, holdings,
//! transactions) and the error taxonomy used by every other crate in the
//! workspace. It contains no business logic beyond the invariants the
//! types themselves enforce.

pub mod error;
pub mod model;

pub use error::MarketError;

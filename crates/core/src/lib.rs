//! Ledgerfolio Core - journal replay, fees, FX resolution and valuation.
//!
//! This crate contains the ledger engine for a multi-broker, dual-currency
//! portfolio. It is storage-agnostic: journal, rate, price and position stores
//! are traits implemented by the embedding application.

pub mod constants;
pub mod errors;
pub mod fees;
pub mod fx;
pub mod journal;
pub mod ledger;
pub mod market_data;
pub mod portfolio;
pub mod refresh;
pub mod settings;

// Re-export common types from the journal and portfolio modules
pub use journal::*;
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! Ledger module - commit and delete orchestration over the journal and position stores.

mod ledger_service;
mod ledger_traits;

#[cfg(test)]
mod ledger_service_tests;

pub use ledger_service::LedgerService;
pub use ledger_traits::LedgerServiceTrait;

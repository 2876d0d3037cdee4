//! Journal module - transaction entries, the typed operation variant and the store trait.

mod fixed_term;
mod journal_model;
mod journal_traits;


pub use fixed_term::{fixed_term_symbol, next_fixed_term_number};
pub use journal_model::{
    sort_for_replay, Broker, CashFlow, Currency, DerivedAmounts, InstrumentType, JournalEntry,
    NewJournalEntry, OperationKind, SettlementTerm, TradeSide, TransactionKind,
};
pub use journal_traits::JournalRepositoryTrait;

use crate::errors::Result;
use crate::journal::{Currency, DerivedAmounts, JournalEntry, NewJournalEntry};
use crate::market_data::MarketPriceLookupTrait;
use crate::portfolio::{
    CashByBroker, FinishedOperationsReport, HoldingsByBroker, Position, ValuationReport,
    ValuationView,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Caller-facing contract of the ledger.
///
/// Every mutation is followed by a full recomputation of the cached positions.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn list_entries(&self) -> Result<Vec<JournalEntry>>;
    /// Derived amounts the draft would be committed with. Nothing is stored.
    fn preview_entry(&self, draft: &NewJournalEntry) -> Result<DerivedAmounts>;
    async fn record_entry(&self, draft: NewJournalEntry) -> Result<JournalEntry>;
    async fn delete_entry(&self, entry_id: &str) -> Result<JournalEntry>;
    async fn recompute_positions(&self) -> Result<Vec<Position>>;
    fn positions(&self) -> Result<Vec<Position>>;
    fn cash_by_broker(&self, currency: Currency) -> Result<CashByBroker>;
    fn holdings_by_broker(&self) -> Result<HoldingsByBroker>;
    fn finished_operations(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<FinishedOperationsReport>;
    /// Values the cached positions. `view` defaults to the configured one.
    fn valuate(
        &self,
        prices: &dyn MarketPriceLookupTrait,
        valuation_date: NaiveDate,
        view: Option<ValuationView>,
    ) -> Result<ValuationReport>;
}

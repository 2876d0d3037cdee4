use super::market_data_model::MarketQuote;
use crate::errors::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read access to already-fetched market prices.
#[async_trait]
pub trait MarketPriceLookupTrait: Send + Sync {
    fn get_last_price(&self, symbol: &str) -> Result<Option<Decimal>>;
    /// Percent change of the last session, when the feed provides one.
    fn get_daily_change(&self, symbol: &str) -> Result<Option<Decimal>>;
    async fn upsert_quotes(&self, quotes: Vec<MarketQuote>) -> Result<usize>;
}

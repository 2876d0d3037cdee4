use super::market_data_model::MarketQuote;
use super::market_data_traits::MarketPriceLookupTrait;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory snapshot of the latest quote per symbol.
///
/// Symbols are matched case-insensitively.
#[derive(Default)]
pub struct MarketPriceTable {
    quotes: RwLock<HashMap<String, MarketQuote>>,
}

impl MarketPriceTable {
    pub fn new(quotes: Vec<MarketQuote>) -> Self {
        let table = MarketPriceTable::default();
        if let Ok(mut stored) = table.quotes.write() {
            for quote in quotes {
                stored.insert(Self::key(&quote.symbol), quote);
            }
        }
        table
    }

    fn key(symbol: &str) -> String {
        symbol.trim().to_uppercase()
    }

    fn get_quote(&self, symbol: &str) -> Result<Option<MarketQuote>> {
        let quotes = self
            .quotes
            .read()
            .map_err(|e| Error::Repository(e.to_string()))?;
        Ok(quotes.get(&Self::key(symbol)).cloned())
    }
}

#[async_trait]
impl MarketPriceLookupTrait for MarketPriceTable {
    fn get_last_price(&self, symbol: &str) -> Result<Option<Decimal>> {
        Ok(self.get_quote(symbol)?.map(|quote| quote.last_price))
    }

    fn get_daily_change(&self, symbol: &str) -> Result<Option<Decimal>> {
        Ok(self.get_quote(symbol)?.and_then(|quote| quote.daily_change))
    }

    async fn upsert_quotes(&self, quotes: Vec<MarketQuote>) -> Result<usize> {
        let mut stored = self
            .quotes
            .write()
            .map_err(|e| Error::Repository(e.to_string()))?;
        let mut written = 0;
        for quote in quotes {
            let key = Self::key(&quote.symbol);
            // Never replace a quote with an older one
            if let Some(existing) = stored.get(&key) {
                if existing.as_of > quote.as_of {
                    debug!("Ignoring stale quote for {} as of {}", key, quote.as_of);
                    continue;
                }
            }
            stored.insert(key, quote);
            written += 1;
        }
        Ok(written)
    }
}

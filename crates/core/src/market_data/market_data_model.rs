use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Last known market quote of a symbol, as delivered by a price refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub symbol: String,
    /// In the symbol's trading currency. Bonds are quoted per 100 nominal.
    pub last_price: Decimal,
    /// Percent change against the previous close.
    pub daily_change: Option<Decimal>,
    pub as_of: DateTime<Utc>,
}

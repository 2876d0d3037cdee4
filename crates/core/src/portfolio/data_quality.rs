use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inconsistencies found while replaying the journal.
///
/// None of these abort a recomputation: the affected entry is skipped for the
/// derived output and stays in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityKind {
    /// Yield paid on a symbol with no open lots.
    OrphanedYield,
    /// Sell larger than the open lots it should close.
    UnmatchedSell,
    /// Net quantity below zero for a broker, clamped to zero.
    NegativeHoldings,
}

impl fmt::Display for DataQualityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityKind::OrphanedYield => write!(f, "ORPHANED_YIELD"),
            DataQualityKind::UnmatchedSell => write!(f, "UNMATCHED_SELL"),
            DataQualityKind::NegativeHoldings => write!(f, "NEGATIVE_HOLDINGS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub entry_id: String,
    pub date: NaiveDate,
    pub symbol: String,
    pub kind: DataQualityKind,
    pub message: String,
}

impl DataQualityWarning {
    /// Builds the warning and logs it.
    pub fn record(
        kind: DataQualityKind,
        entry_id: &str,
        date: NaiveDate,
        symbol: &str,
        message: String,
    ) -> Self {
        warn!("[{}] {} {} ({}): {}", kind, symbol, date, entry_id, message);
        DataQualityWarning {
            entry_id: entry_id.to_string(),
            date,
            symbol: symbol.to_string(),
            kind,
            message,
        }
    }
}

use crate::journal::InstrumentType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Access channel a hard-currency rate is quoted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// Hard currency bought through local securities arbitrage.
    Mep,
    /// Hard currency through a channel with offshore access.
    Ccl,
    /// Implied by crypto stablecoin markets.
    Crypto,
    /// Central bank reference rate.
    #[serde(alias = "oficial")]
    Official,
    /// Informal market.
    Blue,
}

impl RateKind {
    pub const ALL: [RateKind; 5] = [
        RateKind::Mep,
        RateKind::Ccl,
        RateKind::Crypto,
        RateKind::Official,
        RateKind::Blue,
    ];

    /// Rate kind used to value entries of the given instrument type.
    pub fn for_instrument(instrument_type: InstrumentType) -> RateKind {
        match instrument_type {
            InstrumentType::DepositaryReceipt | InstrumentType::Etf => RateKind::Ccl,
            InstrumentType::Crypto => RateKind::Crypto,
            _ => RateKind::Mep,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateKind::Mep => "mep",
            RateKind::Ccl => "ccl",
            RateKind::Crypto => "crypto",
            RateKind::Official => "official",
            RateKind::Blue => "blue",
        }
    }
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Publisher a rate was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FxSource {
    Ambito,
    Bcra,
    DolarHoy,
}

impl FxSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FxSource::Ambito => "ambito",
            FxSource::Bcra => "bcra",
            FxSource::DolarHoy => "dolarhoy",
        }
    }
}

impl fmt::Display for FxSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One day's quote for a (kind, source) pair, in local currency per unit of hard currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRate {
    pub date: NaiveDate,
    pub kind: RateKind,
    pub source: FxSource,
    pub buy: Option<Decimal>,
    pub sell: Option<Decimal>,
}

impl FxRate {
    pub fn new(date: NaiveDate, kind: RateKind, source: FxSource, value: Decimal) -> Self {
        FxRate {
            date,
            kind,
            source,
            buy: Some(value),
            sell: Some(value),
        }
    }

    /// Sell quote when present, otherwise the buy quote. Non-positive quotes count as missing.
    pub fn value(&self) -> Option<Decimal> {
        let usable = |quote: Option<Decimal>| quote.filter(|v| *v > Decimal::ZERO);
        usable(self.sell).or_else(|| usable(self.buy))
    }
}

/// How a resolved rate was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RateStatus {
    /// Quote for the requested date.
    Exact { source: FxSource },
    /// Most recent quote before the requested date.
    #[serde(rename_all = "camelCase")]
    Stale { source: FxSource, as_of: NaiveDate },
    /// Nothing matched; the configured default was substituted.
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRate {
    pub value: Decimal,
    pub status: RateStatus,
}

impl ResolvedRate {
    pub fn default_rate(value: Decimal) -> Self {
        ResolvedRate {
            value,
            status: RateStatus::Default,
        }
    }

    /// False when the value is a substituted default.
    pub fn is_resolved(&self) -> bool {
        !matches!(self.status, RateStatus::Default)
    }
}

use crate::constants::{CASH_EPSILON, DEFAULT_FX_RATE, HOLDINGS_EPSILON, VAT_RATE};
use crate::errors::{Error, Result};
use crate::fx::{FxSource, RateKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trailing-month volume (local currency) at which each higher fee tier starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierThresholds {
    pub middle: Decimal,
    pub top: Decimal,
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds {
            middle: dec!(50000000),
            top: dec!(200000000),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerSettings {
    /// Source trusted first for each rate kind.
    pub canonical_fx_sources: HashMap<RateKind, FxSource>,
    /// Source consulted when the canonical one has nothing.
    pub fallback_fx_source: FxSource,
    /// Substituted when no rate resolves at all.
    pub default_fx_rate: Decimal,
    pub tier_thresholds: TierThresholds,
    pub vat_rate: Decimal,
    pub cash_epsilon: Decimal,
    pub holdings_epsilon: Decimal,
    pub fx_backfill_start: NaiveDate,
    pub fx_backfill_chunk_days: i64,
    pub fx_refresh_overlap_days: i64,
    pub include_liquidity_in_totals: bool,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        let canonical_fx_sources = RateKind::ALL
            .iter()
            .map(|kind| {
                let source = match kind {
                    RateKind::Official => FxSource::Bcra,
                    _ => FxSource::Ambito,
                };
                (*kind, source)
            })
            .collect();

        LedgerSettings {
            canonical_fx_sources,
            fallback_fx_source: FxSource::DolarHoy,
            default_fx_rate: DEFAULT_FX_RATE,
            tier_thresholds: TierThresholds::default(),
            vat_rate: VAT_RATE,
            cash_epsilon: CASH_EPSILON,
            holdings_epsilon: HOLDINGS_EPSILON,
            fx_backfill_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            fx_backfill_chunk_days: 180,
            fx_refresh_overlap_days: 7,
            include_liquidity_in_totals: true,
        }
    }
}

impl LedgerSettings {
    pub fn canonical_source(&self, kind: RateKind) -> FxSource {
        self.canonical_fx_sources
            .get(&kind)
            .copied()
            .unwrap_or(self.fallback_fx_source)
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.default_fx_rate <= Decimal::ZERO {
            return Err(Error::InvalidConfigValue(format!(
                "defaultFxRate must be positive, got {}",
                self.default_fx_rate
            )));
        }
        if self.cash_epsilon.is_sign_negative() || self.holdings_epsilon.is_sign_negative() {
            return Err(Error::InvalidConfigValue(
                "epsilons must not be negative".to_string(),
            ));
        }
        if self.vat_rate.is_sign_negative() {
            return Err(Error::InvalidConfigValue(format!(
                "vatRate must not be negative, got {}",
                self.vat_rate
            )));
        }
        if self.tier_thresholds.middle.is_sign_negative()
            || self.tier_thresholds.top < self.tier_thresholds.middle
        {
            return Err(Error::InvalidConfigValue(format!(
                "tierThresholds must be ascending, got middle={} top={}",
                self.tier_thresholds.middle, self.tier_thresholds.top
            )));
        }
        if self.fx_backfill_chunk_days <= 0 || self.fx_refresh_overlap_days < 0 {
            return Err(Error::InvalidConfigValue(
                "fx backfill windows must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

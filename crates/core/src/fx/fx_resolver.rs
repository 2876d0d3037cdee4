use super::fx_model::{FxRate, FxSource, RateKind, RateStatus, ResolvedRate};
use super::fx_traits::FxRepositoryTrait;
use crate::errors::Result;
use crate::journal::InstrumentType;
use crate::settings::LedgerSettings;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves the best available rate for a date through a source-priority chain:
///
/// 1. exact date, canonical source for the kind
/// 2. latest date on or before, canonical source
/// 3. the same two lookups against the fallback source
///
/// The first match wins.
#[derive(Clone)]
pub struct FxRateResolver {
    repository: Arc<dyn FxRepositoryTrait>,
    canonical_sources: HashMap<RateKind, FxSource>,
    fallback_source: FxSource,
    default_rate: Decimal,
}

impl FxRateResolver {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>, settings: &LedgerSettings) -> Self {
        Self {
            repository,
            canonical_sources: settings.canonical_fx_sources.clone(),
            fallback_source: settings.fallback_fx_source,
            default_rate: settings.default_fx_rate,
        }
    }

    fn canonical_source(&self, kind: RateKind) -> FxSource {
        self.canonical_sources
            .get(&kind)
            .copied()
            .unwrap_or(self.fallback_source)
    }

    fn source_chain(&self, kind: RateKind) -> Vec<FxSource> {
        let canonical = self.canonical_source(kind);
        if canonical == self.fallback_source {
            vec![canonical]
        } else {
            vec![canonical, self.fallback_source]
        }
    }

    /// Resolves the rate kind for an instrument type. `None` means unavailable.
    pub fn resolve(
        &self,
        date: NaiveDate,
        instrument_type: InstrumentType,
    ) -> Result<Option<ResolvedRate>> {
        self.resolve_kind(date, RateKind::for_instrument(instrument_type))
    }

    pub fn resolve_kind(&self, date: NaiveDate, kind: RateKind) -> Result<Option<ResolvedRate>> {
        for source in self.source_chain(kind) {
            if let Some(resolved) = self
                .repository
                .get_rate(date, kind, source)?
                .as_ref()
                .and_then(|rate| Self::to_resolved(rate, date))
            {
                return Ok(Some(resolved));
            }

            if let Some(resolved) = self
                .repository
                .get_rate_on_or_before(date, kind, source)?
                .as_ref()
                .and_then(|rate| Self::to_resolved(rate, date))
            {
                debug!(
                    "Using {} rate from {} dated {:?} for {}",
                    kind, source, resolved.status, date
                );
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }

    /// Like [`resolve`](Self::resolve) but substitutes the configured default,
    /// tagged [`RateStatus::Default`], when nothing matches.
    pub fn resolve_or_default(
        &self,
        date: NaiveDate,
        instrument_type: InstrumentType,
    ) -> Result<ResolvedRate> {
        match self.resolve(date, instrument_type)? {
            Some(resolved) => Ok(resolved),
            None => {
                warn!(
                    "No {} rate available on or before {}. Using default {}",
                    RateKind::for_instrument(instrument_type),
                    date,
                    self.default_rate
                );
                Ok(ResolvedRate::default_rate(self.default_rate))
            }
        }
    }

    fn to_resolved(rate: &FxRate, requested: NaiveDate) -> Option<ResolvedRate> {
        let value = rate.value()?;
        let status = if rate.date == requested {
            RateStatus::Exact {
                source: rate.source,
            }
        } else {
            RateStatus::Stale {
                source: rate.source,
                as_of: rate.date,
            }
        };
        Some(ResolvedRate { value, status })
    }
}

use super::fx_errors::FxError;
use super::fx_model::{FxRate, FxSource, RateKind};
use super::fx_traits::FxRepositoryTrait;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Series = BTreeMap<NaiveDate, FxRate>;

/// In-memory rate store.
/// Each (kind, source) pair is an independent daily series in a BTreeMap,
/// so "on or before" lookups are a single range query.
#[derive(Default)]
pub struct FxRateTable {
    series: RwLock<HashMap<(RateKind, FxSource), Series>>,
}

impl FxRateTable {
    pub fn new(rates: Vec<FxRate>) -> Self {
        let table = FxRateTable::default();
        if let Ok(mut series) = table.series.write() {
            Self::insert_all(&mut series, rates);
        }
        table
    }

    fn insert_all(
        series: &mut HashMap<(RateKind, FxSource), Series>,
        rates: Vec<FxRate>,
    ) -> usize {
        let mut written = 0;
        for rate in rates {
            if rate.value().is_none() {
                log::warn!(
                    "Skipping {} rate from {} on {}: no usable quote",
                    rate.kind,
                    rate.source,
                    rate.date
                );
                continue;
            }
            series
                .entry((rate.kind, rate.source))
                .or_default()
                .insert(rate.date, rate);
            written += 1;
        }
        written
    }

    pub fn len(&self) -> usize {
        self.series
            .read()
            .map(|series| series.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<F>(&self, kind: RateKind, source: FxSource, find: F) -> Result<Option<FxRate>>
    where
        F: FnOnce(&Series) -> Option<FxRate>,
    {
        let series = self
            .series
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        Ok(series.get(&(kind, source)).and_then(find))
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRateTable {
    fn get_rate(
        &self,
        date: NaiveDate,
        kind: RateKind,
        source: FxSource,
    ) -> Result<Option<FxRate>> {
        self.lookup(kind, source, |history| history.get(&date).cloned())
    }

    fn get_rate_on_or_before(
        &self,
        date: NaiveDate,
        kind: RateKind,
        source: FxSource,
    ) -> Result<Option<FxRate>> {
        self.lookup(kind, source, |history| {
            history.range(..=date).next_back().map(|(_, rate)| rate.clone())
        })
    }

    fn date_bounds(
        &self,
        kind: RateKind,
        source: FxSource,
    ) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let series = self
            .series
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        Ok(series.get(&(kind, source)).and_then(|history| {
            let first = history.keys().next()?;
            let last = history.keys().next_back()?;
            Some((*first, *last))
        }))
    }

    async fn bulk_upsert(&self, rates: Vec<FxRate>) -> Result<usize> {
        let mut series = self
            .series
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        Ok(Self::insert_all(&mut series, rates))
    }
}

use super::fx_model::{FxRate, FxSource, RateKind};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Append-only store of daily rates keyed by (date, kind, source).
#[async_trait]
pub trait FxRepositoryTrait: Send + Sync {
    fn get_rate(&self, date: NaiveDate, kind: RateKind, source: FxSource) -> Result<Option<FxRate>>;
    fn get_rate_on_or_before(
        &self,
        date: NaiveDate,
        kind: RateKind,
        source: FxSource,
    ) -> Result<Option<FxRate>>;
    /// Earliest and latest stored dates.
    fn date_bounds(
        &self,
        kind: RateKind,
        source: FxSource,
    ) -> Result<Option<(NaiveDate, NaiveDate)>>;
    /// Inserts or replaces rates, returning how many rows were written.
    async fn bulk_upsert(&self, rates: Vec<FxRate>) -> Result<usize>;
}

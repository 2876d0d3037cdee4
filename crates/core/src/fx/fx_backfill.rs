//! Planning of historical rate fetches and gap filling of daily series.
//!
//! Fetching itself happens outside the crate; these helpers only decide which
//! windows to request and normalise what came back.

use super::fx_model::{FxRate, FxSource, RateKind};
use crate::settings::LedgerSettings;
use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive date window to request from a rate publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchWindow {
    pub kind: RateKind,
    pub source: FxSource,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Windows needed to cover `fx_backfill_start..=today` for a series whose
/// stored history does not reach back to the start date.
///
/// `bounds` are the stored (min, max) dates of the series, if any. Returns an
/// empty plan when the stored history already starts on or before the start
/// date.
pub fn plan_backfill(
    kind: RateKind,
    source: FxSource,
    bounds: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
    settings: &LedgerSettings,
) -> Vec<FetchWindow> {
    let start = settings.fx_backfill_start;
    if let Some((first, _)) = bounds {
        if first <= start {
            return Vec::new();
        }
    }
    if today < start {
        return Vec::new();
    }

    let chunk = Duration::days(settings.fx_backfill_chunk_days.max(1));
    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor <= today {
        let end = (cursor + chunk - Duration::days(1)).min(today);
        windows.push(FetchWindow {
            kind,
            source,
            start: cursor,
            end,
        });
        cursor = end + Duration::days(1);
    }

    debug!(
        "Planned {} backfill windows for {} from {} ({}..{})",
        windows.len(),
        kind,
        source,
        start,
        today
    );
    windows
}

/// Window for the daily refresh: from `overlap` days before the last stored
/// date (never earlier than the backfill start) through `today`.
///
/// Returns `None` when nothing is stored yet (a backfill is needed instead).
pub fn plan_incremental_refresh(
    kind: RateKind,
    source: FxSource,
    bounds: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
    settings: &LedgerSettings,
) -> Option<FetchWindow> {
    let (_, last) = bounds?;
    let start = (last - Duration::days(settings.fx_refresh_overlap_days))
        .max(settings.fx_backfill_start)
        .min(today);
    Some(FetchWindow {
        kind,
        source,
        start,
        end: today,
    })
}

/// Expands a sparse daily series into one rate per day in `start..=end`,
/// carrying the last observed value forward.
///
/// Days before the first observation in or before the window are omitted.
pub fn fill_missing_dates(
    kind: RateKind,
    source: FxSource,
    start: NaiveDate,
    end: NaiveDate,
    observations: &BTreeMap<NaiveDate, Decimal>,
) -> Vec<FxRate> {
    let mut filled = Vec::new();
    let mut last = observations
        .range(..start)
        .next_back()
        .map(|(_, value)| *value);

    let mut day = start;
    while day <= end {
        if let Some(value) = observations.get(&day) {
            last = Some(*value);
        }
        if let Some(value) = last {
            filled.push(FxRate::new(day, kind, source, value));
        }
        day += Duration::days(1);
    }
    filled
}

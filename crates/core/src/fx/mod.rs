//! FX (Foreign Exchange) module - rate models, the rate store, and the resolver.

mod fx_backfill;
mod fx_errors;
mod fx_model;
mod fx_rate_table;
mod fx_resolver;
mod fx_traits;

pub use fx_backfill::{fill_missing_dates, plan_backfill, plan_incremental_refresh, FetchWindow};
pub use fx_errors::FxError;
pub use fx_model::{FxRate, FxSource, RateKind, RateStatus, ResolvedRate};
pub use fx_rate_table::FxRateTable;
pub use fx_resolver::FxRateResolver;
pub use fx_traits::FxRepositoryTrait;

//! Portfolio module - everything derived from the journal by replay.

pub mod data_quality;
pub mod finished;
pub mod holdings;
pub mod lots;
pub mod valuation;

pub use data_quality::{DataQualityKind, DataQualityWarning};
pub use finished::{
    finished_operations, FinishedOperation, FinishedOperationsReport, FinishedTotals,
};
pub use holdings::{
    aggregate_holdings, cash_by_broker, holdings_by_broker, recompute_positions,
    recompute_positions_with_warnings, CashByBroker, HoldingsByBroker, Position,
    PositionRepositoryTrait,
};
pub use lots::{Lot, LotConsumption, LotDraw, LotTracker};
pub use valuation::{
    valuate, DualAmount, InstrumentTotals, LiquidityValuation, PositionValuation, PriceStatus,
    ValuationReport, ValuationView,
};

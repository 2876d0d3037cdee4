//! Cash and holdings aggregation, and the current-positions view.

mod holdings_calculator;
mod holdings_model;
mod holdings_traits;


pub use holdings_calculator::{
    aggregate_holdings, cash_by_broker, holdings_by_broker, recompute_positions,
    recompute_positions_with_warnings,
};
pub use holdings_model::{CashByBroker, HoldingsByBroker, Position};
pub use holdings_traits::PositionRepositoryTrait;

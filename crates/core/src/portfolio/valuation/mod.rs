//! Valuation module - dual-currency valuation of the current holdings.

mod valuation_calculator;
mod valuation_model;

#[cfg(test)]
mod valuation_calculator_tests;

pub use valuation_calculator::valuate;
pub use valuation_model::{
    DualAmount, InstrumentTotals, LiquidityValuation, PositionValuation, PriceStatus,
    ValuationReport, ValuationView,
};

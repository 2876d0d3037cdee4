//! Fees module - broker fee schedules, volume tiers and the pre-commit operation calculator.

mod fee_model;
mod fee_schedule;
mod intraday;
mod operation_calculator;
mod tier_classifier;


pub use fee_model::{FeeRates, FeeTier};
pub use fee_schedule::resolve_fee_rates;
pub use intraday::detect_intraday_round_trip;
pub use operation_calculator::{calculate_amounts, OperationCalculator, OperationInput};
pub use tier_classifier::{
    classify_tier, previous_month_range, trailing_month_volume, TierClassifier,
};

//! Valuation domain models.

use crate::fx::RateStatus;
use crate::journal::{Broker, Currency, InstrumentType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Where the current price of a position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceStatus {
    Market,
    /// No market price; the position is valued at its average cost.
    Unavailable,
}

/// Selects the denominator of the allocation percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationView {
    #[default]
    IncludeLiquidity,
    ExcludeLiquidity,
}

impl ValuationView {
    pub fn from_include_liquidity(include: bool) -> Self {
        if include {
            ValuationView::IncludeLiquidity
        } else {
            ValuationView::ExcludeLiquidity
        }
    }

    pub fn includes_liquidity(&self) -> bool {
        matches!(self, ValuationView::IncludeLiquidity)
    }
}

/// An amount expressed in both the local and the hard currency.
///
/// The two sides are converted independently and are not expected to be
/// related by any single rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualAmount {
    pub local: Decimal,
    pub hard: Decimal,
}

impl DualAmount {
    pub const ZERO: DualAmount = DualAmount {
        local: Decimal::ZERO,
        hard: Decimal::ZERO,
    };

    pub fn new(local: Decimal, hard: Decimal) -> Self {
        DualAmount { local, hard }
    }

    /// Share of `total` on each side, in percent. Zero where the total is zero.
    pub fn percentage_of(&self, total: &DualAmount) -> DualAmount {
        let share = |part: Decimal, whole: Decimal| {
            if whole.is_zero() {
                Decimal::ZERO
            } else {
                part / whole * Decimal::ONE_HUNDRED
            }
        };
        DualAmount {
            local: share(self.local, total.local),
            hard: share(self.hard, total.hard),
        }
    }
}

impl Add for DualAmount {
    type Output = DualAmount;

    fn add(self, other: DualAmount) -> DualAmount {
        DualAmount {
            local: self.local + other.local,
            hard: self.hard + other.hard,
        }
    }
}

impl AddAssign for DualAmount {
    fn add_assign(&mut self, other: DualAmount) {
        self.local += other.local;
        self.hard += other.hard;
    }
}

impl Sub for DualAmount {
    type Output = DualAmount;

    fn sub(self, other: DualAmount) -> DualAmount {
        DualAmount {
            local: self.local - other.local,
            hard: self.hard - other.hard,
        }
    }
}

/// Valuation of one open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuation {
    pub broker: Broker,
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub currency: Currency,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    /// Unit price used for the valuation, in the position currency.
    pub current_price: Decimal,
    pub price_status: PriceStatus,
    pub daily_change: Option<Decimal>,
    pub acquisition_fx_rate: Decimal,
    pub current_fx_rate: Decimal,
    pub fx_status: RateStatus,
    pub cost: DualAmount,
    pub value: DualAmount,
    pub value_difference: DualAmount,
    /// Journal discounts plus the estimated cost of closing the position.
    pub discounts: DualAmount,
    pub yields: DualAmount,
    /// value difference - discounts + yields
    pub result: DualAmount,
    pub percentage: DualAmount,
}

/// Cash held at one broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityValuation {
    pub broker: Broker,
    /// Raw balances, each in its own currency.
    pub balances: DualAmount,
    /// Both balances converted and summed, per currency.
    pub value: DualAmount,
    pub percentage: DualAmount,
}

/// Aggregate of all positions of one instrument type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentTotals {
    pub instrument_type: InstrumentType,
    pub cost: DualAmount,
    pub value: DualAmount,
    pub result: DualAmount,
    pub percentage: DualAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    pub valuation_date: NaiveDate,
    pub view: ValuationView,
    pub positions: Vec<PositionValuation>,
    pub liquidity: Vec<LiquidityValuation>,
    pub totals_by_instrument: Vec<InstrumentTotals>,
    pub total_liquidity: DualAmount,
    pub total_investments: DualAmount,
    /// Denominator of every percentage in the report.
    pub total_value: DualAmount,
    pub total_result: DualAmount,
}

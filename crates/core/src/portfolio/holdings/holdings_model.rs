//! Holdings domain models.

use crate::journal::{Broker, Currency, InstrumentType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net cash per broker in one currency.
pub type CashByBroker = BTreeMap<Broker, Decimal>;

/// Net quantity per broker and symbol.
pub type HoldingsByBroker = BTreeMap<Broker, BTreeMap<String, Decimal>>;

/// Current holding of a symbol at a broker, derived from the journal.
///
/// Positions are a cache of the last recomputation, never ledger truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub broker: Broker,
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub currency: Currency,
    pub quantity: Decimal,
    /// Quantity-weighted unit price of the open lots, in `currency`.
    pub average_cost: Decimal,
    /// Notional-weighted FX rate of the buys since the position was last flat.
    pub acquisition_fx_rate: Decimal,
    /// Buy and yield discounts since the position was last flat.
    pub discounts: Decimal,
    /// Yield received since the position was last flat.
    pub yields: Decimal,
    pub opened_at: NaiveDate,
}

impl Position {
    /// quantity x average cost, in the position currency.
    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.average_cost
    }
}

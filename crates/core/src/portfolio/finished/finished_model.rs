use crate::journal::{Broker, Currency, InstrumentType};
use crate::portfolio::data_quality::DataQualityWarning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A closed trade: one sell matched FIFO against earlier buys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedOperation {
    /// The sell entry that closed the trade.
    pub entry_id: String,
    pub date: NaiveDate,
    pub instrument_type: InstrumentType,
    pub broker: Broker,
    pub symbol: String,
    pub currency: Currency,
    pub quantity: Decimal,
    pub average_buy_price: Decimal,
    pub sell_price: Decimal,
    pub value_difference: Decimal,
    /// Buy-side and sell-side costs, as a negative amount.
    pub discounts: Decimal,
    /// Yield on the sell entry plus yield allocated to the matched lots.
    pub yield_amount: Decimal,
    pub result: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTotals {
    pub value_difference: Decimal,
    pub discounts: Decimal,
    pub yield_amount: Decimal,
    pub result: Decimal,
}

impl FinishedTotals {
    pub fn add(&mut self, operation: &FinishedOperation) {
        self.value_difference += operation.value_difference;
        self.discounts += operation.discounts;
        self.yield_amount += operation.yield_amount;
        self.result += operation.result;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedOperationsReport {
    pub operations: Vec<FinishedOperation>,
    /// Totals per currency: local and hard amounts are never mixed.
    pub totals: BTreeMap<Currency, FinishedTotals>,
    /// Sells in the window that could not be fully matched and were skipped.
    pub unmatched_sells: usize,
    pub warnings: Vec<DataQualityWarning>,
}

impl FinishedOperationsReport {
    pub fn total_result(&self, currency: Currency) -> Decimal {
        self.totals
            .get(&currency)
            .map(|totals| totals.result)
            .unwrap_or(Decimal::ZERO)
    }
}

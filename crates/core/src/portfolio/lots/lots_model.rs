use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open purchase tranche of a symbol.
///
/// `discounts` and `allocated_yield` always refer to the remaining quantity:
/// a partial draw takes its proportional share and leaves the rest on the lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Journal entry that opened the lot.
    pub entry_id: String,
    pub symbol: String,
    pub acquisition_date: NaiveDate,
    pub original_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub unit_price: Decimal,
    pub discounts: Decimal,
    pub allocated_yield: Decimal,
}

impl Lot {
    pub fn new(
        entry_id: impl Into<String>,
        symbol: impl Into<String>,
        acquisition_date: NaiveDate,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Lot {
            entry_id: entry_id.into(),
            symbol: symbol.into(),
            acquisition_date,
            original_quantity: quantity,
            remaining_quantity: quantity,
            unit_price,
            discounts: Decimal::ZERO,
            allocated_yield: Decimal::ZERO,
        }
    }

    pub fn with_discounts(mut self, discounts: Decimal) -> Self {
        self.discounts = discounts;
        self
    }

    pub fn remaining_cost(&self) -> Decimal {
        self.remaining_quantity * self.unit_price
    }
}

/// Quantity taken from one lot by a sell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDraw {
    pub entry_id: String,
    pub acquisition_date: NaiveDate,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Share of the lot's discounts carried by `quantity`.
    pub discounts: Decimal,
    /// Share of the lot's allocated yield carried by `quantity`.
    pub allocated_yield: Decimal,
}

/// Result of closing quantity against the open lots, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotConsumption {
    pub draws: Vec<LotDraw>,
}

impl LotConsumption {
    pub fn quantity(&self) -> Decimal {
        self.draws.iter().map(|draw| draw.quantity).sum()
    }

    pub fn cost(&self) -> Decimal {
        self.draws
            .iter()
            .map(|draw| draw.quantity * draw.unit_price)
            .sum()
    }

    /// Quantity-weighted buy price of the drawn lots.
    pub fn average_price(&self) -> Decimal {
        let quantity = self.quantity();
        if quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.cost() / quantity
        }
    }

    pub fn discounts(&self) -> Decimal {
        self.draws.iter().map(|draw| draw.discounts).sum()
    }

    pub fn allocated_yield(&self) -> Decimal {
        self.draws.iter().map(|draw| draw.allocated_yield).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

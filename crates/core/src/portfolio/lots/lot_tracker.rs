use super::lots_model::{Lot, LotConsumption, LotDraw};
use crate::constants::{is_quantity_significant, QUANTITY_THRESHOLD};
use crate::errors::{CalculatorError, Result};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};

/// Per-key queues of open lots, consumed oldest first.
///
/// Built fresh for every replay and dropped afterwards. The key is usually
/// the symbol; callers tracking per broker key the tracker accordingly.
/// The tracker knows nothing about fees or currencies: discounts and yield
/// are carried along as proportional annotations.
#[derive(Debug, Clone, Default)]
pub struct LotTracker {
    queues: HashMap<String, VecDeque<Lot>>,
}

impl LotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lot behind the existing ones for its symbol.
    pub fn record_buy(&mut self, lot: Lot) {
        if !is_quantity_significant(&lot.remaining_quantity) {
            debug!(
                "Ignoring insignificant lot of {} for {} from entry {}",
                lot.remaining_quantity, lot.symbol, lot.entry_id
            );
            return;
        }
        self.queues
            .entry(lot.symbol.clone())
            .or_default()
            .push_back(lot);
    }

    /// Closes `quantity` against the open lots of `symbol`.
    ///
    /// Fails without touching the lots when they cannot cover the quantity:
    /// such a sell should have been rejected before it was committed.
    pub fn record_sell(&mut self, symbol: &str, quantity: Decimal) -> Result<LotConsumption> {
        if quantity.is_sign_negative() && !quantity.is_zero() {
            return Err(CalculatorError::InvalidEntry(format!(
                "Sell quantity for {} must not be negative, got {}",
                symbol, quantity
            ))
            .into());
        }

        let available = self.available(symbol);
        if quantity - available > QUANTITY_THRESHOLD {
            return Err(CalculatorError::InsufficientLots {
                symbol: symbol.to_string(),
                requested: quantity,
                available,
            }
            .into());
        }
        Ok(self.drain(symbol, quantity))
    }

    /// Closes as much of `quantity` as the open lots allow.
    pub fn drain(&mut self, symbol: &str, quantity: Decimal) -> LotConsumption {
        let Some(queue) = self.queues.get_mut(symbol) else {
            return LotConsumption::default();
        };

        let mut outstanding = quantity;
        let mut draws = Vec::new();
        while outstanding > Decimal::ZERO {
            let Some(lot) = queue.front_mut() else {
                warn!(
                    "Lots of {} exhausted with {} still to close",
                    symbol, outstanding
                );
                break;
            };

            let taken = lot.remaining_quantity.min(outstanding);
            let share = if lot.remaining_quantity.is_zero() {
                Decimal::ZERO
            } else {
                taken / lot.remaining_quantity
            };
            let discounts = lot.discounts * share;
            let allocated_yield = lot.allocated_yield * share;

            if taken > Decimal::ZERO {
                draws.push(LotDraw {
                    entry_id: lot.entry_id.clone(),
                    acquisition_date: lot.acquisition_date,
                    quantity: taken,
                    unit_price: lot.unit_price,
                    discounts,
                    allocated_yield,
                });
            }

            lot.remaining_quantity -= taken;
            lot.discounts -= discounts;
            lot.allocated_yield -= allocated_yield;
            outstanding -= taken;

            if !is_quantity_significant(&lot.remaining_quantity) {
                queue.pop_front();
            }
        }

        if queue.is_empty() {
            self.queues.remove(symbol);
        }
        LotConsumption { draws }
    }

    /// Removes the oldest lot of `symbol` whole, whatever its quantity.
    pub fn pop_front(&mut self, symbol: &str) -> Option<Lot> {
        let queue = self.queues.get_mut(symbol)?;
        let lot = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(symbol);
        }
        lot
    }

    /// Spreads a payout and its discounts over the open lots of `symbol`
    /// in proportion to each lot's remaining quantity.
    ///
    /// Returns false, leaving the lots untouched, when there is nothing open.
    pub fn allocate_yield(&mut self, symbol: &str, amount: Decimal, discounts: Decimal) -> bool {
        let total = self.available(symbol);
        let Some(queue) = self.queues.get_mut(symbol) else {
            return false;
        };
        if total <= Decimal::ZERO {
            return false;
        }

        let mut allocated_amount = Decimal::ZERO;
        let mut allocated_discounts = Decimal::ZERO;
        let last = queue.len() - 1;
        for (index, lot) in queue.iter_mut().enumerate() {
            // The last lot absorbs the rounding residue so the shares add up exactly
            let (amount_share, discount_share) = if index == last {
                (amount - allocated_amount, discounts - allocated_discounts)
            } else {
                let weight = lot.remaining_quantity / total;
                (amount * weight, discounts * weight)
            };
            lot.allocated_yield += amount_share;
            lot.discounts += discount_share;
            allocated_amount += amount_share;
            allocated_discounts += discount_share;
        }
        true
    }

    /// Total remaining quantity of `symbol`.
    pub fn available(&self, symbol: &str) -> Decimal {
        self.queues
            .get(symbol)
            .map(|queue| queue.iter().map(|lot| lot.remaining_quantity).sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Quantity-weighted unit price of the remaining lots, `None` when flat.
    pub fn average_cost(&self, symbol: &str) -> Option<Decimal> {
        let queue = self.queues.get(symbol)?;
        let quantity: Decimal = queue.iter().map(|lot| lot.remaining_quantity).sum();
        if !is_quantity_significant(&quantity) {
            return None;
        }
        let cost: Decimal = queue.iter().map(Lot::remaining_cost).sum();
        Some(cost / quantity)
    }

    pub fn open_lots(&self, symbol: &str) -> impl Iterator<Item = &Lot> {
        self.queues.get(symbol).into_iter().flatten()
    }

    /// Symbols with at least one open lot, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.queues.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

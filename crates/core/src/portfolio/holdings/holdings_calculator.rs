use super::holdings_model::{CashByBroker, HoldingsByBroker, Position};
use crate::constants::is_quantity_significant;
use crate::journal::{
    sort_for_replay, Broker, Currency, InstrumentType, JournalEntry, TradeSide, TransactionKind,
};
use crate::portfolio::data_quality::{DataQualityKind, DataQualityWarning};
use crate::portfolio::lots::{Lot, LotTracker};

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Net cash (income minus cost) per broker for entries booked in `currency`.
///
/// Cash deposits are included like any other entry: their derived amounts
/// already carry the direction.
pub fn cash_by_broker(entries: &[JournalEntry], currency: Currency) -> CashByBroker {
    let mut balances = CashByBroker::new();
    for entry in entries.iter().filter(|entry| entry.currency == currency) {
        *balances.entry(entry.broker.clone()).or_insert(Decimal::ZERO) += entry.net_cash();
    }
    balances
}

/// Net traded quantity per broker and symbol, floored at zero.
pub fn holdings_by_broker(entries: &[JournalEntry]) -> HoldingsByBroker {
    aggregate_holdings(entries).0
}

/// [`holdings_by_broker`] plus a warning for every sell that had to be clamped.
///
/// Entries are replayed in (date, sequence) order and the running quantity is
/// floored at zero after each sell, so an oversell never eats into later buys.
pub fn aggregate_holdings(
    entries: &[JournalEntry],
) -> (HoldingsByBroker, Vec<DataQualityWarning>) {
    let mut sums: BTreeMap<(Broker, String), Decimal> = BTreeMap::new();
    let mut warnings = Vec::new();

    for entry in sort_for_replay(entries) {
        if entry.is_cash_deposit() {
            continue;
        }
        let side = match entry.kind() {
            Ok(TransactionKind::Trade { side, .. }) => side,
            _ => continue,
        };
        let held = sums
            .entry((entry.broker.clone(), entry.symbol_str().to_string()))
            .or_insert(Decimal::ZERO);

        match side {
            TradeSide::Buy => *held += entry.quantity,
            TradeSide::Sell => {
                let remaining = *held - entry.quantity;
                if remaining.is_sign_negative() && is_quantity_significant(&remaining) {
                    warnings.push(DataQualityWarning::record(
                        DataQualityKind::NegativeHoldings,
                        &entry.id,
                        entry.date,
                        entry.symbol_str(),
                        format!(
                            "Sell of {} at {} exceeds the {} held, clamped to zero",
                            entry.quantity, entry.broker, *held
                        ),
                    ));
                    *held = Decimal::ZERO;
                } else {
                    *held = remaining;
                }
            }
        }
    }

    let mut holdings = HoldingsByBroker::new();
    for ((broker, symbol), quantity) in sums {
        if is_quantity_significant(&quantity) && quantity.is_sign_positive() {
            holdings.entry(broker).or_default().insert(symbol, quantity);
        }
    }
    (holdings, warnings)
}

/// Running state of one (broker, symbol) pair during a replay.
struct PositionAccumulator {
    instrument_type: InstrumentType,
    currency: Currency,
    opened_at: NaiveDate,
    weighted_fx: Decimal,
    notional: Decimal,
    discounts: Decimal,
    yields: Decimal,
}

impl PositionAccumulator {
    fn opened_by(entry: &JournalEntry) -> Self {
        PositionAccumulator {
            instrument_type: entry.instrument_type,
            currency: entry.currency,
            opened_at: entry.date,
            weighted_fx: Decimal::ZERO,
            notional: Decimal::ZERO,
            discounts: Decimal::ZERO,
            yields: Decimal::ZERO,
        }
    }

    fn acquisition_fx_rate(&self) -> Decimal {
        if self.notional.is_zero() {
            Decimal::ONE
        } else {
            self.weighted_fx / self.notional
        }
    }
}

/// Current positions, replayed from the whole journal.
pub fn recompute_positions(entries: &[JournalEntry]) -> Vec<Position> {
    recompute_positions_with_warnings(entries).0
}

/// Replays the journal in (date, sequence) order with one FIFO tracker per broker.
///
/// Yields on a pair with no open lots and sells larger than the open lots are
/// reported as warnings; the replay carries on.
pub fn recompute_positions_with_warnings(
    entries: &[JournalEntry],
) -> (Vec<Position>, Vec<DataQualityWarning>) {
    debug!("Recomputing positions from {} journal entries", entries.len());

    let mut trackers: BTreeMap<Broker, LotTracker> = BTreeMap::new();
    let mut accumulators: HashMap<(Broker, String), PositionAccumulator> = HashMap::new();
    let mut warnings = Vec::new();

    for entry in sort_for_replay(entries) {
        if entry.is_cash_deposit() {
            continue;
        }
        let kind = match entry.kind() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Skipping journal entry {} during replay: {}", entry.id, e);
                continue;
            }
        };

        let symbol = entry.symbol_str().to_string();
        let key = (entry.broker.clone(), symbol.clone());
        let tracker = trackers.entry(entry.broker.clone()).or_default();

        match kind {
            TransactionKind::Trade {
                side: TradeSide::Buy,
                ..
            } => {
                if !is_quantity_significant(&tracker.available(&symbol)) {
                    accumulators.insert(key.clone(), PositionAccumulator::opened_by(entry));
                }
                tracker.record_buy(
                    Lot::new(&entry.id, &symbol, entry.date, entry.quantity, entry.price)
                        .with_discounts(entry.amounts.total_discounts),
                );
                if let Some(acc) = accumulators.get_mut(&key) {
                    acc.weighted_fx += entry.notional() * entry.fx_rate;
                    acc.notional += entry.notional();
                    acc.discounts += entry.amounts.total_discounts;
                }
            }
            TransactionKind::Trade {
                side: TradeSide::Sell,
                instrument,
            } => {
                if instrument == InstrumentType::FixedTermDeposit {
                    if tracker.pop_front(&symbol).is_none() {
                        warnings.push(unmatched_sell(entry, Decimal::ZERO));
                    }
                } else if tracker.record_sell(&symbol, entry.quantity).is_err() {
                    let available = tracker.available(&symbol);
                    tracker.drain(&symbol, entry.quantity);
                    warnings.push(unmatched_sell(entry, available));
                }
                if !is_quantity_significant(&tracker.available(&symbol)) {
                    accumulators.remove(&key);
                }
            }
            TransactionKind::Yield { .. } => match accumulators.get_mut(&key) {
                Some(acc) if is_quantity_significant(&tracker.available(&symbol)) => {
                    acc.yields += entry.yield_amount;
                    acc.discounts += entry.amounts.total_discounts;
                }
                _ => warnings.push(DataQualityWarning::record(
                    DataQualityKind::OrphanedYield,
                    &entry.id,
                    entry.date,
                    &symbol,
                    format!(
                        "Yield of {} with no open position at {}",
                        entry.yield_amount, entry.broker
                    ),
                )),
            },
            TransactionKind::Cash { .. } => {}
        }
    }

    let mut positions = Vec::new();
    for ((broker, symbol), acc) in accumulators {
        let Some(tracker) = trackers.get(&broker) else {
            continue;
        };
        let quantity = tracker.available(&symbol);
        if !is_quantity_significant(&quantity) {
            continue;
        }
        positions.push(Position {
            average_cost: tracker.average_cost(&symbol).unwrap_or(Decimal::ZERO),
            acquisition_fx_rate: acc.acquisition_fx_rate(),
            broker,
            symbol,
            instrument_type: acc.instrument_type,
            currency: acc.currency,
            quantity,
            discounts: acc.discounts,
            yields: acc.yields,
            opened_at: acc.opened_at,
        });
    }
    positions.sort_by(|a, b| (&a.broker, &a.symbol).cmp(&(&b.broker, &b.symbol)));
    (positions, warnings)
}

fn unmatched_sell(entry: &JournalEntry, available: Decimal) -> DataQualityWarning {
    DataQualityWarning::record(
        DataQualityKind::UnmatchedSell,
        &entry.id,
        entry.date,
        entry.symbol_str(),
        format!(
            "Sell of {} at {} exceeds the {} held in open lots",
            entry.quantity, entry.broker, available
        ),
    )
}

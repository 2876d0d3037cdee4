use super::finished_model::{FinishedOperation, FinishedOperationsReport};
use crate::journal::{sort_for_replay, InstrumentType, JournalEntry, TradeSide, TransactionKind};
use crate::portfolio::data_quality::{DataQualityKind, DataQualityWarning};
use crate::portfolio::lots::{Lot, LotConsumption, LotDraw, LotTracker};

use chrono::NaiveDate;
use log::{debug, warn};

fn in_window(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

/// Replays the whole journal and returns the trades closed inside `from..=to`.
///
/// Entries outside the window still move the lots, so a sell in the window is
/// matched against buys of any date. Lots are tracked per symbol across all
/// brokers. Yields are spread over the lots open at the time of payment, in
/// replay order. Sells that the open lots cannot cover are skipped, counted
/// and reported; they still drain whatever was open.
pub fn finished_operations(
    entries: &[JournalEntry],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> FinishedOperationsReport {
    debug!(
        "Reconstructing finished operations from {} entries ({:?}..{:?})",
        entries.len(),
        from,
        to
    );

    let mut tracker = LotTracker::new();
    let mut report = FinishedOperationsReport::default();

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
        let symbol = entry.symbol_str();
        let reportable = in_window(entry.date, from, to);

        match kind {
            TransactionKind::Trade {
                side: TradeSide::Buy,
                ..
            } => tracker.record_buy(
                Lot::new(&entry.id, symbol, entry.date, entry.quantity, entry.price)
                    .with_discounts(entry.amounts.total_discounts),
            ),
            TransactionKind::Yield { .. } => {
                let allocated = tracker.allocate_yield(
                    symbol,
                    entry.yield_amount,
                    entry.amounts.total_discounts,
                );
                if !allocated && reportable {
                    report.warnings.push(DataQualityWarning::record(
                        DataQualityKind::OrphanedYield,
                        &entry.id,
                        entry.date,
                        symbol,
                        format!("Yield of {} paid with no open lots", entry.yield_amount),
                    ));
                }
            }
            TransactionKind::Trade {
                side: TradeSide::Sell,
                instrument,
            } => {
                let available = tracker.available(symbol);
                let consumption = if instrument == InstrumentType::FixedTermDeposit {
                    // One lot is one certificate
                    tracker.pop_front(symbol).map(|lot| LotConsumption {
                        draws: vec![LotDraw {
                            entry_id: lot.entry_id,
                            acquisition_date: lot.acquisition_date,
                            quantity: entry.quantity,
                            unit_price: lot.unit_price,
                            discounts: lot.discounts,
                            allocated_yield: lot.allocated_yield,
                        }],
                    })
                } else {
                    match tracker.record_sell(symbol, entry.quantity) {
                        Ok(consumption) => Some(consumption),
                        Err(_) => {
                            tracker.drain(symbol, entry.quantity);
                            None
                        }
                    }
                };

                match consumption {
                    Some(consumption) if reportable => {
                        let operation = close_trade(entry, &consumption);
                        report
                            .totals
                            .entry(operation.currency)
                            .or_default()
                            .add(&operation);
                        report.operations.push(operation);
                    }
                    Some(_) => {}
                    None if reportable => {
                        report.unmatched_sells += 1;
                        report.warnings.push(DataQualityWarning::record(
                            DataQualityKind::UnmatchedSell,
                            &entry.id,
                            entry.date,
                            symbol,
                            format!(
                                "Sell of {} exceeds the {} held in open lots",
                                entry.quantity, available
                            ),
                        ));
                    }
                    None => {}
                }
            }
            TransactionKind::Cash { .. } => {}
        }
    }

    debug!(
        "Reconstructed {} finished operations, {} unmatched sells",
        report.operations.len(),
        report.unmatched_sells
    );
    report
}

fn close_trade(entry: &JournalEntry, consumption: &LotConsumption) -> FinishedOperation {
    let buy_cost = consumption.cost();
    let value_difference = entry.price * entry.quantity - buy_cost;
    let discounts = -(consumption.discounts() + entry.amounts.total_discounts);
    let yield_amount = entry.yield_amount + consumption.allocated_yield();

    FinishedOperation {
        entry_id: entry.id.clone(),
        date: entry.date,
        instrument_type: entry.instrument_type,
        broker: entry.broker.clone(),
        symbol: entry.symbol_str().to_string(),
        currency: entry.currency,
        quantity: entry.quantity,
        average_buy_price: consumption.average_price(),
        sell_price: entry.price,
        value_difference,
        discounts,
        yield_amount,
        result: value_difference + yield_amount + discounts,
    }
}

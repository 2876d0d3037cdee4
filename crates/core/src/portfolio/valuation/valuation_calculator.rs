use super::valuation_model::{
    DualAmount, InstrumentTotals, LiquidityValuation, PositionValuation, PriceStatus,
    ValuationReport, ValuationView,
};
use crate::constants::{
    is_quantity_significant, BOND_EXIT_COST_RATE, BOND_PRICE_SCALE, EQUITY_EXIT_COST_RATE,
};
use crate::errors::Result;
use crate::fx::{FxRateResolver, RateKind, ResolvedRate};
use crate::journal::{Broker, Currency, InstrumentType};
use crate::market_data::MarketPriceLookupTrait;
use crate::portfolio::holdings::{CashByBroker, Position};

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Values the open positions and the cash balances at `valuation_date`.
///
/// Every amount is reported in both currencies. Costs, journal discounts and
/// yields convert with the position's acquisition rate; current values and the
/// estimated exit cost convert with the current rate. Percentages use the total
/// selected by `view` as denominator, separately per currency.
///
/// # Arguments
///
/// * `positions` - Output of the last position recomputation.
/// * `cash_local` / `cash_hard` - Per-broker cash balances in each currency.
/// * `prices` - Last market prices.
/// * `resolver` - Source of the current FX rates.
pub fn valuate(
    positions: &[Position],
    cash_local: &CashByBroker,
    cash_hard: &CashByBroker,
    prices: &dyn MarketPriceLookupTrait,
    resolver: &FxRateResolver,
    valuation_date: NaiveDate,
    view: ValuationView,
) -> Result<ValuationReport> {
    debug!(
        "Valuing {} positions as of {} ({:?})",
        positions.len(),
        valuation_date,
        view
    );
    let mut rates = CurrentRates::new(resolver, valuation_date);

    let mut position_rows = Vec::with_capacity(positions.len());
    for position in positions {
        if !is_quantity_significant(&position.quantity) {
            continue;
        }
        let current_rate = rates.for_instrument(position.instrument_type)?;
        position_rows.push(value_position(position, prices, current_rate)?);
    }

    let cash_rate = rates.for_instrument(InstrumentType::CashDepositHard)?;
    let mut liquidity_rows = value_liquidity(cash_local, cash_hard, cash_rate.value);

    let total_investments = position_rows
        .iter()
        .fold(DualAmount::ZERO, |acc, row| acc + row.value);
    let total_liquidity = liquidity_rows
        .iter()
        .fold(DualAmount::ZERO, |acc, row| acc + row.value);
    let total_value = if view.includes_liquidity() {
        total_investments + total_liquidity
    } else {
        total_investments
    };

    for row in position_rows.iter_mut() {
        row.percentage = row.value.percentage_of(&total_value);
    }
    if view.includes_liquidity() {
        for row in liquidity_rows.iter_mut() {
            row.percentage = row.value.percentage_of(&total_value);
        }
    }

    let totals_by_instrument = totals_by_instrument(&position_rows, &total_value);
    let total_result = position_rows
        .iter()
        .fold(DualAmount::ZERO, |acc, row| acc + row.result);

    Ok(ValuationReport {
        valuation_date,
        view,
        positions: position_rows,
        liquidity: liquidity_rows,
        totals_by_instrument,
        total_liquidity,
        total_investments,
        total_value,
        total_result,
    })
}

/// Current rates resolved once per rate kind.
struct CurrentRates<'a> {
    resolver: &'a FxRateResolver,
    date: NaiveDate,
    resolved: HashMap<RateKind, ResolvedRate>,
}

impl<'a> CurrentRates<'a> {
    fn new(resolver: &'a FxRateResolver, date: NaiveDate) -> Self {
        CurrentRates {
            resolver,
            date,
            resolved: HashMap::new(),
        }
    }

    fn for_instrument(&mut self, instrument_type: InstrumentType) -> Result<ResolvedRate> {
        let kind = RateKind::for_instrument(instrument_type);
        if let Some(rate) = self.resolved.get(&kind) {
            return Ok(rate.clone());
        }
        let rate = self.resolver.resolve_or_default(self.date, instrument_type)?;
        self.resolved.insert(kind, rate.clone());
        Ok(rate)
    }
}

fn value_position(
    position: &Position,
    prices: &dyn MarketPriceLookupTrait,
    current_rate: ResolvedRate,
) -> Result<PositionValuation> {
    let (current_price, price_status, daily_change) = current_price(position, prices)?;

    let current_fx = current_rate.value;
    let acquisition_fx = if position.acquisition_fx_rate > Decimal::ZERO {
        position.acquisition_fx_rate
    } else {
        current_fx
    };
    let currency = position.currency;

    let native_value = position.quantity * current_price;
    let exit_cost = native_value * exit_cost_rate(position.instrument_type);

    let cost = to_dual(position.cost_basis(), currency, acquisition_fx);
    let value = to_dual(native_value, currency, current_fx);
    let value_difference = value - cost;
    let discounts = to_dual(position.discounts, currency, acquisition_fx)
        + to_dual(exit_cost, currency, current_fx);
    let yields = to_dual(position.yields, currency, acquisition_fx);
    let result = value_difference - discounts + yields;

    Ok(PositionValuation {
        broker: position.broker.clone(),
        symbol: position.symbol.clone(),
        instrument_type: position.instrument_type,
        currency,
        quantity: position.quantity,
        average_cost: position.average_cost,
        current_price,
        price_status,
        daily_change,
        acquisition_fx_rate: acquisition_fx,
        current_fx_rate: current_fx,
        fx_status: current_rate.status,
        cost,
        value,
        value_difference,
        discounts,
        yields,
        result,
        percentage: DualAmount::ZERO,
    })
}

fn current_price(
    position: &Position,
    prices: &dyn MarketPriceLookupTrait,
) -> Result<(Decimal, PriceStatus, Option<Decimal>)> {
    match position.instrument_type {
        InstrumentType::FixedTermDeposit
        | InstrumentType::CashDepositLocal
        | InstrumentType::CashDepositHard => Ok((Decimal::ONE, PriceStatus::Market, None)),
        instrument_type => match prices.get_last_price(&position.symbol)? {
            Some(price) if price > Decimal::ZERO => {
                let price = if instrument_type == InstrumentType::Bond {
                    price * BOND_PRICE_SCALE
                } else {
                    price
                };
                let daily_change = prices.get_daily_change(&position.symbol)?;
                Ok((price, PriceStatus::Market, daily_change))
            }
            _ => {
                warn!(
                    "No market price for {} at {}. Valuing at average cost {}",
                    position.symbol, position.broker, position.average_cost
                );
                Ok((position.average_cost, PriceStatus::Unavailable, None))
            }
        },
    }
}

fn exit_cost_rate(instrument_type: InstrumentType) -> Decimal {
    match instrument_type {
        InstrumentType::Equity
        | InstrumentType::DepositaryReceipt
        | InstrumentType::Etf
        | InstrumentType::Crypto => EQUITY_EXIT_COST_RATE,
        InstrumentType::Bond => BOND_EXIT_COST_RATE,
        InstrumentType::CashDepositLocal
        | InstrumentType::CashDepositHard
        | InstrumentType::FixedTermDeposit
        | InstrumentType::Fund
        | InstrumentType::Repo => Decimal::ZERO,
    }
}

/// Expresses an amount booked in `currency` in both currencies.
/// `rate` is local currency per unit of hard currency.
fn to_dual(amount: Decimal, currency: Currency, rate: Decimal) -> DualAmount {
    match currency {
        Currency::Local => {
            let hard = if rate.is_zero() { amount } else { amount / rate };
            DualAmount::new(amount, hard)
        }
        Currency::Hard => DualAmount::new(amount * rate, amount),
    }
}

fn value_liquidity(
    cash_local: &CashByBroker,
    cash_hard: &CashByBroker,
    rate: Decimal,
) -> Vec<LiquidityValuation> {
    let brokers: BTreeSet<&Broker> = cash_local.keys().chain(cash_hard.keys()).collect();

    brokers
        .into_iter()
        .filter_map(|broker| {
            let local = cash_local.get(broker).copied().unwrap_or_default();
            let hard = cash_hard.get(broker).copied().unwrap_or_default();
            if !is_quantity_significant(&local) && !is_quantity_significant(&hard) {
                return None;
            }
            let value = to_dual(local, Currency::Local, rate) + to_dual(hard, Currency::Hard, rate);
            Some(LiquidityValuation {
                broker: broker.clone(),
                balances: DualAmount::new(local, hard),
                value,
                percentage: DualAmount::ZERO,
            })
        })
        .collect()
}

fn totals_by_instrument(
    rows: &[PositionValuation],
    total_value: &DualAmount,
) -> Vec<InstrumentTotals> {
    let mut grouped: BTreeMap<InstrumentType, InstrumentTotals> = BTreeMap::new();
    for row in rows {
        let totals = grouped
            .entry(row.instrument_type)
            .or_insert_with(|| InstrumentTotals {
                instrument_type: row.instrument_type,
                cost: DualAmount::ZERO,
                value: DualAmount::ZERO,
                result: DualAmount::ZERO,
                percentage: DualAmount::ZERO,
            });
        totals.cost += row.cost;
        totals.value += row.value;
        totals.result += row.result;
    }

    grouped
        .into_values()
        .map(|mut totals| {
            totals.percentage = totals.value.percentage_of(total_value);
            totals
        })
        .collect()
}

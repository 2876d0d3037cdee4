#[cfg(test)]
mod tests {
    use crate::fx::{FxRate, FxRateResolver, FxRateTable, FxSource, RateKind, RateStatus};
    use crate::journal::{Broker, Currency, InstrumentType};
    use crate::market_data::{MarketPriceTable, MarketQuote};
    use crate::portfolio::holdings::{CashByBroker, Position};
    use crate::portfolio::valuation::{valuate, DualAmount, PriceStatus, ValuationView};
    use crate::settings::LedgerSettings;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn resolver() -> FxRateResolver {
        let rates = vec![
            FxRate::new(today(), RateKind::Mep, FxSource::Ambito, dec!(1200)),
            FxRate::new(today(), RateKind::Ccl, FxSource::Ambito, dec!(1000)),
        ];
        FxRateResolver::new(Arc::new(FxRateTable::new(rates)), &LedgerSettings::default())
    }

    fn prices(quotes: &[(&str, Decimal)]) -> MarketPriceTable {
        MarketPriceTable::new(
            quotes
                .iter()
                .map(|(symbol, price)| MarketQuote {
                    symbol: symbol.to_string(),
                    last_price: *price,
                    daily_change: Some(dec!(-0.5)),
                    as_of: Utc::now(),
                })
                .collect(),
        )
    }

    fn create_position(
        symbol: &str,
        instrument_type: InstrumentType,
        quantity: Decimal,
        average_cost: Decimal,
    ) -> Position {
        Position {
            broker: Broker::Iol,
            symbol: symbol.to_string(),
            instrument_type,
            currency: Currency::Local,
            quantity,
            average_cost,
            acquisition_fx_rate: dec!(1000),
            discounts: Decimal::ZERO,
            yields: Decimal::ZERO,
            opened_at: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        }
    }

    fn no_cash() -> CashByBroker {
        CashByBroker::new()
    }

    #[test]
    fn test_local_equity_uses_acquisition_and_current_rates() {
        let mut position = create_position("GGAL", InstrumentType::Equity, dec!(10), dec!(100));
        position.discounts = dec!(8);

        let report = valuate(
            &[position],
            &no_cash(),
            &no_cash(),
            &prices(&[("GGAL", dec!(150))]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        let row = &report.positions[0];
        assert_eq!(row.price_status, PriceStatus::Market);
        assert_eq!(row.daily_change, Some(dec!(-0.5)));
        assert_eq!(row.cost, DualAmount::new(dec!(1000), dec!(1)));
        assert_eq!(row.value, DualAmount::new(dec!(1500), dec!(1.25)));
        // 8 from the journal plus 0.008228 of the current value
        assert_eq!(row.discounts.local, dec!(20.342));
        assert_eq!(row.discounts.hard, dec!(0.018285));
        assert_eq!(row.result.local, dec!(479.658));
        assert_eq!(
            row.fx_status,
            RateStatus::Exact {
                source: FxSource::Ambito
            }
        );
    }

    #[test]
    fn test_hard_position_shows_currency_effect() {
        let mut position = create_position("SPY", InstrumentType::DepositaryReceipt, dec!(2), dec!(100));
        position.currency = Currency::Hard;
        position.acquisition_fx_rate = dec!(900);

        let report = valuate(
            &[position],
            &no_cash(),
            &no_cash(),
            &prices(&[("SPY", dec!(110))]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        let row = &report.positions[0];
        assert_eq!(row.current_fx_rate, dec!(1000));
        assert_eq!(row.cost, DualAmount::new(dec!(180000), dec!(200)));
        assert_eq!(row.value, DualAmount::new(dec!(220000), dec!(220)));
        assert_eq!(row.value_difference, DualAmount::new(dec!(40000), dec!(20)));
    }

    #[test]
    fn test_bond_price_is_scaled_per_hundred() {
        let position = create_position("AL30", InstrumentType::Bond, dec!(100), dec!(0.6));

        let report = valuate(
            &[position],
            &no_cash(),
            &no_cash(),
            &prices(&[("AL30", dec!(65))]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        let row = &report.positions[0];
        assert_eq!(row.current_price, dec!(0.65));
        assert_eq!(row.value.local, dec!(65));
        assert_eq!(row.discounts.local, dec!(65) * dec!(0.006171));
    }

    #[test]
    fn test_missing_price_falls_back_to_average_cost() {
        let position = create_position("YPFD", InstrumentType::Equity, dec!(4), dec!(250));

        let report = valuate(
            &[position],
            &no_cash(),
            &no_cash(),
            &prices(&[]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        let row = &report.positions[0];
        assert_eq!(row.price_status, PriceStatus::Unavailable);
        assert_eq!(row.current_price, dec!(250));
        assert_eq!(row.value.local, dec!(1000));
        assert_eq!(row.value_difference.local, Decimal::ZERO);
        assert_eq!(row.result.local, dec!(-8.228));
    }

    #[test]
    fn test_fixed_term_valued_at_face_without_exit_cost() {
        let mut position = create_position(
            "Plazo Fijo 1",
            InstrumentType::FixedTermDeposit,
            dec!(100000),
            dec!(1),
        );
        position.yields = dec!(3000);

        let report = valuate(
            &[position],
            &no_cash(),
            &no_cash(),
            &prices(&[]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        let row = &report.positions[0];
        assert_eq!(row.price_status, PriceStatus::Market);
        assert_eq!(row.value.local, dec!(100000));
        assert_eq!(row.discounts, DualAmount::ZERO);
        assert_eq!(row.result.local, dec!(3000));
    }

    #[test]
    fn test_view_selects_percentage_denominator() {
        let position = create_position("GGAL", InstrumentType::Equity, dec!(10), dec!(100));
        let mut cash_local = CashByBroker::new();
        cash_local.insert(Broker::Iol, dec!(1500));
        let market = prices(&[("GGAL", dec!(150))]);
        let resolver = resolver();

        let included = valuate(
            &[position.clone()],
            &cash_local,
            &no_cash(),
            &market,
            &resolver,
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();
        assert_eq!(included.total_value, DualAmount::new(dec!(3000), dec!(2.5)));
        assert_eq!(included.positions[0].percentage, DualAmount::new(dec!(50), dec!(50)));
        assert_eq!(included.liquidity[0].percentage.local, dec!(50));

        let excluded = valuate(
            &[position],
            &cash_local,
            &no_cash(),
            &market,
            &resolver,
            today(),
            ValuationView::ExcludeLiquidity,
        )
        .unwrap();
        assert_eq!(excluded.total_value, DualAmount::new(dec!(1500), dec!(1.25)));
        assert_eq!(excluded.positions[0].percentage.local, dec!(100));
        assert_eq!(excluded.liquidity[0].percentage, DualAmount::ZERO);
        assert_eq!(excluded.total_liquidity.local, dec!(1500));
    }

    #[test]
    fn test_liquidity_rows_merge_both_currencies_per_broker() {
        let mut cash_local = CashByBroker::new();
        cash_local.insert(Broker::Iol, dec!(2400));
        cash_local.insert(Broker::Cocos, Decimal::ZERO);
        let mut cash_hard = CashByBroker::new();
        cash_hard.insert(Broker::Iol, dec!(3));
        cash_hard.insert(Broker::Binance, dec!(10));

        let report = valuate(
            &[],
            &cash_local,
            &cash_hard,
            &prices(&[]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        assert_eq!(report.liquidity.len(), 2);
        let iol = report
            .liquidity
            .iter()
            .find(|row| row.broker == Broker::Iol)
            .unwrap();
        assert_eq!(iol.balances, DualAmount::new(dec!(2400), dec!(3)));
        assert_eq!(iol.value, DualAmount::new(dec!(6000), dec!(5)));
    }

    #[test]
    fn test_missing_current_rate_uses_default() {
        let position = create_position("GGAL", InstrumentType::Equity, dec!(1), dec!(100));
        let empty = FxRateResolver::new(
            Arc::new(FxRateTable::new(vec![])),
            &LedgerSettings::default(),
        );

        let report = valuate(
            &[position],
            &no_cash(),
            &no_cash(),
            &prices(&[("GGAL", dec!(100))]),
            &empty,
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        assert_eq!(report.positions[0].fx_status, RateStatus::Default);
        assert_eq!(report.positions[0].current_fx_rate, Decimal::ONE);
        assert_eq!(report.positions[0].value.hard, dec!(100));
    }

    #[test]
    fn test_totals_grouped_by_instrument_type() {
        let positions = vec![
            create_position("AL30", InstrumentType::Bond, dec!(100), dec!(0.6)),
            create_position("GGAL", InstrumentType::Equity, dec!(10), dec!(100)),
            create_position("YPFD", InstrumentType::Equity, dec!(2), dec!(200)),
        ];

        let report = valuate(
            &positions,
            &no_cash(),
            &no_cash(),
            &prices(&[("AL30", dec!(60)), ("GGAL", dec!(100)), ("YPFD", dec!(200))]),
            &resolver(),
            today(),
            ValuationView::IncludeLiquidity,
        )
        .unwrap();

        assert_eq!(report.totals_by_instrument.len(), 2);
        let equity = report
            .totals_by_instrument
            .iter()
            .find(|totals| totals.instrument_type == InstrumentType::Equity)
            .unwrap();
        assert_eq!(equity.value.local, dec!(1400));
        assert_eq!(equity.cost.local, dec!(1400));
        assert_eq!(report.total_investments.local, dec!(1460));
        let share_sum: Decimal = report
            .totals_by_instrument
            .iter()
            .map(|totals| totals.percentage.local)
            .sum();
        assert_eq!(share_sum.round_dp(10), dec!(100));
    }
}

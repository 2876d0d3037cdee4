#[cfg(test)]
mod tests {
    use crate::errors::{DatabaseError, Error, Result, ValidationError};
    use crate::fx::{FxRate, FxRateResolver, FxRateTable, FxSource, RateKind};
    use crate::journal::{
        Broker, Currency, InstrumentType, JournalEntry, JournalRepositoryTrait, NewJournalEntry,
        OperationKind,
    };
    use crate::ledger::{LedgerService, LedgerServiceTrait};
    use crate::market_data::{MarketPriceTable, MarketQuote};
    use crate::portfolio::{Position, PositionRepositoryTrait, ValuationView};
    use crate::settings::LedgerSettings;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock JournalRepository ---
    #[derive(Default)]
    struct MockJournalRepository {
        entries: Mutex<Vec<JournalEntry>>,
    }

    #[async_trait]
    impl JournalRepositoryTrait for MockJournalRepository {
        fn list_entries(&self) -> Result<Vec<JournalEntry>> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn insert_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        }

        async fn delete_entry(&self, entry_id: &str) -> Result<JournalEntry> {
            let mut entries = self.entries.lock().unwrap();
            let index = entries
                .iter()
                .position(|entry| entry.id == entry_id)
                .ok_or_else(|| Error::Database(DatabaseError::NotFound(entry_id.to_string())))?;
            Ok(entries.remove(index))
        }
    }

    // --- Mock PositionRepository ---
    #[derive(Default)]
    struct MockPositionRepository {
        positions: Mutex<Vec<Position>>,
        replacements: Mutex<usize>,
    }

    #[async_trait]
    impl PositionRepositoryTrait for MockPositionRepository {
        fn list_positions(&self) -> Result<Vec<Position>> {
            Ok(self.positions.lock().unwrap().clone())
        }

        async fn replace_all(&self, positions: Vec<Position>) -> Result<usize> {
            *self.replacements.lock().unwrap() += 1;
            let count = positions.len();
            *self.positions.lock().unwrap() = positions;
            Ok(count)
        }
    }

    struct Fixture {
        service: LedgerService,
        journal: Arc<MockJournalRepository>,
        positions: Arc<MockPositionRepository>,
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn setup() -> Fixture {
        let settings = LedgerSettings::default();
        let rates = FxRateTable::new(vec![FxRate::new(
            day(1, 2),
            RateKind::Mep,
            FxSource::Ambito,
            dec!(1000),
        )]);
        let resolver = FxRateResolver::new(Arc::new(rates), &settings);
        let journal = Arc::new(MockJournalRepository::default());
        let positions = Arc::new(MockPositionRepository::default());
        let service = LedgerService::new(journal.clone(), positions.clone(), resolver, &settings);
        Fixture {
            service,
            journal,
            positions,
        }
    }

    fn draft(
        date: NaiveDate,
        instrument_type: InstrumentType,
        operation_kind: OperationKind,
        symbol: Option<&str>,
        quantity: Decimal,
        price: Decimal,
    ) -> NewJournalEntry {
        NewJournalEntry {
            id: None,
            date,
            instrument_type,
            operation_kind,
            symbol: symbol.map(str::to_string),
            detail: None,
            settlement_term: None,
            quantity,
            price,
            yield_amount: Decimal::ZERO,
            broker: Some(Broker::Iol),
            currency: None,
            fx_rate: None,
        }
    }

    fn deposit(date: NaiveDate, amount: Decimal) -> NewJournalEntry {
        draft(
            date,
            InstrumentType::CashDepositLocal,
            OperationKind::Deposit,
            None,
            amount,
            Decimal::ONE,
        )
    }

    fn equity(operation_kind: OperationKind, date: NaiveDate, quantity: Decimal) -> NewJournalEntry {
        draft(
            date,
            InstrumentType::Equity,
            operation_kind,
            Some("GGAL"),
            quantity,
            dec!(100),
        )
    }

    #[tokio::test]
    async fn test_record_entry_assigns_sequence_rate_and_recomputes() {
        let fixture = setup();

        let first = fixture.service.record_entry(deposit(day(1, 2), dec!(2000))).await.unwrap();
        let second = fixture
            .service
            .record_entry(equity(OperationKind::Buy, day(1, 3), dec!(10)))
            .await
            .unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_ne!(first.id, second.id);
        // Stale MEP quote from the day before
        assert_eq!(second.fx_rate, dec!(1000));
        assert_eq!(second.amounts.total_cost, dec!(1008.228));

        let positions = fixture.service.positions().unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, dec!(10));
        assert_eq!(*fixture.positions.replacements.lock().unwrap(), 2);

        let cash = fixture.service.cash_by_broker(Currency::Local).unwrap();
        assert_eq!(cash[&Broker::Iol], dec!(991.772));
    }

    #[tokio::test]
    async fn test_rejected_sell_leaves_journal_untouched() {
        let fixture = setup();
        fixture.service.record_entry(deposit(day(1, 2), dec!(2000))).await.unwrap();
        fixture
            .service
            .record_entry(equity(OperationKind::Buy, day(1, 3), dec!(6)))
            .await
            .unwrap();

        let result = fixture
            .service
            .record_entry(equity(OperationKind::Sell, day(1, 4), dec!(10)))
            .await;

        match result {
            Err(Error::Validation(ValidationError::InsufficientHoldings { available, .. })) => {
                assert_eq!(available, dec!(6));
            }
            other => panic!("expected insufficient holdings, got {:?}", other),
        }
        assert_eq!(fixture.journal.entries.lock().unwrap().len(), 2);
        assert_eq!(*fixture.positions.replacements.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_buy_without_cash_is_rejected() {
        let fixture = setup();

        let result = fixture
            .service
            .record_entry(equity(OperationKind::Buy, day(1, 3), dec!(1)))
            .await;

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InsufficientCash { .. }))
        ));
        assert!(fixture.service.list_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_entry_recomputes_positions() {
        let fixture = setup();
        fixture.service.record_entry(deposit(day(1, 2), dec!(2000))).await.unwrap();
        let buy = fixture
            .service
            .record_entry(equity(OperationKind::Buy, day(1, 3), dec!(10)))
            .await
            .unwrap();

        let deleted = fixture.service.delete_entry(&buy.id).await.unwrap();

        assert_eq!(deleted.id, buy.id);
        assert!(fixture.service.positions().unwrap().is_empty());
        assert!(fixture.service.holdings_by_broker().unwrap().is_empty());
        assert!(fixture.service.delete_entry(&buy.id).await.is_err());
    }

    #[tokio::test]
    async fn test_fixed_term_certificates_are_numbered() {
        let fixture = setup();
        fixture.service.record_entry(deposit(day(1, 2), dec!(300000))).await.unwrap();

        let certificate = |date| {
            draft(
                date,
                InstrumentType::FixedTermDeposit,
                OperationKind::Buy,
                None,
                dec!(100000),
                Decimal::ONE,
            )
        };
        let first = fixture.service.record_entry(certificate(day(1, 3))).await.unwrap();
        let second = fixture.service.record_entry(certificate(day(1, 4))).await.unwrap();

        assert_eq!(first.symbol.as_deref(), Some("Plazo Fijo 1"));
        assert_eq!(second.symbol.as_deref(), Some("Plazo Fijo 2"));
        assert_eq!(first.amounts.total_discounts, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let fixture = setup();
        let mut first = deposit(day(1, 2), dec!(100));
        first.id = Some("cash-1".to_string());
        fixture.service.record_entry(first.clone()).await.unwrap();

        let result = fixture.service.record_entry(first).await;

        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
    }

    #[tokio::test]
    async fn test_preview_does_not_store() {
        let fixture = setup();
        fixture.service.record_entry(deposit(day(1, 2), dec!(2000))).await.unwrap();

        let amounts = fixture
            .service
            .preview_entry(&equity(OperationKind::Buy, day(1, 3), dec!(10)))
            .unwrap();

        assert_eq!(amounts.total_cost, dec!(1008.228));
        assert_eq!(fixture.service.list_entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_side_reports() {
        let fixture = setup();
        fixture.service.record_entry(deposit(day(1, 2), dec!(5000))).await.unwrap();
        fixture
            .service
            .record_entry(equity(OperationKind::Buy, day(1, 3), dec!(10)))
            .await
            .unwrap();
        let mut sell = equity(OperationKind::Sell, day(2, 5), dec!(4));
        sell.price = dec!(150);
        fixture.service.record_entry(sell).await.unwrap();

        let report = fixture.service.finished_operations(None, None).unwrap();
        assert_eq!(report.operations.len(), 1);
        assert_eq!(report.operations[0].value_difference, dec!(200));

        let prices = MarketPriceTable::new(vec![MarketQuote {
            symbol: "GGAL".to_string(),
            last_price: dec!(150),
            daily_change: None,
            as_of: Utc::now(),
        }]);
        let valuation = fixture.service.valuate(&prices, day(2, 6), None).unwrap();
        assert_eq!(valuation.view, ValuationView::IncludeLiquidity);
        assert_eq!(valuation.positions.len(), 1);
        assert_eq!(valuation.positions[0].value.local, dec!(900));
        assert_eq!(valuation.liquidity.len(), 1);

        let excluded = fixture
            .service
            .valuate(&prices, day(2, 6), Some(ValuationView::ExcludeLiquidity))
            .unwrap();
        assert_eq!(excluded.total_value.local, dec!(900));
    }
}

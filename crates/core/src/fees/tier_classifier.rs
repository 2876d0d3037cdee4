use super::fee_model::FeeTier;
use crate::journal::{Broker, InstrumentType, JournalEntry, TransactionKind};
use crate::settings::TierThresholds;
use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

/// First and last day of the calendar month before `reference`'s month.
pub fn previous_month_range(reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first_of_month = reference.with_day(1)?;
    let last_of_previous = first_of_month.pred_opt()?;
    let first_of_previous = last_of_previous.with_day(1)?;
    Some((first_of_previous, last_of_previous))
}

fn counts_toward_volume(entry: &JournalEntry) -> bool {
    match entry.kind() {
        Ok(TransactionKind::Trade { instrument, .. }) => {
            instrument.is_equity_like() || instrument == InstrumentType::Bond
        }
        _ => false,
    }
}

/// Local-currency notional traded with `broker` during the month before
/// `reference`'s month. Hard-currency entries use their own recorded rate.
pub fn trailing_month_volume(
    entries: &[JournalEntry],
    broker: &Broker,
    reference: NaiveDate,
) -> Decimal {
    let Some((from, to)) = previous_month_range(reference) else {
        return Decimal::ZERO;
    };

    entries
        .iter()
        .filter(|entry| &entry.broker == broker)
        .filter(|entry| entry.date >= from && entry.date <= to)
        .filter(|entry| counts_toward_volume(entry))
        .map(JournalEntry::notional_local)
        .sum()
}

/// Lower bounds are inclusive: a volume exactly at a threshold gets the higher tier.
pub fn classify_tier(volume: Decimal, thresholds: &TierThresholds) -> FeeTier {
    if volume >= thresholds.top {
        FeeTier::Premium
    } else if volume >= thresholds.middle {
        FeeTier::Plus
    } else {
        FeeTier::Standard
    }
}

/// Computes a broker's tier as of a transaction date.
///
/// Nothing is cached: the trailing month moves with each transaction's date.
#[derive(Debug, Clone, Default)]
pub struct TierClassifier {
    thresholds: TierThresholds,
}

impl TierClassifier {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, entries: &[JournalEntry], broker: &Broker, date: NaiveDate) -> FeeTier {
        let volume = trailing_month_volume(entries, broker, date);
        let tier = classify_tier(volume, &self.thresholds);
        debug!(
            "Broker {} traded {} in the month before {}: tier {}",
            broker, volume, date, tier
        );
        tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{Currency, DerivedAmounts, NewJournalEntry, OperationKind};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trade(
        date: NaiveDate,
        instrument_type: InstrumentType,
        broker: Broker,
        quantity: Decimal,
        price: Decimal,
    ) -> JournalEntry {
        NewJournalEntry {
            id: None,
            date,
            instrument_type,
            operation_kind: OperationKind::Buy,
            symbol: Some("AL30".to_string()),
            detail: None,
            settlement_term: None,
            quantity,
            price,
            yield_amount: Decimal::ZERO,
            broker: Some(broker),
            currency: None,
            fx_rate: None,
        }
        .into_entry(
            format!("{}-{}", date, quantity),
            0,
            DerivedAmounts::default(),
            Utc::now(),
        )
    }

    #[test]
    fn test_previous_month_range_crosses_year() {
        assert_eq!(
            previous_month_range(day(2024, 1, 15)),
            Some((day(2023, 12, 1), day(2023, 12, 31)))
        );
        assert_eq!(
            previous_month_range(day(2024, 3, 1)),
            Some((day(2024, 2, 1), day(2024, 2, 29)))
        );
    }

    #[test]
    fn test_volume_counts_only_previous_month_and_broker() {
        let entries = vec![
            trade(day(2024, 4, 10), InstrumentType::Equity, Broker::Bmb, dec!(10), dec!(1000)),
            trade(day(2024, 4, 30), InstrumentType::Bond, Broker::Bmb, dec!(5), dec!(2000)),
            // Same month as the reference date
            trade(day(2024, 5, 2), InstrumentType::Equity, Broker::Bmb, dec!(1), dec!(9999)),
            // Other broker
            trade(day(2024, 4, 12), InstrumentType::Equity, Broker::Iol, dec!(1), dec!(9999)),
            // Not an eligible instrument
            trade(day(2024, 4, 12), InstrumentType::Fund, Broker::Bmb, dec!(1), dec!(9999)),
        ];

        assert_eq!(
            trailing_month_volume(&entries, &Broker::Bmb, day(2024, 5, 20)),
            dec!(20000)
        );
    }

    #[test]
    fn test_volume_converts_hard_currency_with_entry_rate() {
        let mut entry = trade(
            day(2024, 4, 10),
            InstrumentType::DepositaryReceipt,
            Broker::Bmb,
            dec!(10),
            dec!(50),
        );
        entry.currency = Currency::Hard;
        entry.fx_rate = dec!(1000);

        assert_eq!(
            trailing_month_volume(&[entry], &Broker::Bmb, day(2024, 5, 1)),
            dec!(500000)
        );
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let thresholds = TierThresholds::default();
        assert_eq!(classify_tier(dec!(49999999.99), &thresholds), FeeTier::Standard);
        assert_eq!(classify_tier(dec!(50000000), &thresholds), FeeTier::Plus);
        assert_eq!(classify_tier(dec!(199999999), &thresholds), FeeTier::Plus);
        assert_eq!(classify_tier(dec!(200000000), &thresholds), FeeTier::Premium);
    }

    #[test]
    fn test_classifier_uses_trailing_month() {
        let classifier = TierClassifier::new(TierThresholds {
            middle: dec!(1000),
            top: dec!(5000),
        });
        let entries = vec![trade(
            day(2024, 4, 10),
            InstrumentType::Equity,
            Broker::Bmb,
            dec!(10),
            dec!(100),
        )];

        assert_eq!(
            classifier.classify(&entries, &Broker::Bmb, day(2024, 5, 3)),
            FeeTier::Plus
        );
        // Two months later the April volume no longer counts
        assert_eq!(
            classifier.classify(&entries, &Broker::Bmb, day(2024, 6, 3)),
            FeeTier::Standard
        );
    }
}

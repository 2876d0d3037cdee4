use super::fee_model::FeeTier;
use super::fee_schedule::resolve_fee_rates;
use super::intraday::detect_intraday_round_trip;
use super::tier_classifier::TierClassifier;
use crate::errors::{Result, ValidationError};
use crate::journal::{
    Broker, CashFlow, DerivedAmounts, JournalEntry, NewJournalEntry, TradeSide, TransactionKind,
};
use crate::portfolio::{cash_by_broker, holdings_by_broker};
use crate::settings::LedgerSettings;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fields the derived amounts of an entry are computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationInput {
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub price: Decimal,
    pub yield_amount: Decimal,
    pub broker: Broker,
    /// Only consulted for tiered brokers.
    pub tier: Option<FeeTier>,
    /// Same-day reciprocal trade found: commission is halved.
    pub intraday: bool,
}

/// Derived monetary fields of an operation. Pure, no validation.
pub fn calculate_amounts(input: &OperationInput, vat_rate: Decimal) -> DerivedAmounts {
    let gross = input.quantity * input.price + input.yield_amount;

    if let TransactionKind::Cash { flow, .. } = input.kind {
        return match flow {
            CashFlow::In => DerivedAmounts {
                gross,
                total_income: gross,
                balance: gross,
                ..Default::default()
            },
            CashFlow::Out => DerivedAmounts {
                gross,
                total_cost: gross,
                balance: -gross,
                ..Default::default()
            },
        };
    }

    let rates = resolve_fee_rates(&input.broker, input.kind, input.tier);
    let mut commission = rates.commission * gross;
    if input.intraday {
        commission /= dec!(2);
    }
    let duty = rates.duty * gross;
    let commission_tax = commission * vat_rate;
    let duty_tax = duty * vat_rate;
    let total_discounts = commission + duty + commission_tax + duty_tax;

    let mut amounts = DerivedAmounts {
        gross,
        commission,
        duty,
        commission_tax,
        duty_tax,
        total_discounts,
        ..Default::default()
    };
    if input.kind.is_outflow() {
        amounts.total_cost = gross + total_discounts;
        amounts.balance = -amounts.total_cost;
    } else {
        amounts.total_income = gross - total_discounts;
        amounts.balance = amounts.total_income;
    }
    amounts
}

/// Computes and validates the derived fields of a draft entry before it is committed.
#[derive(Debug, Clone)]
pub struct OperationCalculator {
    tier_classifier: TierClassifier,
    vat_rate: Decimal,
    cash_epsilon: Decimal,
    holdings_epsilon: Decimal,
}

impl Default for OperationCalculator {
    fn default() -> Self {
        Self::new(&LedgerSettings::default())
    }
}

impl OperationCalculator {
    pub fn new(settings: &LedgerSettings) -> Self {
        Self {
            tier_classifier: TierClassifier::new(settings.tier_thresholds.clone()),
            vat_rate: settings.vat_rate,
            cash_epsilon: settings.cash_epsilon,
            holdings_epsilon: settings.holdings_epsilon,
        }
    }

    /// Derived amounts for `draft` against a snapshot of the committed journal.
    ///
    /// Fails with a [`ValidationError`] when a sell exceeds the broker's holdings
    /// or a net outflow would overdraw the broker's cash in the entry currency.
    pub fn compute(
        &self,
        draft: &NewJournalEntry,
        journal: &[JournalEntry],
    ) -> Result<DerivedAmounts> {
        let kind = draft.validate()?;
        let broker = draft.resolved_broker();

        let tier = broker
            .has_tiered_schedule()
            .then(|| self.tier_classifier.classify(journal, &broker, draft.date));
        let intraday = detect_intraday_round_trip(journal, draft, kind);

        let input = OperationInput {
            kind,
            quantity: draft.quantity,
            price: draft.price,
            yield_amount: draft.yield_amount,
            broker: broker.clone(),
            tier,
            intraday,
        };
        let amounts = calculate_amounts(&input, self.vat_rate);

        self.check_holdings(draft, kind, &broker, journal)?;
        self.check_cash(draft, &amounts, &broker, journal)?;

        debug!(
            "Computed {} {} on {} for {}: balance {} (tier {:?}, intraday {})",
            draft.operation_kind,
            draft.instrument_type,
            draft.date,
            broker,
            amounts.balance,
            tier,
            intraday
        );
        Ok(amounts)
    }

    fn check_holdings(
        &self,
        draft: &NewJournalEntry,
        kind: TransactionKind,
        broker: &Broker,
        journal: &[JournalEntry],
    ) -> Result<()> {
        if !matches!(
            kind,
            TransactionKind::Trade {
                side: TradeSide::Sell,
                ..
            }
        ) {
            return Ok(());
        }

        let symbol = draft.resolved_symbol().unwrap_or_default();
        let available = holdings_by_broker(journal)
            .get(broker)
            .and_then(|symbols| symbols.get(&symbol))
            .copied()
            .unwrap_or(Decimal::ZERO);

        if draft.quantity > available + self.holdings_epsilon {
            return Err(ValidationError::InsufficientHoldings {
                broker: broker.clone(),
                symbol,
                requested: draft.quantity,
                available,
            }
            .into());
        }
        Ok(())
    }

    fn check_cash(
        &self,
        draft: &NewJournalEntry,
        amounts: &DerivedAmounts,
        broker: &Broker,
        journal: &[JournalEntry],
    ) -> Result<()> {
        if !amounts.balance.is_sign_negative() || amounts.balance.is_zero() {
            return Ok(());
        }

        let currency = draft.resolved_currency();
        let available = cash_by_broker(journal, currency)
            .get(broker)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let required = -amounts.balance;

        if available - required < -self.cash_epsilon {
            return Err(ValidationError::InsufficientCash {
                broker: broker.clone(),
                currency,
                available,
                required,
            }
            .into());
        }
        Ok(())
    }
}

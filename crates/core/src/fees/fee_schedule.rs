use super::fee_model::{FeeRates, FeeTier};
use crate::journal::{Broker, InstrumentType, TransactionKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const YIELD_DEFAULT: FeeRates = FeeRates::new(dec!(0.005), dec!(0));
const EQUITY_DEFAULT: FeeRates = FeeRates::new(dec!(0.006), dec!(0.0008));
const BOND_DEFAULT: FeeRates = FeeRates::new(dec!(0.005), dec!(0.0001));

const COCOS_EQUITY: FeeRates = FeeRates::new(dec!(0.005), dec!(0.0008));
const EXCHANGE_CRYPTO: FeeRates = FeeRates::new(dec!(0.001), dec!(0));

/// Commission and duty rates for an operation.
///
/// Total over every (broker, operation) pair: combinations without a broker
/// specific entry use the broker-agnostic default table. `tier` only matters
/// for tiered brokers, where `None` means the lowest tier.
pub fn resolve_fee_rates(
    broker: &Broker,
    kind: TransactionKind,
    tier: Option<FeeTier>,
) -> FeeRates {
    let default = default_rates(kind);

    match (broker, kind) {
        (Broker::Bmb, TransactionKind::Trade { instrument, .. })
            if instrument.is_equity_like() || instrument == InstrumentType::Bond =>
        {
            FeeRates::new(
                tiered_commission(tier.unwrap_or_default(), instrument),
                default.duty,
            )
        }
        (Broker::Cocos, TransactionKind::Trade { instrument, .. }) if instrument.is_equity_like() => {
            COCOS_EQUITY
        }
        (
            Broker::Binance | Broker::Kucoin | Broker::Bybit | Broker::Bingx,
            TransactionKind::Trade {
                instrument: InstrumentType::Crypto,
                ..
            },
        ) => EXCHANGE_CRYPTO,
        _ => default,
    }
}

fn default_rates(kind: TransactionKind) -> FeeRates {
    match kind {
        TransactionKind::Yield { .. } => YIELD_DEFAULT,
        TransactionKind::Trade { instrument, .. } => match instrument {
            InstrumentType::Equity | InstrumentType::DepositaryReceipt | InstrumentType::Etf => {
                EQUITY_DEFAULT
            }
            InstrumentType::Bond => BOND_DEFAULT,
            InstrumentType::CashDepositLocal
            | InstrumentType::CashDepositHard
            | InstrumentType::FixedTermDeposit
            | InstrumentType::Crypto
            | InstrumentType::Fund
            | InstrumentType::Repo => FeeRates::ZERO,
        },
        TransactionKind::Cash { .. } => FeeRates::ZERO,
    }
}

fn tiered_commission(tier: FeeTier, instrument: InstrumentType) -> Decimal {
    let is_bond = instrument == InstrumentType::Bond;
    match (tier, is_bond) {
        (FeeTier::Standard, false) => dec!(0.005),
        (FeeTier::Standard, true) => dec!(0.004),
        (FeeTier::Plus, false) => dec!(0.0035),
        (FeeTier::Plus, true) => dec!(0.003),
        (FeeTier::Premium, _) => dec!(0.002),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{CashFlow, TradeSide};

    fn trade(instrument: InstrumentType, side: TradeSide) -> TransactionKind {
        TransactionKind::Trade { instrument, side }
    }

    #[test]
    fn test_default_table_for_untiered_broker() {
        let rates = resolve_fee_rates(
            &Broker::Iol,
            trade(InstrumentType::Equity, TradeSide::Buy),
            None,
        );
        assert_eq!(rates, FeeRates::new(dec!(0.006), dec!(0.0008)));

        let rates = resolve_fee_rates(
            &Broker::Iol,
            trade(InstrumentType::Bond, TradeSide::Sell),
            None,
        );
        assert_eq!(rates, FeeRates::new(dec!(0.005), dec!(0.0001)));
    }

    #[test]
    fn test_yield_uses_flat_commission() {
        let rates = resolve_fee_rates(
            &Broker::General,
            TransactionKind::Yield {
                instrument: InstrumentType::Bond,
            },
            None,
        );
        assert_eq!(rates.commission, dec!(0.005));
        assert_eq!(rates.duty, Decimal::ZERO);
    }

    #[test]
    fn test_cash_and_unlisted_instruments_are_free() {
        let cash = TransactionKind::Cash {
            instrument: InstrumentType::CashDepositLocal,
            flow: CashFlow::In,
        };
        assert_eq!(resolve_fee_rates(&Broker::Bmb, cash, None), FeeRates::ZERO);
        assert_eq!(
            resolve_fee_rates(
                &Broker::Iol,
                trade(InstrumentType::FixedTermDeposit, TradeSide::Buy),
                None
            ),
            FeeRates::ZERO
        );
        assert_eq!(
            resolve_fee_rates(
                &Broker::Other("PPI".to_string()),
                trade(InstrumentType::Fund, TradeSide::Buy),
                None
            ),
            FeeRates::ZERO
        );
    }

    #[test]
    fn test_tiered_broker_uses_tier_table() {
        let buy = trade(InstrumentType::Equity, TradeSide::Buy);
        assert_eq!(
            resolve_fee_rates(&Broker::Bmb, buy, Some(FeeTier::Plus)).commission,
            dec!(0.0035)
        );
        assert_eq!(
            resolve_fee_rates(&Broker::Bmb, buy, Some(FeeTier::Premium)),
            FeeRates::new(dec!(0.002), dec!(0.0008))
        );
        assert_eq!(
            resolve_fee_rates(
                &Broker::Bmb,
                trade(InstrumentType::Bond, TradeSide::Buy),
                Some(FeeTier::Standard)
            ),
            FeeRates::new(dec!(0.004), dec!(0.0001))
        );
    }

    #[test]
    fn test_missing_tier_defaults_to_lowest() {
        let buy = trade(InstrumentType::Etf, TradeSide::Buy);
        assert_eq!(
            resolve_fee_rates(&Broker::Bmb, buy, None),
            resolve_fee_rates(&Broker::Bmb, buy, Some(FeeTier::Standard))
        );
        assert_eq!(FeeTier::from_label("gold"), FeeTier::Standard);
    }

    #[test]
    fn test_tiered_broker_falls_back_to_defaults_for_other_kinds() {
        let payout = TransactionKind::Yield {
            instrument: InstrumentType::Equity,
        };
        assert_eq!(
            resolve_fee_rates(&Broker::Bmb, payout, Some(FeeTier::Premium)),
            YIELD_DEFAULT
        );
    }

    #[test]
    fn test_crypto_exchange_rates() {
        let buy = trade(InstrumentType::Crypto, TradeSide::Buy);
        assert_eq!(
            resolve_fee_rates(&Broker::Binance, buy, None),
            FeeRates::new(dec!(0.001), Decimal::ZERO)
        );
        assert_eq!(resolve_fee_rates(&Broker::Iol, buy, None), FeeRates::ZERO);
    }
}

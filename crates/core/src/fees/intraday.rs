use crate::constants::INTRADAY_QUANTITY_EPSILON;
use crate::journal::{InstrumentType, JournalEntry, NewJournalEntry, TransactionKind};

fn qualifies_for_bonus(instrument: InstrumentType) -> bool {
    matches!(
        instrument,
        InstrumentType::Equity | InstrumentType::DepositaryReceipt | InstrumentType::Bond
    )
}

/// Whether a draft trade closes a same-day round trip with an entry already in the journal.
///
/// Only brokers offering the intraday bonus qualify. The reciprocal entry must
/// share date, broker, symbol, currency and settlement term, be on the
/// opposite side, and match the quantity within a rounding tolerance.
pub fn detect_intraday_round_trip(
    journal: &[JournalEntry],
    draft: &NewJournalEntry,
    kind: TransactionKind,
) -> bool {
    let TransactionKind::Trade { instrument, side } = kind else {
        return false;
    };
    let broker = draft.resolved_broker();
    if !broker.supports_intraday_bonus() || !qualifies_for_bonus(instrument) {
        return false;
    }

    let symbol = draft.resolved_symbol().unwrap_or_default();
    let currency = draft.resolved_currency();
    let settlement_term = draft.resolved_settlement();

    journal.iter().any(|entry| {
        let opposite = matches!(
            entry.kind(),
            Ok(TransactionKind::Trade { instrument: other, side: other_side })
                if other == instrument && other_side != side
        );
        opposite
            && entry.date == draft.date
            && entry.broker == broker
            && entry.symbol_str() == symbol
            && entry.currency == currency
            && entry.settlement_term == settlement_term
            && (entry.quantity - draft.quantity).abs() <= INTRADAY_QUANTITY_EPSILON
    })
}

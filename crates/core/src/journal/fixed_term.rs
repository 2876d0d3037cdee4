use super::journal_model::{InstrumentType, JournalEntry};
use crate::constants::FIXED_TERM_SYMBOL_PREFIX;

/// Symbol for the `number`-th fixed-term deposit certificate.
pub fn fixed_term_symbol(number: u32) -> String {
    format!("{} {}", FIXED_TERM_SYMBOL_PREFIX, number)
}

/// Next free certificate number: one above the highest one already in the journal.
pub fn next_fixed_term_number(entries: &[JournalEntry]) -> u32 {
    entries
        .iter()
        .filter(|entry| entry.instrument_type == InstrumentType::FixedTermDeposit)
        .filter_map(|entry| parse_fixed_term_number(entry.symbol_str()))
        .max()
        .map_or(1, |highest| highest + 1)
}

fn parse_fixed_term_number(symbol: &str) -> Option<u32> {
    symbol
        .trim()
        .strip_prefix(FIXED_TERM_SYMBOL_PREFIX)?
        .trim()
        .parse()
        .ok()
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Broker assigned to entries recorded without one
pub const DEFAULT_BROKER: &str = "GENERAL";

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: Decimal = dec!(0.00000001);

/// Tolerance when comparing a sell quantity against the held quantity
pub const HOLDINGS_EPSILON: Decimal = dec!(0.000001);

/// Tolerance when checking that a broker's cash balance stays non-negative
pub const CASH_EPSILON: Decimal = dec!(0.0001);

/// Tolerance when matching quantities of intraday round trips
pub const INTRADAY_QUANTITY_EPSILON: Decimal = dec!(0.000001);

/// Fixed tax applied to both commission and duty
pub const VAT_RATE: Decimal = dec!(0.21);

/// Rate used when no FX rate can be resolved ("no conversion")
pub const DEFAULT_FX_RATE: Decimal = Decimal::ONE;

/// Bond prices are quoted per 100 nominal
pub const BOND_PRICE_SCALE: Decimal = dec!(0.01);

/// Estimated cost of closing an equity-like position, taxes included
pub const EQUITY_EXIT_COST_RATE: Decimal = dec!(0.008228);

/// Estimated cost of closing a bond position, taxes included
pub const BOND_EXIT_COST_RATE: Decimal = dec!(0.006171);

/// Symbol prefix of fixed-term deposit certificates
pub const FIXED_TERM_SYMBOL_PREFIX: &str = "Plazo Fijo";

/// Returns true when `quantity` is large enough to be treated as a holding.
pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    quantity.abs() >= QUANTITY_THRESHOLD
}

use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Volume-based discount level of a tiered broker.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeTier {
    #[default]
    Standard,
    Plus,
    Premium,
}

impl FeeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeTier::Standard => "STANDARD",
            FeeTier::Plus => "PLUS",
            FeeTier::Premium => "PREMIUM",
        }
    }

    /// Parses a stored tier label. Unknown labels fall back to the lowest tier.
    pub fn from_label(label: &str) -> FeeTier {
        match label.trim().to_uppercase().as_str() {
            "STANDARD" => FeeTier::Standard,
            "PLUS" => FeeTier::Plus,
            "PREMIUM" => FeeTier::Premium,
            other => {
                warn!("Unknown fee tier '{}', using {}", other, FeeTier::Standard);
                FeeTier::Standard
            }
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Commission and duty as proportions of the gross amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeRates {
    pub commission: Decimal,
    pub duty: Decimal,
}

impl FeeRates {
    pub const ZERO: FeeRates = FeeRates {
        commission: Decimal::ZERO,
        duty: Decimal::ZERO,
    };

    pub const fn new(commission: Decimal, duty: Decimal) -> Self {
        FeeRates { commission, duty }
    }
}

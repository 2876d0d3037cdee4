//! Journal domain models.

use crate::constants::DEFAULT_BROKER;
use crate::errors::{Result, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of the instrument a journal entry moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentType {
    #[serde(alias = "Depósito ARS")]
    CashDepositLocal,
    #[serde(alias = "Depósito USD")]
    CashDepositHard,
    #[serde(alias = "Plazo Fijo")]
    FixedTermDeposit,
    #[serde(alias = "Acciones AR")]
    Equity,
    #[serde(alias = "CEDEARs")]
    DepositaryReceipt,
    #[serde(alias = "Bonos AR")]
    Bond,
    #[serde(alias = "ETFs")]
    Etf,
    #[serde(alias = "Criptomonedas")]
    Crypto,
    #[serde(alias = "FCIs AR")]
    Fund,
    #[serde(alias = "Cauciones")]
    Repo,
}

impl InstrumentType {
    pub const ALL: [InstrumentType; 10] = [
        InstrumentType::CashDepositLocal,
        InstrumentType::CashDepositHard,
        InstrumentType::FixedTermDeposit,
        InstrumentType::Equity,
        InstrumentType::DepositaryReceipt,
        InstrumentType::Bond,
        InstrumentType::Etf,
        InstrumentType::Crypto,
        InstrumentType::Fund,
        InstrumentType::Repo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentType::CashDepositLocal => "CASH_DEPOSIT_LOCAL",
            InstrumentType::CashDepositHard => "CASH_DEPOSIT_HARD",
            InstrumentType::FixedTermDeposit => "FIXED_TERM_DEPOSIT",
            InstrumentType::Equity => "EQUITY",
            InstrumentType::DepositaryReceipt => "DEPOSITARY_RECEIPT",
            InstrumentType::Bond => "BOND",
            InstrumentType::Etf => "ETF",
            InstrumentType::Crypto => "CRYPTO",
            InstrumentType::Fund => "FUND",
            InstrumentType::Repo => "REPO",
        }
    }

    /// Pure cash movements (no symbol, no lots).
    pub fn is_cash_deposit(&self) -> bool {
        matches!(
            self,
            InstrumentType::CashDepositLocal | InstrumentType::CashDepositHard
        )
    }

    /// Equities, depositary receipts and ETFs share a fee and exit-cost profile.
    pub fn is_equity_like(&self) -> bool {
        matches!(
            self,
            InstrumentType::Equity | InstrumentType::DepositaryReceipt | InstrumentType::Etf
        )
    }

    /// Currency an entry of this type is booked in unless told otherwise.
    pub fn default_currency(&self) -> Currency {
        match self {
            InstrumentType::CashDepositHard | InstrumentType::Crypto => Currency::Hard,
            _ => Currency::Local,
        }
    }

    pub fn default_settlement(&self) -> SettlementTerm {
        match self {
            InstrumentType::Crypto => SettlementTerm::T0,
            _ => SettlementTerm::T1,
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "CASH_DEPOSIT_LOCAL" | "Depósito ARS" | "Deposito ARS" => {
                Ok(InstrumentType::CashDepositLocal)
            }
            "CASH_DEPOSIT_HARD" | "Depósito USD" | "Deposito USD" => {
                Ok(InstrumentType::CashDepositHard)
            }
            "FIXED_TERM_DEPOSIT" | "Plazo Fijo" => Ok(InstrumentType::FixedTermDeposit),
            "EQUITY" | "Acciones AR" => Ok(InstrumentType::Equity),
            "DEPOSITARY_RECEIPT" | "CEDEARs" => Ok(InstrumentType::DepositaryReceipt),
            "BOND" | "Bonos AR" => Ok(InstrumentType::Bond),
            "ETF" | "ETFs" => Ok(InstrumentType::Etf),
            "CRYPTO" | "Criptomonedas" => Ok(InstrumentType::Crypto),
            "FUND" | "FCIs AR" => Ok(InstrumentType::Fund),
            "REPO" | "Cauciones" => Ok(InstrumentType::Repo),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown instrument type: {}",
                other
            ))),
        }
    }
}

/// Raw operation label as captured on the journal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    #[serde(alias = "Compra")]
    Buy,
    #[serde(alias = "Venta")]
    Sell,
    #[serde(alias = "Entrada")]
    Deposit,
    #[serde(alias = "Salida")]
    Withdrawal,
    #[serde(alias = "Rendimiento", alias = "Dividendos")]
    Yield,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Buy => "BUY",
            OperationKind::Sell => "SELL",
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdrawal => "WITHDRAWAL",
            OperationKind::Yield => "YIELD",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "BUY" | "Compra" => Ok(OperationKind::Buy),
            "SELL" | "Venta" => Ok(OperationKind::Sell),
            "DEPOSIT" | "Entrada" => Ok(OperationKind::Deposit),
            "WITHDRAWAL" | "Salida" => Ok(OperationKind::Withdrawal),
            "YIELD" | "Rendimiento" | "Dividendos" => Ok(OperationKind::Yield),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown operation kind: {}",
                other
            ))),
        }
    }
}

/// Days between trade and settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SettlementTerm {
    #[serde(rename = "T+0")]
    T0,
    #[default]
    #[serde(rename = "T+1")]
    T1,
    #[serde(rename = "T+2")]
    T2,
}

/// The two currencies the ledger books in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Currency {
    #[serde(alias = "ARS")]
    Local,
    #[serde(alias = "USD")]
    Hard,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Local => write!(f, "LOCAL"),
            Currency::Hard => write!(f, "HARD"),
        }
    }
}

/// Broker holding the cash and securities of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Broker {
    Iol,
    Bmb,
    Cocos,
    Balanz,
    Binance,
    Kucoin,
    Bybit,
    Bingx,
    #[default]
    General,
    Other(String),
}

impl Broker {
    pub fn as_str(&self) -> &str {
        match self {
            Broker::Iol => "IOL",
            Broker::Bmb => "BMB",
            Broker::Cocos => "COCOS",
            Broker::Balanz => "BALANZ",
            Broker::Binance => "BINANCE",
            Broker::Kucoin => "KUCOIN",
            Broker::Bybit => "BYBIT",
            Broker::Bingx => "BINGX",
            Broker::General => DEFAULT_BROKER,
            Broker::Other(name) => name,
        }
    }

    /// Brokers whose commission depends on last month's traded volume.
    pub fn has_tiered_schedule(&self) -> bool {
        matches!(self, Broker::Bmb)
    }

    pub fn supports_intraday_bonus(&self) -> bool {
        self.has_tiered_schedule()
    }
}

impl From<String> for Broker {
    fn from(value: String) -> Self {
        Broker::from(value.as_str())
    }
}

impl From<&str> for Broker {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_uppercase();
        match normalized.as_str() {
            "IOL" => Broker::Iol,
            "BMB" => Broker::Bmb,
            "COCOS" => Broker::Cocos,
            "BALANZ" => Broker::Balanz,
            "BINANCE" => Broker::Binance,
            "KUCOIN" => Broker::Kucoin,
            "BYBIT" => Broker::Bybit,
            "BINGX" => Broker::Bingx,
            "" | DEFAULT_BROKER => Broker::General,
            _ => Broker::Other(normalized),
        }
    }
}

impl From<Broker> for String {
    fn from(value: Broker) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashFlow {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Valid (instrument type, operation kind) combinations.
///
/// Journal rows keep the raw pair for storage; everything that computes on an
/// entry goes through this type so invalid pairs (a yield on a cash deposit,
/// a withdrawal of an equity) are rejected in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Cash {
        instrument: InstrumentType,
        flow: CashFlow,
    },
    Trade {
        instrument: InstrumentType,
        side: TradeSide,
    },
    Yield {
        instrument: InstrumentType,
    },
}

impl TransactionKind {
    pub fn new(
        instrument_type: InstrumentType,
        operation_kind: OperationKind,
    ) -> std::result::Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidOperation {
            instrument_type,
            operation_kind,
        };

        if instrument_type.is_cash_deposit() {
            return match operation_kind {
                OperationKind::Deposit => Ok(TransactionKind::Cash {
                    instrument: instrument_type,
                    flow: CashFlow::In,
                }),
                OperationKind::Withdrawal => Ok(TransactionKind::Cash {
                    instrument: instrument_type,
                    flow: CashFlow::Out,
                }),
                _ => Err(invalid()),
            };
        }

        match operation_kind {
            OperationKind::Buy => Ok(TransactionKind::Trade {
                instrument: instrument_type,
                side: TradeSide::Buy,
            }),
            OperationKind::Sell => Ok(TransactionKind::Trade {
                instrument: instrument_type,
                side: TradeSide::Sell,
            }),
            // Fixed-term interest is booked as the yield amount of the redemption
            OperationKind::Yield if instrument_type != InstrumentType::FixedTermDeposit => {
                Ok(TransactionKind::Yield {
                    instrument: instrument_type,
                })
            }
            _ => Err(invalid()),
        }
    }

    pub fn instrument_type(&self) -> InstrumentType {
        match self {
            TransactionKind::Cash { instrument, .. }
            | TransactionKind::Trade { instrument, .. }
            | TransactionKind::Yield { instrument } => *instrument,
        }
    }

    /// Whether the operation takes cash out of the broker account.
    pub fn is_outflow(&self) -> bool {
        matches!(
            self,
            TransactionKind::Cash {
                flow: CashFlow::Out,
                ..
            } | TransactionKind::Trade {
                side: TradeSide::Buy,
                ..
            }
        )
    }
}

/// Monetary fields computed once before an entry is committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAmounts {
    /// quantity x price + yield
    pub gross: Decimal,
    pub commission: Decimal,
    pub duty: Decimal,
    pub commission_tax: Decimal,
    pub duty_tax: Decimal,
    pub total_discounts: Decimal,
    pub total_cost: Decimal,
    pub total_income: Decimal,
    pub balance: Decimal,
}

/// A committed journal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    /// Insertion order, used to break ties between entries of the same date.
    pub sequence: u64,
    pub date: NaiveDate,
    pub instrument_type: InstrumentType,
    pub operation_kind: OperationKind,
    pub symbol: Option<String>,
    pub detail: Option<String>,
    #[serde(default)]
    pub settlement_term: SettlementTerm,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub yield_amount: Decimal,
    #[serde(default)]
    pub broker: Broker,
    pub currency: Currency,
    /// Hard-to-local rate recorded when the entry was captured.
    pub fx_rate: Decimal,
    #[serde(flatten)]
    pub amounts: DerivedAmounts,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn kind(&self) -> std::result::Result<TransactionKind, ValidationError> {
        TransactionKind::new(self.instrument_type, self.operation_kind)
    }

    pub fn is_cash_deposit(&self) -> bool {
        self.instrument_type.is_cash_deposit()
    }

    /// Symbol, or an empty string for pure cash movements.
    pub fn symbol_str(&self) -> &str {
        self.symbol.as_deref().unwrap_or("")
    }

    /// quantity x price, in the entry's currency.
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Notional converted to local currency with the entry's own FX rate.
    pub fn notional_local(&self) -> Decimal {
        match self.currency {
            Currency::Local => self.notional(),
            Currency::Hard => self.notional() * self.fx_rate,
        }
    }

    /// Signed effect on the broker's cash balance.
    pub fn net_cash(&self) -> Decimal {
        self.amounts.total_income - self.amounts.total_cost
    }
}

/// Input model for recording a new journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJournalEntry {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub instrument_type: InstrumentType,
    pub operation_kind: OperationKind,
    pub symbol: Option<String>,
    pub detail: Option<String>,
    pub settlement_term: Option<SettlementTerm>,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub yield_amount: Decimal,
    pub broker: Option<Broker>,
    pub currency: Option<Currency>,
    pub fx_rate: Option<Decimal>,
}

impl NewJournalEntry {
    /// Validates the raw fields and returns the typed operation.
    pub fn validate(&self) -> Result<TransactionKind> {
        let kind = TransactionKind::new(self.instrument_type, self.operation_kind)?;

        for (field, value) in [
            ("quantity", self.quantity),
            ("price", self.price),
            ("yieldAmount", self.yield_amount),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(ValidationError::NegativeAmount {
                    field: field.to_string(),
                    value,
                }
                .into());
            }
        }

        if let Some(rate) = self.fx_rate {
            if rate <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "FX rate must be positive, got {}",
                    rate
                ))
                .into());
            }
        }

        if !self.instrument_type.is_cash_deposit()
            && self.symbol.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }

        Ok(kind)
    }

    pub fn resolved_broker(&self) -> Broker {
        self.broker.clone().unwrap_or_default()
    }

    pub fn resolved_currency(&self) -> Currency {
        self.currency
            .unwrap_or_else(|| self.instrument_type.default_currency())
    }

    pub fn resolved_settlement(&self) -> SettlementTerm {
        self.settlement_term
            .unwrap_or_else(|| self.instrument_type.default_settlement())
    }

    pub fn resolved_symbol(&self) -> Option<String> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Builds the committed row from the draft and its derived amounts.
    pub fn into_entry(
        self,
        id: String,
        sequence: u64,
        amounts: DerivedAmounts,
        created_at: DateTime<Utc>,
    ) -> JournalEntry {
        let broker = self.resolved_broker();
        let currency = self.resolved_currency();
        let settlement_term = self.resolved_settlement();
        let symbol = self.resolved_symbol();
        JournalEntry {
            id,
            sequence,
            date: self.date,
            instrument_type: self.instrument_type,
            operation_kind: self.operation_kind,
            symbol,
            detail: self.detail,
            settlement_term,
            quantity: self.quantity,
            price: self.price,
            yield_amount: self.yield_amount,
            broker,
            currency,
            fx_rate: self.fx_rate.unwrap_or(Decimal::ONE),
            amounts,
            created_at,
        }
    }
}

/// Returns the entries in replay order: ascending date, ties by insertion sequence.
pub fn sort_for_replay(entries: &[JournalEntry]) -> Vec<&JournalEntry> {
    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| (entry.date, entry.sequence));
    ordered
}

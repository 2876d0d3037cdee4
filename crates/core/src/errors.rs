//! Core error types for the ledger.
//!
//! Storage backends convert their own failures into [`DatabaseError`] or
//! [`Error::Repository`]; the engine itself only raises validation and
//! calculation errors.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::fx::FxError;
use crate::journal::{Broker, Currency, InstrumentType, OperationKind};

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Errors raised by the replay and lot-matching code.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid journal entry: {0}")]
    InvalidEntry(String),

    /// A sell tried to consume more than the open lots hold. The sell should
    /// have been rejected before it was committed.
    #[error("Insufficient lots for {symbol}: requested {requested}, available {available}")]
    InsufficientLots {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },
}

/// Validation errors for user input. These block a journal commit.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Insufficient quantity of {symbol} in {broker}: requested {requested}, available {available}")]
    InsufficientHoldings {
        broker: Broker,
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Insufficient funds in {broker} ({currency}): available {available}, required {required}")]
    InsufficientCash {
        broker: Broker,
        currency: Currency,
        available: Decimal,
        required: Decimal,
    },

    #[error("Field '{field}' must not be negative, got {value}")]
    NegativeAmount { field: String, value: Decimal },

    #[error("Operation {operation_kind} is not valid for instrument type {instrument_type}")]
    InvalidOperation {
        instrument_type: InstrumentType,
        operation_kind: OperationKind,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

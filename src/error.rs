//! Library error types

use thiserror::Error;

/// Currency formatting failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurrencyError {
    #[error("unknown ISO 4217 currency code: {0:?}")]
    UnknownCurrency(String),

    #[error("cannot format non-finite amount {0}")]
    NonFiniteAmount(f64),

    #[error("amount {0} is outside the formattable range")]
    AmountOutOfRange(f64),

    #[error("unsupported locale: {0:?}")]
    UnsupportedLocale(String),
}

/// Strict conversion of a partial input failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeeInputError {
    #[error("invalid fee input: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

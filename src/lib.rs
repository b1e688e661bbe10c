//! WexCars Library
//!
//! Service-fee engine for the WexCars luxury-car marketplace: fee models,
//! advisory validation, currency formatting and the batch fee ledger.

pub mod config;
pub mod currency;
pub mod error;
pub mod fees;
pub mod logging;
pub mod persistence;
pub mod types;

pub use currency::{format_currency, format_currency_in, format_currency_or_raw, Locale};
pub use error::{CurrencyError, FeeInputError};
pub use fees::{
    calculate_service_fee, calculate_service_fee_for_tag, fee_model_catalog, validate_fee_input,
    FeeModelInfo,
};
pub use types::{FeeCalculationInput, FeeCalculationResult, FeeModel, PartialFeeInput};

//! Service-fee engine
//!
//! Pure calculation, advisory validation and the static catalog of fee models.
//! Calculation never calls validation; callers decide when to validate.

pub mod calculator;
pub mod catalog;
pub mod validation;

pub use calculator::{calculate_service_fee, calculate_service_fee_for_tag};
pub use catalog::{fee_model_catalog, FeeModelInfo};
pub use validation::validate_fee_input;

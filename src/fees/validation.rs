//! Advisory validation of fee inputs
//!
//! Returns human-readable problems for a form or import to act on. Nothing here
//! blocks [`calculate_service_fee`](super::calculate_service_fee).

use crate::error::FeeInputError;
use crate::types::{FeeCalculationInput, FeeModel, PartialFeeInput};

pub const CAR_PRICE_ERROR: &str = "Car price must be greater than 0";
pub const VAT_RATE_ERROR: &str = "VAT rate must be between 0 and 100";
pub const CURRENCY_ERROR: &str = "Currency must be a valid 3-letter code";
pub const FEE_MODEL_ERROR: &str = "Please select a valid fee model";

/// Check a partial input and list every problem found, in field order.
///
/// The currency check is length-only; real ISO 4217 lookup happens in
/// [`format_currency`](crate::currency::format_currency).
pub fn validate_fee_input(input: &PartialFeeInput) -> Vec<String> {
    let mut errors = Vec::new();

    // NaN fails both comparisons, so test for the valid range
    if !input.car_price.is_some_and(|price| price > 0.0) {
        errors.push(CAR_PRICE_ERROR.to_string());
    }

    if !input.vat_rate.is_some_and(|rate| (0.0..=100.0).contains(&rate)) {
        errors.push(VAT_RATE_ERROR.to_string());
    }

    if !input
        .currency
        .as_deref()
        .is_some_and(|code| code.chars().count() == 3)
    {
        errors.push(CURRENCY_ERROR.to_string());
    }

    if !input
        .fee_model
        .as_deref()
        .is_some_and(|tag| FeeModel::from_tag(tag).is_some())
    {
        errors.push(FEE_MODEL_ERROR.to_string());
    }

    errors
}

impl PartialFeeInput {
    /// Validate and convert into a calculation input, keeping all messages.
    pub fn into_input(self) -> Result<FeeCalculationInput, FeeInputError> {
        let errors = validate_fee_input(&self);
        if !errors.is_empty() {
            return Err(FeeInputError::Invalid(errors));
        }

        let fee_model = self.fee_model.as_deref().and_then(FeeModel::from_tag);
        match (self.car_price, self.vat_rate, self.currency, fee_model) {
            (Some(car_price), Some(vat_rate), Some(currency), Some(fee_model)) => Ok(
                FeeCalculationInput::new(car_price, vat_rate, currency, fee_model),
            ),
            // unreachable once validation passed
            _ => Err(FeeInputError::Invalid(Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PartialFeeInput {
        PartialFeeInput {
            car_price: Some(100_000.0),
            vat_rate: Some(25.0),
            currency: Some("EUR".to_string()),
            fee_model: Some("tiered".to_string()),
        }
    }

    #[test]
    fn empty_input_reports_every_field() {
        let errors = validate_fee_input(&PartialFeeInput::default());
        assert_eq!(
            errors,
            vec![CAR_PRICE_ERROR, VAT_RATE_ERROR, CURRENCY_ERROR, FEE_MODEL_ERROR]
        );
    }

    #[test]
    fn valid_input_has_no_errors() {
        assert!(validate_fee_input(&valid()).is_empty());
    }

    #[test]
    fn vat_bounds_are_inclusive() {
        for vat in [0.0, 100.0] {
            let input = PartialFeeInput { vat_rate: Some(vat), ..valid() };
            assert!(validate_fee_input(&input).is_empty(), "vat {vat}");
        }
        for vat in [-0.01, 100.01, f64::NAN] {
            let input = PartialFeeInput { vat_rate: Some(vat), ..valid() };
            assert_eq!(validate_fee_input(&input), vec![VAT_RATE_ERROR]);
        }
    }

    #[test]
    fn zero_price_and_bad_codes_are_reported() {
        let input = PartialFeeInput {
            car_price: Some(0.0),
            currency: Some("EURO".to_string()),
            fee_model: Some("premium".to_string()),
            ..valid()
        };
        assert_eq!(
            validate_fee_input(&input),
            vec![CAR_PRICE_ERROR, CURRENCY_ERROR, FEE_MODEL_ERROR]
        );
    }

    #[test]
    fn currency_length_counts_characters() {
        let input = PartialFeeInput { currency: Some("€€€".to_string()), ..valid() };
        assert!(validate_fee_input(&input).is_empty());
    }

    #[test]
    fn into_input_carries_messages() {
        let input = valid().into_input().unwrap();
        assert_eq!(input.fee_model, FeeModel::Tiered);

        let err = PartialFeeInput::default().into_input().unwrap_err();
        assert_eq!(err, FeeInputError::Invalid(validate_fee_input(&PartialFeeInput::default())));
    }
}

//! WexCars Service Fee Calculator
//!
//! Computes the seller's service fee for a listing and the VAT charged on it.
//! Rates depend only on the car price and the VAT rate; the currency is carried
//! through untouched (no conversion happens here).
//!
//! | model                 | net fee                                         |
//! |-----------------------|-------------------------------------------------|
//! | `vat_on_top`          | 1% of price                                     |
//! | `higher_vat_included` | 1.25% if VAT <= 25, else 1.5%                   |
//! | `flat_minimum`        | max(1% of price, 30,000)                        |
//! | `tiered`              | 1.5% below 1M, 1.25% up to 3M inclusive, 1.0%   |

use tracing::trace;

use crate::types::{FeeCalculationInput, FeeCalculationResult, FeeModel};

/// Base rate for `vat_on_top` and `flat_minimum`
pub const BASE_RATE: f64 = 0.01;

/// `higher_vat_included` rate at or below the VAT threshold
pub const STANDARD_VAT_RATE: f64 = 0.0125;
/// `higher_vat_included` rate above the VAT threshold
pub const HIGH_VAT_RATE: f64 = 0.015;
/// VAT threshold in percentage points, inclusive on the lower side
pub const VAT_THRESHOLD: f64 = 25.0;

/// Minimum fee for `flat_minimum`, in the calculation's base currency unit
pub const FLAT_MINIMUM_FEE: f64 = 30_000.0;

pub const TIER_LOW_CEILING: f64 = 1_000_000.0;
pub const TIER_MID_CEILING: f64 = 3_000_000.0;
pub const TIER_LOW_RATE: f64 = 0.015;
pub const TIER_MID_RATE: f64 = 0.0125;
pub const TIER_HIGH_RATE: f64 = 0.01;

/// Description used when a tag does not name a known model
pub const UNKNOWN_MODEL_DESCRIPTION: &str = "Unknown model";

/// Calculate the service fee breakdown for a fully specified input.
///
/// Total over all numeric inputs: negative prices or VAT rates above 100 are
/// not rejected and flow straight into the result. Run
/// [`validate_fee_input`](super::validate_fee_input) first when that matters.
pub fn calculate_service_fee(input: &FeeCalculationInput) -> FeeCalculationResult {
    let (net_fee, description) = net_fee_for(input.fee_model, input.car_price, input.vat_rate);
    trace!(
        model = %input.fee_model,
        car_price = input.car_price,
        vat_rate = input.vat_rate,
        net_fee,
        "service fee calculated"
    );
    build_result(
        input.car_price,
        input.vat_rate,
        &input.currency,
        input.fee_model.as_tag(),
        net_fee,
        description,
    )
}

/// Calculate from a raw model tag, as read from a form field or a CSV column.
///
/// Unrecognized tags produce an all-zero breakdown described as
/// `"Unknown model"` instead of an error.
pub fn calculate_service_fee_for_tag(
    car_price: f64,
    vat_rate: f64,
    currency: &str,
    fee_model: &str,
) -> FeeCalculationResult {
    match FeeModel::from_tag(fee_model) {
        Some(model) => {
            calculate_service_fee(&FeeCalculationInput::new(car_price, vat_rate, currency, model))
        }
        None => {
            trace!(tag = fee_model, "unknown fee model tag, charging no fee");
            build_result(
                car_price,
                vat_rate,
                currency,
                fee_model,
                0.0,
                UNKNOWN_MODEL_DESCRIPTION.to_string(),
            )
        }
    }
}

/// Net fee and a human-readable note on which branch applied
fn net_fee_for(model: FeeModel, car_price: f64, vat_rate: f64) -> (f64, String) {
    match model {
        FeeModel::VatOnTop => (
            car_price * BASE_RATE,
            "1% service fee + VAT on fee".to_string(),
        ),
        FeeModel::HigherVatIncluded => {
            if vat_rate <= VAT_THRESHOLD {
                (
                    car_price * STANDARD_VAT_RATE,
                    "1.25% service fee (VAT up to 25%)".to_string(),
                )
            } else {
                (
                    car_price * HIGH_VAT_RATE,
                    "1.5% service fee (VAT above 25%)".to_string(),
                )
            }
        }
        FeeModel::FlatMinimum => {
            let percentage_fee = car_price * BASE_RATE;
            if percentage_fee >= FLAT_MINIMUM_FEE {
                (
                    percentage_fee,
                    "1% service fee (above 30,000 minimum)".to_string(),
                )
            } else {
                (
                    FLAT_MINIMUM_FEE,
                    "30,000 minimum fee (1% would be lower)".to_string(),
                )
            }
        }
        FeeModel::Tiered => {
            if car_price < TIER_LOW_CEILING {
                (
                    car_price * TIER_LOW_RATE,
                    "1.5% tier (price under 1,000,000)".to_string(),
                )
            } else if car_price <= TIER_MID_CEILING {
                (
                    car_price * TIER_MID_RATE,
                    "1.25% tier (price 1,000,000 to 3,000,000)".to_string(),
                )
            } else {
                (
                    car_price * TIER_HIGH_RATE,
                    "1.0% tier (price over 3,000,000)".to_string(),
                )
            }
        }
    }
}

fn build_result(
    car_price: f64,
    vat_rate: f64,
    currency: &str,
    fee_model: &str,
    net_fee: f64,
    fee_model_description: String,
) -> FeeCalculationResult {
    let vat_on_fee = net_fee * vat_rate / 100.0;
    FeeCalculationResult {
        car_price,
        vat_rate,
        currency: currency.to_string(),
        fee_model: fee_model.to_string(),
        net_fee,
        vat_on_fee,
        total_customer_pays: net_fee + vat_on_fee,
        business_keeps: net_fee,
        fee_model_description,
    }
}

//! Core types used throughout WexCars
//!
//! Defines the fee models and the input/result records of a fee calculation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported service-fee models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeModel {
    /// 1% of the car price, VAT added on top of the fee
    VatOnTop,
    /// 1.25% up to 25% VAT, 1.5% above
    HigherVatIncluded,
    /// 1% of the car price, never below the flat minimum
    FlatMinimum,
    /// Rate picked by price bracket
    Tiered,
}

impl Default for FeeModel {
    fn default() -> Self {
        FeeModel::VatOnTop
    }
}

impl FeeModel {
    /// All models in catalog order
    pub const ALL: [FeeModel; 4] = [
        FeeModel::VatOnTop,
        FeeModel::HigherVatIncluded,
        FeeModel::FlatMinimum,
        FeeModel::Tiered,
    ];

    /// Wire tag (e.g., "vat_on_top")
    pub fn as_tag(&self) -> &'static str {
        match self {
            FeeModel::VatOnTop => "vat_on_top",
            FeeModel::HigherVatIncluded => "higher_vat_included",
            FeeModel::FlatMinimum => "flat_minimum",
            FeeModel::Tiered => "tiered",
        }
    }

    /// Parse from an exact wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "vat_on_top" => Some(FeeModel::VatOnTop),
            "higher_vat_included" => Some(FeeModel::HigherVatIncluded),
            "flat_minimum" => Some(FeeModel::FlatMinimum),
            "tiered" => Some(FeeModel::Tiered),
            _ => None,
        }
    }
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A fully specified fee calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCalculationInput {
    /// Car price in the currency's base unit
    pub car_price: f64,
    /// VAT rate in percentage points (25.0 = 25%)
    pub vat_rate: f64,
    /// Three-letter currency code, passed through for display
    pub currency: String,
    pub fee_model: FeeModel,
}

impl FeeCalculationInput {
    pub fn new(
        car_price: f64,
        vat_rate: f64,
        currency: impl Into<String>,
        fee_model: FeeModel,
    ) -> Self {
        Self {
            car_price,
            vat_rate,
            currency: currency.into(),
            fee_model,
        }
    }
}

/// Fee breakdown for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeCalculationResult {
    pub car_price: f64,
    pub vat_rate: f64,
    pub currency: String,
    /// Echo of the requested model tag, verbatim even when unrecognized
    pub fee_model: String,
    /// Fee owed to the platform before VAT
    pub net_fee: f64,
    /// VAT charged on the net fee (not on the car price)
    pub vat_on_fee: f64,
    pub total_customer_pays: f64,
    /// Portion retained by the platform, VAT is passed through
    pub business_keeps: f64,
    pub fee_model_description: String,
}

/// Partially specified input, as it arrives from a form or a CSV row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialFeeInput {
    #[serde(default)]
    pub car_price: Option<f64>,
    #[serde(default)]
    pub vat_rate: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Raw model tag, so unknown tags can be reported
    #[serde(default)]
    pub fee_model: Option<String>,
}

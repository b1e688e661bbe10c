//! Configuration management for WexCars
//!
//! Loads from config files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::currency::Locale;
use crate::fees::validate_fee_input;
use crate::types::{FeeModel, PartialFeeInput};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub fees: FeesConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeesConfig {
    /// Model used when a quote does not name one (tag, e.g. "tiered")
    pub default_model: String,
    /// VAT rate in percentage points
    pub default_vat_rate: f64,
    /// Three-letter currency code
    pub default_currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Number formatting locale ("en-US" or "de-DE")
    pub locale: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Data directory
    pub data_dir: String,
    /// Fee ledger CSV file name inside `data_dir`
    pub ledger_file: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        Self::builder()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (WEXCARS__*)
            .add_source(Environment::with_prefix("WEXCARS").separator("__"))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Built-in defaults only, no files or environment
    pub fn defaults() -> Result<Self> {
        Self::builder()?
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            // Fee defaults
            .set_default("fees.default_model", FeeModel::VatOnTop.as_tag())?
            .set_default("fees.default_vat_rate", 25.0)?
            .set_default("fees.default_currency", "EUR")?
            // Display defaults
            .set_default("display.locale", Locale::EnUs.tag())?
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Persistence defaults
            .set_default("persistence.data_dir", "./data")?
            .set_default("persistence.ledger_file", "fee_ledger.csv")?)
    }

    /// Check that the configured defaults form a valid quote
    pub fn validate(&self) -> Result<()> {
        let errors = validate_fee_input(&PartialFeeInput {
            car_price: Some(1.0),
            vat_rate: Some(self.fees.default_vat_rate),
            currency: Some(self.fees.default_currency.clone()),
            fee_model: Some(self.fees.default_model.clone()),
        });
        if !errors.is_empty() {
            bail!("Invalid fee defaults: {}", errors.join("; "));
        }

        self.locale()?;
        Ok(())
    }

    /// Default fee model, parsed from its tag
    pub fn default_model(&self) -> Result<FeeModel> {
        FeeModel::from_tag(&self.fees.default_model)
            .with_context(|| format!("Unknown default fee model {:?}", self.fees.default_model))
    }

    pub fn locale(&self) -> Result<Locale> {
        self.display
            .locale
            .parse()
            .with_context(|| format!("Invalid display.locale {:?}", self.display.locale))
    }

    /// Full path of the fee ledger CSV
    pub fn ledger_path(&self) -> PathBuf {
        PathBuf::from(&self.persistence.data_dir).join(&self.persistence.ledger_file)
    }

    /// Generate a one-line digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "model={} vat={:.2} currency={} locale={} data_dir={}",
            self.fees.default_model,
            self.fees.default_vat_rate,
            self.fees.default_currency,
            self.display.locale,
            self.persistence.data_dir
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::defaults().unwrap();
        config.validate().unwrap();
        assert_eq!(config.default_model().unwrap(), FeeModel::VatOnTop);
        assert_eq!(config.fees.default_currency, "EUR");
        assert_eq!(config.locale().unwrap(), Locale::EnUs);
        assert!(config.ledger_path().ends_with("fee_ledger.csv"));
    }

    #[test]
    fn validate_rejects_bad_defaults() {
        let mut config = AppConfig::defaults().unwrap();
        config.fees.default_model = "premium".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::defaults().unwrap();
        config.display.locale = "fr-FR".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn digest_mentions_defaults() {
        let config = AppConfig::defaults().unwrap();
        let digest = config.to_string();
        assert!(digest.contains("model=vat_on_top"));
        assert!(digest.contains("currency=EUR"));
    }
}

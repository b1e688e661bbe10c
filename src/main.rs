//! WexCars fee CLI
//!
//! Usage:
//! ```bash
//! wexcars-fees quote --price 250000 --vat 25 --currency EUR --model higher_vat_included
//! wexcars-fees validate --price 0 --currency EURO
//! wexcars-fees models
//! wexcars-fees reconcile listings.csv --output data/fee_ledger.csv
//! ```

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use wexcars::config::AppConfig;
use wexcars::currency::format_currency_or_raw;
use wexcars::fees::{calculate_service_fee_for_tag, fee_model_catalog, validate_fee_input};
use wexcars::persistence::{reconcile_listings, FeeLedger};
use wexcars::types::PartialFeeInput;

/// WexCars service-fee calculator
#[derive(Parser)]
#[command(name = "wexcars-fees")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the service fee for one car
    Quote {
        /// Car price
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
        /// VAT rate in percent (defaults to fees.default_vat_rate)
        #[arg(long, allow_negative_numbers = true)]
        vat: Option<f64>,
        /// Currency code (defaults to fees.default_currency)
        #[arg(long)]
        currency: Option<String>,
        /// Fee model tag (defaults to fees.default_model)
        #[arg(long)]
        model: Option<String>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check an input without calculating
    Validate {
        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        vat: Option<f64>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },

    /// List the available fee models
    Models,

    /// Price every listing of a CSV file into the fee ledger
    Reconcile {
        /// Listings CSV (listing_id,car_price,vat_rate,currency,fee_model)
        input: PathBuf,
        /// Ledger CSV (defaults to persistence.data_dir/persistence.ledger_file)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    wexcars::logging::init(&config.logging)?;
    config.validate()?;
    info!(config = %config, "Configuration loaded");

    let locale = config.locale()?;

    match cli.command {
        Commands::Quote {
            price,
            vat,
            currency,
            model,
            json,
        } => {
            let vat = vat.unwrap_or(config.fees.default_vat_rate);
            let currency = currency.unwrap_or_else(|| config.fees.default_currency.clone());
            let model = model.unwrap_or_else(|| config.fees.default_model.clone());

            let result = calculate_service_fee_for_tag(price, vat, &currency, &model);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let money = |amount: f64| format_currency_or_raw(amount, &result.currency, locale);
            println!("Model:               {} ({})", result.fee_model, result.fee_model_description);
            println!("Car price:           {}", money(result.car_price));
            println!("VAT rate:            {}%", result.vat_rate);
            println!("Net fee:             {}", money(result.net_fee));
            println!("VAT on fee:          {}", money(result.vat_on_fee));
            println!("Total customer pays: {}", money(result.total_customer_pays));
            println!("Business keeps:      {}", money(result.business_keeps));
        }

        Commands::Validate {
            price,
            vat,
            currency,
            model,
        } => {
            let errors = validate_fee_input(&PartialFeeInput {
                car_price: price,
                vat_rate: vat,
                currency,
                fee_model: model,
            });
            if !errors.is_empty() {
                for error in &errors {
                    println!("- {error}");
                }
                bail!("{} validation error(s)", errors.len());
            }
            println!("Input is valid");
        }

        Commands::Models => {
            for info in fee_model_catalog() {
                println!(
                    "{} {:<20} {:<20} {}",
                    info.icon,
                    info.model.as_tag(),
                    info.name,
                    info.description
                );
            }
        }

        Commands::Reconcile { input, output } => {
            let output = output.unwrap_or_else(|| config.ledger_path());
            let mut ledger = FeeLedger::open_path(&output)?;

            let summary = reconcile_listings(&input, &mut ledger)?;
            println!(
                "Processed {} listing(s): {} accepted, {} rejected",
                summary.processed,
                summary.accepted,
                summary.rejected.len()
            );
            for rejected in &summary.rejected {
                println!("  rejected {}: {}", rejected.listing_id, rejected.errors.join("; "));
            }
            for (currency, totals) in &summary.totals {
                println!(
                    "  {currency}: {} listing(s), net fees {}, VAT {}, customers pay {}",
                    totals.listings,
                    format_currency_or_raw(totals.net_fee, currency, locale),
                    format_currency_or_raw(totals.vat_on_fee, currency, locale),
                    format_currency_or_raw(totals.total_customer_pays, currency, locale),
                );
            }
            println!("Ledger: {}", ledger.path().display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn quote_accepts_negative_numbers() {
        let cli = Cli::try_parse_from(["wexcars-fees", "quote", "--price", "-5", "--vat", "-1"])
            .unwrap();
        match cli.command {
            Commands::Quote { price, vat, .. } => {
                assert_eq!(price, -5.0);
                assert_eq!(vat, Some(-1.0));
            }
            _ => panic!("expected quote"),
        }
    }

    #[test]
    fn validate_accepts_negative_price() {
        let cli = Cli::try_parse_from(["wexcars-fees", "validate", "--price", "-100"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate { price: Some(p), .. } if p == -100.0
        ));
    }
}

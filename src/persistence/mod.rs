//! CSV Persistence Module
//!
//! Batch reconciliation of listing prices into a service-fee ledger, the
//! offline counterpart of the dashboard storing `service_fee_amount` and
//! `fee_model` once a quote is accepted.

use anyhow::{Context, Result};
use chrono::Utc;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::fees::{calculate_service_fee, validate_fee_input};
use crate::types::{FeeCalculationResult, PartialFeeInput};

/// Listing row to reconcile. Numbers are kept raw so a malformed cell becomes
/// a validation message instead of aborting the whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingRecord {
    pub listing_id: String,
    #[serde(default)]
    pub car_price: Option<String>,
    #[serde(default)]
    pub vat_rate: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub fee_model: Option<String>,
}

impl ListingRecord {
    pub fn to_partial(&self) -> PartialFeeInput {
        PartialFeeInput {
            car_price: parse_number(self.car_price.as_deref()),
            vat_rate: parse_number(self.vat_rate.as_deref()),
            currency: non_empty(self.currency.as_deref()),
            fee_model: non_empty(self.fee_model.as_deref()),
        }
    }
}

fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Fee ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLedgerRecord {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub listing_id: String,
    pub car_price: f64,
    pub vat_rate: f64,
    pub currency: String,
    pub fee_model: String,
    /// Net fee, as stored on the listing
    pub service_fee_amount: f64,
    pub vat_on_fee: f64,
    pub total_customer_pays: f64,
    pub business_keeps: f64,
    pub fee_model_description: String,
}

impl FeeLedgerRecord {
    pub fn from_result(listing_id: &str, result: &FeeCalculationResult, timestamp: i64) -> Self {
        Self {
            timestamp,
            listing_id: listing_id.to_string(),
            car_price: result.car_price,
            vat_rate: result.vat_rate,
            currency: result.currency.clone(),
            fee_model: result.fee_model.clone(),
            service_fee_amount: result.net_fee,
            vat_on_fee: result.vat_on_fee,
            total_customer_pays: result.total_customer_pays,
            business_keeps: result.business_keeps,
            fee_model_description: result.fee_model_description.clone(),
        }
    }
}

/// Listing skipped during reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedListing {
    pub listing_id: String,
    pub errors: Vec<String>,
}

/// Fee sums for one currency
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrencyTotals {
    pub listings: usize,
    pub net_fee: f64,
    pub vat_on_fee: f64,
    pub total_customer_pays: f64,
}

impl CurrencyTotals {
    fn add(&mut self, result: &FeeCalculationResult) {
        self.listings += 1;
        self.net_fee += result.net_fee;
        self.vat_on_fee += result.vat_on_fee;
        self.total_customer_pays += result.total_customer_pays;
    }
}

/// Outcome of one reconciliation run
#[derive(Debug, Clone, Default)]
pub struct ReconciliationSummary {
    pub processed: usize,
    pub accepted: usize,
    pub rejected: Vec<RejectedListing>,
    /// Keyed by upper-cased currency code
    pub totals: BTreeMap<String, CurrencyTotals>,
}

/// Append-only CSV ledger of accepted fee calculations
pub struct FeeLedger {
    path: PathBuf,
    writer: csv::Writer<fs::File>,
}

impl FeeLedger {
    /// Open (or create) `file_name` inside `data_dir`. Headers are written only
    /// when the file is new or empty.
    pub fn open(data_dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let path = data_dir.join(file_name);
        let file_has_data =
            path.exists() && fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open ledger {}", path.display()))?;

        let writer = WriterBuilder::new()
            .has_headers(!file_has_data)
            .from_writer(file);

        Ok(Self { path, writer })
    }

    /// Open a ledger at a full file path. A bare file name lands in the
    /// current directory.
    pub fn open_path(path: &Path) -> Result<Self> {
        let (dir, file_name) = split_ledger_path(path)?;
        Self::open(dir, file_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record
    pub fn append(&mut self, record: &FeeLedgerRecord) -> Result<()> {
        self.writer
            .serialize(record)
            .context("Failed to write ledger record")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush ledger writer")
    }
}

/// Split a ledger path into its directory and file name
pub fn split_ledger_path(path: &Path) -> Result<(&Path, &str)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Ledger path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, file_name))
}

/// Load every record of a ledger file
pub fn read_ledger(path: &Path) -> Result<Vec<FeeLedgerRecord>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open ledger {}", path.display()))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: FeeLedgerRecord = result.context("Failed to deserialize ledger record")?;
        records.push(record);
    }
    Ok(records)
}

/// Validate and price every listing in `input`, appending accepted rows to
/// `ledger`. Invalid listings and malformed CSV rows are skipped and reported
/// in the summary. Nothing is appended until the whole input has been read.
pub fn reconcile_listings(input: &Path, ledger: &mut FeeLedger) -> Result<ReconciliationSummary> {
    let file = fs::File::open(input)
        .with_context(|| format!("Failed to open listings {}", input.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let timestamp = Utc::now().timestamp_millis();
    let mut summary = ReconciliationSummary::default();
    let mut accepted = Vec::new();

    for (row, result) in reader.deserialize::<ListingRecord>().enumerate() {
        summary.processed += 1;

        let listing: ListingRecord = match result {
            Ok(listing) => listing,
            Err(e) if e.is_io_error() => {
                return Err(e).with_context(|| format!("Failed to read listing row {}", row + 1));
            }
            Err(e) => {
                let listing_id = format!("row {}", row + 1);
                warn!(listing_id = %listing_id, error = %e, "Skipping malformed listing row");
                summary.rejected.push(RejectedListing {
                    listing_id,
                    errors: vec![format!("Malformed CSV row: {e}")],
                });
                continue;
            }
        };

        let partial = listing.to_partial();
        let errors = validate_fee_input(&partial);
        if !errors.is_empty() {
            warn!(
                listing_id = %listing.listing_id,
                errors = %errors.join("; "),
                "Skipping invalid listing"
            );
            summary.rejected.push(RejectedListing {
                listing_id: listing.listing_id,
                errors,
            });
            continue;
        }

        let input = partial
            .into_input()
            .with_context(|| format!("Listing {} failed conversion", listing.listing_id))?;
        let result = calculate_service_fee(&input);
        debug!(
            listing_id = %listing.listing_id,
            net_fee = result.net_fee,
            model = %result.fee_model,
            "Listing priced"
        );

        summary
            .totals
            .entry(result.currency.to_ascii_uppercase())
            .or_default()
            .add(&result);
        summary.accepted += 1;
        accepted.push(FeeLedgerRecord::from_result(
            &listing.listing_id,
            &result,
            timestamp,
        ));
    }

    for record in &accepted {
        ledger.append(record)?;
    }
    ledger.flush()?;

    info!(
        input = %input.display(),
        ledger = %ledger.path().display(),
        processed = summary.processed,
        accepted = summary.accepted,
        rejected = summary.rejected.len(),
        "Reconciliation completed"
    );
    Ok(summary)
}

//! Currency formatting
//!
//! Formats amounts as localized currency strings with exactly two fraction
//! digits. Codes are checked against the ISO 4217 table below; an unknown code
//! is an error, never a silent fallback.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::CurrencyError;

/// Largest magnitude that still fits a two-digit `Decimal` scale
const MAX_FORMATTABLE: f64 = 1e26;

const NBSP: char = '\u{a0}';

/// ISO 4217 currency entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    /// Narrow display symbol, when one exists
    pub symbol: Option<&'static str>,
}

const fn cur(code: &'static str, symbol: Option<&'static str>) -> Currency {
    Currency { code, symbol }
}

// Sorted by code for binary search. XXX and XTS are not currencies.
static CURRENCIES: &[Currency] = &[
    cur("AED", None),
    cur("AFN", None),
    cur("ALL", None),
    cur("AMD", None),
    cur("ANG", None),
    cur("AOA", None),
    cur("ARS", None),
    cur("AUD", Some("A$")),
    cur("AWG", None),
    cur("AZN", None),
    cur("BAM", None),
    cur("BBD", None),
    cur("BDT", None),
    cur("BGN", None),
    cur("BHD", None),
    cur("BIF", None),
    cur("BMD", None),
    cur("BND", None),
    cur("BOB", None),
    cur("BRL", Some("R$")),
    cur("BSD", None),
    cur("BTN", None),
    cur("BWP", None),
    cur("BYN", None),
    cur("BZD", None),
    cur("CAD", Some("CA$")),
    cur("CDF", None),
    cur("CHF", None),
    cur("CLP", None),
    cur("CNY", Some("CN¥")),
    cur("COP", None),
    cur("CRC", None),
    cur("CUP", None),
    cur("CVE", None),
    cur("CZK", None),
    cur("DJF", None),
    cur("DKK", None),
    cur("DOP", None),
    cur("DZD", None),
    cur("EGP", None),
    cur("ERN", None),
    cur("ETB", None),
    cur("EUR", Some("€")),
    cur("FJD", None),
    cur("FKP", None),
    cur("GBP", Some("£")),
    cur("GEL", None),
    cur("GHS", None),
    cur("GIP", None),
    cur("GMD", None),
    cur("GNF", None),
    cur("GTQ", None),
    cur("GYD", None),
    cur("HKD", Some("HK$")),
    cur("HNL", None),
    cur("HTG", None),
    cur("HUF", None),
    cur("IDR", None),
    cur("ILS", Some("₪")),
    cur("INR", Some("₹")),
    cur("IQD", None),
    cur("IRR", None),
    cur("ISK", None),
    cur("JMD", None),
    cur("JOD", None),
    cur("JPY", Some("¥")),
    cur("KES", None),
    cur("KGS", None),
    cur("KHR", None),
    cur("KMF", None),
    cur("KPW", None),
    cur("KRW", Some("₩")),
    cur("KWD", None),
    cur("KYD", None),
    cur("KZT", None),
    cur("LAK", None),
    cur("LBP", None),
    cur("LKR", None),
    cur("LRD", None),
    cur("LSL", None),
    cur("LYD", None),
    cur("MAD", None),
    cur("MDL", None),
    cur("MGA", None),
    cur("MKD", None),
    cur("MMK", None),
    cur("MNT", None),
    cur("MOP", None),
    cur("MRU", None),
    cur("MUR", None),
    cur("MVR", None),
    cur("MWK", None),
    cur("MXN", Some("MX$")),
    cur("MYR", None),
    cur("MZN", None),
    cur("NAD", None),
    cur("NGN", None),
    cur("NIO", None),
    cur("NOK", None),
    cur("NPR", None),
    cur("NZD", Some("NZ$")),
    cur("OMR", None),
    cur("PAB", None),
    cur("PEN", None),
    cur("PGK", None),
    cur("PHP", Some("₱")),
    cur("PKR", None),
    cur("PLN", None),
    cur("PYG", None),
    cur("QAR", None),
    cur("RON", None),
    cur("RSD", None),
    cur("RUB", None),
    cur("RWF", None),
    cur("SAR", None),
    cur("SBD", None),
    cur("SCR", None),
    cur("SDG", None),
    cur("SEK", None),
    cur("SGD", None),
    cur("SHP", None),
    cur("SLE", None),
    cur("SOS", None),
    cur("SRD", None),
    cur("SSP", None),
    cur("STN", None),
    cur("SYP", None),
    cur("SZL", None),
    cur("THB", None),
    cur("TJS", None),
    cur("TMT", None),
    cur("TND", None),
    cur("TOP", None),
    cur("TRY", None),
    cur("TTD", None),
    cur("TWD", Some("NT$")),
    cur("TZS", None),
    cur("UAH", None),
    cur("UGX", None),
    cur("USD", Some("$")),
    cur("UYU", None),
    cur("UZS", None),
    cur("VES", None),
    cur("VND", Some("₫")),
    cur("VUV", None),
    cur("WST", None),
    cur("XAF", Some("FCFA")),
    cur("XCD", Some("EC$")),
    cur("XOF", Some("F\u{a0}CFA")),
    cur("XPF", Some("CFPF")),
    cur("YER", None),
    cur("ZAR", None),
    cur("ZMW", None),
    cur("ZWL", None),
];

/// Look up an ISO 4217 code, case-insensitively
pub fn lookup_currency(code: &str) -> Option<&'static Currency> {
    let code = code.to_ascii_uppercase();
    CURRENCIES
        .binary_search_by(|c| c.code.cmp(code.as_str()))
        .ok()
        .map(|idx| &CURRENCIES[idx])
}

/// Number formatting conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// `€1,234.50`
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// `1.234,50 €`
    #[serde(rename = "de-DE")]
    DeDe,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::DeDe => "de-DE",
        }
    }

    fn separators(&self) -> (char, char) {
        match self {
            Locale::EnUs => (',', '.'),
            Locale::DeDe => ('.', ','),
        }
    }
}

impl FromStr for Locale {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en-US" | "en_US" => Ok(Locale::EnUs),
            "de-DE" | "de_DE" => Ok(Locale::DeDe),
            other => Err(CurrencyError::UnsupportedLocale(other.to_string())),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Format `amount` in the en-US convention, e.g. `format_currency(1234.5, "EUR")`
/// gives `€1,234.50`.
pub fn format_currency(amount: f64, currency_code: &str) -> Result<String, CurrencyError> {
    format_currency_in(amount, currency_code, Locale::EnUs)
}

/// Format `amount` with exactly two fraction digits in the given locale.
///
/// A negative amount keeps its minus sign even when it rounds to zero.
pub fn format_currency_in(
    amount: f64,
    currency_code: &str,
    locale: Locale,
) -> Result<String, CurrencyError> {
    let currency = lookup_currency(currency_code)
        .ok_or_else(|| CurrencyError::UnknownCurrency(currency_code.to_string()))?;

    if !amount.is_finite() {
        return Err(CurrencyError::NonFiniteAmount(amount));
    }
    if amount.abs() >= MAX_FORMATTABLE {
        return Err(CurrencyError::AmountOutOfRange(amount));
    }

    let decimal = Decimal::from_f64(amount).ok_or(CurrencyError::AmountOutOfRange(amount))?;
    let mut rounded = decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    // Sign follows the input, so -0.001 renders as -€0.00
    let negative = amount < 0.0;
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let (group_sep, decimal_sep) = locale.separators();
    let number = format!("{}{}{}", group_thousands(int_part, group_sep), decimal_sep, frac_part);
    let sign = if negative { "-" } else { "" };

    Ok(match (locale, currency.symbol) {
        (Locale::EnUs, Some(symbol)) => format!("{sign}{symbol}{number}"),
        (Locale::EnUs, None) => format!("{sign}{}{NBSP}{number}", currency.code),
        (Locale::DeDe, symbol) => {
            format!("{sign}{number}{NBSP}{}", symbol.unwrap_or(currency.code))
        }
    })
}

/// Formatted amount, or the raw number and code when formatting fails.
pub fn format_currency_or_raw(amount: f64, currency_code: &str, locale: Locale) -> String {
    match format_currency_in(amount, currency_code, locale) {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!(error = %e, "Falling back to raw amount");
            format!("{amount:.2} {currency_code}")
        }
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

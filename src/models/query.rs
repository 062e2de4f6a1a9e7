use serde::{Deserialize, Serialize};

use crate::{AppError, Result};

/// One comparison route: where the money leaves from, where it lands, and how much.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuery {
    pub from_country: String,
    pub to_country: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
}

impl Default for TransferQuery {
    fn default() -> Self {
        Self {
            from_country: "de".to_string(),
            to_country: "tn".to_string(),
            from_currency: "eur".to_string(),
            to_currency: "tnd".to_string(),
            amount: 100.0,
        }
    }
}

impl TransferQuery {
    pub fn new(
        from_country: impl Into<String>,
        to_country: impl Into<String>,
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            from_country: from_country.into(),
            to_country: to_country.into(),
            from_currency: from_currency.into(),
            to_currency: to_currency.into(),
            amount,
        }
    }

    /// Checks code shapes and the amount, collecting every violation.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !is_code(&self.from_country, 2) {
            errors.push("fromCountry must be a 2-letter country code".to_string());
        }
        if !is_code(&self.to_country, 2) {
            errors.push("toCountry must be a 2-letter country code".to_string());
        }
        if !is_code(&self.from_currency, 3) {
            errors.push("fromCurrency must be a 3-letter currency code".to_string());
        }
        if !is_code(&self.to_currency, 3) {
            errors.push("toCurrency must be a 3-letter currency code".to_string());
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            errors.push("amount must be a positive number".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    /// The route as the comparison site expects it in its URL.
    pub fn lowercased(&self) -> Self {
        Self {
            from_country: self.from_country.to_lowercase(),
            to_country: self.to_country.to_lowercase(),
            from_currency: self.from_currency.to_lowercase(),
            to_currency: self.to_currency.to_lowercase(),
            amount: self.amount,
        }
    }

    pub fn currencies(&self) -> CurrencyPair {
        CurrencyPair::new(&self.from_currency, &self.to_currency)
    }
}

fn is_code(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_alphabetic())
}

/// Source and destination currency codes as they are printed on the page (upper-case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub source: String,
    pub destination: String,
}

impl CurrencyPair {
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_uppercase(),
            destination: destination.to_uppercase(),
        }
    }

    pub fn mentions_source(&self, text: &str) -> bool {
        text.contains(&self.source)
    }

    pub fn mentions_destination(&self, text: &str) -> bool {
        text.contains(&self.destination)
    }

    pub fn mentions_any(&self, text: &str) -> bool {
        self.mentions_source(text) || self.mentions_destination(text)
    }
}

/// Per-invocation rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    pub headless: bool,
    #[serde(alias = "timeout")]
    pub timeout_ms: u64,
    pub block_resources: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_ms: 30_000,
            block_resources: true,
        }
    }
}

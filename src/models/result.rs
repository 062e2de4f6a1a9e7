use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProviderRecord, TransferQuery};

/// The route echoed back to the caller, codes upper-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEcho {
    pub from: String,
    pub to: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: f64,
}

impl From<&TransferQuery> for TransferEcho {
    fn from(query: &TransferQuery) -> Self {
        Self {
            from: query.from_country.to_uppercase(),
            to: query.to_country.to_uppercase(),
            from_currency: query.from_currency.to_uppercase(),
            to_currency: query.to_currency.to_uppercase(),
            amount: query.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub success: bool,
    pub transfer: TransferEcho,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<ProviderRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_providers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

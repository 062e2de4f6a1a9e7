//! Packages the outcome of a scrape into the caller-facing result.

use chrono::Utc;

use crate::models::{ProviderRecord, ScrapeResult, TransferEcho, TransferQuery};
use crate::{AppError, Result};

pub fn assemble(query: &TransferQuery, outcome: Result<Vec<ProviderRecord>>) -> ScrapeResult {
    match outcome {
        Ok(providers) => success(query, providers),
        Err(e) => failure(query, &e),
    }
}

pub fn success(query: &TransferQuery, providers: Vec<ProviderRecord>) -> ScrapeResult {
    ScrapeResult {
        success: true,
        transfer: TransferEcho::from(query),
        total_providers: Some(providers.len()),
        providers: Some(providers),
        scraped_at: Some(Utc::now()),
        error: None,
    }
}

pub fn failure(query: &TransferQuery, error: &AppError) -> ScrapeResult {
    ScrapeResult {
        success: false,
        transfer: TransferEcho::from(query),
        providers: None,
        total_providers: None,
        scraped_at: None,
        error: Some(error.to_string()),
    }
}

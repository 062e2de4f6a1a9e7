use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState};
use crate::models::{ScrapeResult, SessionOptions, TransferQuery};
use crate::scrape_monito;

/// Amount as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn value(&self) -> f64 {
        match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub headless: Option<bool>,
    #[serde(alias = "timeoutMs")]
    pub timeout: Option<u64>,
    pub block_resources: Option<bool>,
}

impl RequestOptions {
    fn resolve(&self, defaults: SessionOptions) -> SessionOptions {
        SessionOptions {
            headless: self.headless.unwrap_or(defaults.headless),
            timeout_ms: self.timeout.filter(|t| *t > 0).unwrap_or(defaults.timeout_ms),
            block_resources: self.block_resources.unwrap_or(defaults.block_resources),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequestBody {
    pub from_country: Option<String>,
    pub to_country: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub options: RequestOptions,
}

impl ScrapeRequestBody {
    /// Fills missing route fields with the default route.
    pub fn to_query(&self) -> TransferQuery {
        let defaults = TransferQuery::default();
        TransferQuery {
            from_country: self.from_country.clone().unwrap_or(defaults.from_country),
            to_country: self.to_country.clone().unwrap_or(defaults.to_country),
            from_currency: self.from_currency.clone().unwrap_or(defaults.from_currency),
            to_currency: self.to_currency.clone().unwrap_or(defaults.to_currency),
            amount: self.amount.as_ref().map_or(defaults.amount, AmountInput::value),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    pub from_country: String,
    pub to_country: String,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: String,
}

async fn run_scrape(
    state: &AppState,
    query: TransferQuery,
    options: SessionOptions,
) -> Result<Json<ScrapeResult>, ApiError> {
    query.validate()?;

    tracing::info!(
        "Scrape requested: {}/{} {} {}->{}",
        query.from_country, query.to_country, query.amount, query.from_currency, query.to_currency
    );

    let result = scrape_monito(state.scraper.clone(), query.lowercased(), options).await;
    Ok(Json(result))
}

pub async fn scrape_post(
    State(state): State<AppState>,
    Json(body): Json<ScrapeRequestBody>,
) -> Result<Json<ScrapeResult>, ApiError> {
    let options = body.options.resolve(state.config.scraper.session_options());
    run_scrape(&state, body.to_query(), options).await
}

pub async fn scrape_get(
    State(state): State<AppState>,
    Path(params): Path<RouteParams>,
) -> Result<Json<ScrapeResult>, ApiError> {
    let query = TransferQuery {
        from_country: params.from_country,
        to_country: params.to_country,
        from_currency: params.from_currency,
        to_currency: params.to_currency,
        amount: AmountInput::Text(params.amount).value(),
    };
    run_scrape(&state, query, state.config.scraper.session_options()).await
}

// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "monito-scraper-api"
    }))
}

pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "title": "Monito Scraper API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /health": "Health check endpoint",
            "GET /api/docs": "This documentation",
            "POST /api/scrape": "Scrape transfer data from Monito",
            "GET /api/scrape/:fromCountry/:toCountry/:fromCurrency/:toCurrency/:amount": "Scrape with URL parameters"
        },
        "parameters": {
            "fromCountry": "Source country (2-letter code, e.g., \"de\")",
            "toCountry": "Destination country (2-letter code, e.g., \"tn\")",
            "fromCurrency": "Source currency (3-letter code, e.g., \"eur\")",
            "toCurrency": "Destination currency (3-letter code, e.g., \"tnd\")",
            "amount": "Transfer amount (positive number, e.g., 100)"
        },
        "options": {
            "headless": "Run browser in headless mode (default: true)",
            "timeout": "Request timeout in milliseconds (default: 30000)",
            "blockResources": "Block images/CSS/fonts for faster scraping (default: true)"
        }
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

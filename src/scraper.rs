use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::config::ScraperConfig;
use crate::core::assembler;
use crate::core::extractor::FieldExtractor;
use crate::core::navigation::NavigationController;
use crate::core::normalizer::normalize;
use crate::core::session::{BrowserIdentity, RenderEngine, SessionHandle, SessionManager};
use crate::models::{ProviderRecord, ScrapeResult, SessionOptions, TransferQuery};
use crate::{AppError, Result};

/// Drives one comparison scrape: acquire a session, load the route, read the
/// list, clean it up, and package the outcome. The session is released on
/// every path and every failure becomes a failed [`ScrapeResult`].
pub struct MonitoScraper {
    sessions: SessionManager,
    navigation: NavigationController,
    extractor: FieldExtractor,
}

impl MonitoScraper {
    pub fn new(engine: Arc<dyn RenderEngine>, config: &ScraperConfig) -> Result<Self> {
        let identity = BrowserIdentity {
            user_agent: config.user_agent.clone(),
            ..BrowserIdentity::default()
        };

        Ok(Self {
            sessions: SessionManager::new(engine).with_identity(identity),
            navigation: NavigationController::new(&config.base_url)?
                .with_settle_delay(Duration::from_millis(config.settle_delay_ms)),
            extractor: FieldExtractor::new()?,
        })
    }

    #[instrument(skip(self, options), fields(route = %route_label(query)))]
    pub fn scrape(&self, query: &TransferQuery, options: &SessionOptions) -> ScrapeResult {
        let outcome = self
            .sessions
            .scoped(options, |handle| self.collect(handle, query));

        match &outcome {
            Ok(providers) => info!(total = providers.len(), "Scrape completed"),
            Err(e) => error!(error = %e, "Scrape failed"),
        }

        assembler::assemble(query, outcome)
    }

    fn collect(&self, handle: &SessionHandle, query: &TransferQuery) -> Result<Vec<ProviderRecord>> {
        let report = self.navigation.load(handle, query)?;
        info!(url = %report.url, expanded = report.expanded, "Comparison page ready");

        let raw = self.extractor.extract(handle, &query.currencies())?;
        let providers = normalize(raw);
        info!(count = providers.len(), "Providers normalized");

        Ok(providers)
    }
}

fn route_label(query: &TransferQuery) -> String {
    format!(
        "{}->{} {} {}->{}",
        query.from_country, query.to_country, query.amount, query.from_currency, query.to_currency
    )
}

/// Runs a scrape on the blocking pool so async callers never stall on the browser.
pub async fn scrape_monito(
    scraper: Arc<MonitoScraper>,
    query: TransferQuery,
    options: SessionOptions,
) -> ScrapeResult {
    let route = query.clone();
    match tokio::task::spawn_blocking(move || scraper.scrape(&query, &options)).await {
        Ok(result) => result,
        Err(e) => assembler::failure(&route, &AppError::session(format!("Scrape task aborted: {}", e))),
    }
}

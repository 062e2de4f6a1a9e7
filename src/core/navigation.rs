//! Loads a route and waits until the comparison list is ready to read.

use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::selectors;
use super::session::SessionHandle;
use crate::models::TransferQuery;
use crate::{AppError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.monito.com";
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// What a successful load did before handing the page to extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub url: Url,
    pub expanded: usize,
}

pub struct NavigationController {
    base_url: Url,
    settle_delay: Duration,
}

impl NavigationController {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| AppError::Parse {
            message: format!("Invalid base URL '{}': {}", base_url, e),
        })?;

        Ok(Self {
            base_url,
            settle_delay: DEFAULT_SETTLE_DELAY,
        })
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// `{base}/en/compare/transfer/{from}/{to}/{fromCurrency}/{toCurrency}/{amount}`
    /// with every code lower-cased.
    pub fn target_url(&self, query: &TransferQuery) -> Result<Url> {
        let route = query.lowercased();
        let amount = route.amount.to_string();

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Parse {
                message: format!("Base URL '{}' cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend([
                "en",
                "compare",
                "transfer",
                route.from_country.as_str(),
                route.to_country.as_str(),
                route.from_currency.as_str(),
                route.to_currency.as_str(),
                amount.as_str(),
            ]);

        Ok(url)
    }

    /// Navigates, waits for the list container and its first item, opens every
    /// detail panel and lets the page settle.
    pub fn load(&self, handle: &SessionHandle, query: &TransferQuery) -> Result<LoadReport> {
        let url = self.target_url(query)?;
        let budgets = handle.budgets();
        let session = handle.session();

        info!(url = %url, "Navigating to comparison page");
        session.navigate(url.as_str(), budgets.navigation)?;

        for selector in [selectors::CASH_TAB, selectors::PROVIDER_ITEM] {
            session.wait_for(selector, budgets.readiness)?;
            debug!(selector, "Readiness signal observed");
        }

        let expanded = self.expand_details(handle);
        std::thread::sleep(self.settle_delay);

        Ok(LoadReport { url, expanded })
    }

    /// Clicks every "Details" control. Individual failures are skipped.
    pub fn expand_details(&self, handle: &SessionHandle) -> usize {
        let outcomes = match handle.session().click_all(selectors::DETAILS_BUTTON) {
            Ok(outcomes) => outcomes,
            Err(e) => {
                debug!(error = %e, "No detail controls to expand");
                return 0;
            }
        };

        let mut expanded = 0;
        for outcome in outcomes {
            match outcome {
                Ok(()) => expanded += 1,
                Err(e) => debug!(error = %e, "Failed to click detail control"),
            }
        }

        debug!(expanded, "Detail panels expanded");
        expanded
    }
}

use headless_chrome::browser::tab::{RequestInterceptor, RequestPausedDecision};
use headless_chrome::browser::transport::{SessionId, Transport};
use headless_chrome::protocol::cdp::Fetch::events::RequestPausedEvent;
use headless_chrome::protocol::cdp::Fetch::FailRequest;
use headless_chrome::protocol::cdp::Network::{ErrorReason, ResourceType};
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::session::{
    classify_resource, BrowserIdentity, Budgets, RenderEngine, RenderSession, ResourceDecision,
    ResourceKind,
};
use crate::models::SessionOptions;
use crate::{AppError, Result};

const BASE_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-web-security",
    "--disable-dev-shm-usage",
    "--memory-pressure-off",
];

const LEAN_ARGS: &[&str] = &[
    "--disable-plugins",
    "--disable-extensions",
    "--no-first-run",
    "--disable-background-networking",
];

// Keeps the DevTools connection alive while a slow navigation is still inside budget.
const IDLE_MARGIN: Duration = Duration::from_secs(10);

/// Launches a dedicated Chrome process per session.
#[derive(Debug, Clone, Default)]
pub struct ChromeEngine {
    chrome_path: Option<PathBuf>,
}

impl ChromeEngine {
    pub fn new(chrome_path: Option<String>) -> Self {
        Self {
            chrome_path: chrome_path.map(PathBuf::from),
        }
    }
}

impl RenderEngine for ChromeEngine {
    fn launch(
        &self,
        options: &SessionOptions,
        identity: &BrowserIdentity,
    ) -> Result<Box<dyn RenderSession>> {
        let mut args: Vec<&OsStr> = BASE_ARGS.iter().map(OsStr::new).collect();
        if options.block_resources {
            args.extend(LEAN_ARGS.iter().map(OsStr::new));
        }

        let budgets = Budgets::from_timeout_ms(options.timeout_ms);
        let mut launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .sandbox(false)
            .window_size(Some(identity.viewport))
            .idle_browser_timeout(budgets.navigation + IDLE_MARGIN)
            .args(args)
            .build()
            .map_err(|e| AppError::session(format!("Failed to create launch options: {}", e)))?;

        // Set Chrome path if provided
        if let Some(chrome_path) = &self.chrome_path {
            launch_options.path = Some(chrome_path.clone());
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::session(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::session(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&identity.user_agent, None, None)
            .map_err(|e| AppError::session(format!("Failed to set user agent: {}", e)))?;
        tab.set_default_timeout(budgets.readiness);

        if options.block_resources {
            block_heavy_resources(&tab)?;
        }

        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            tab: Some(tab),
            element_timeout: budgets.readiness,
        }))
    }
}

fn resource_kind(resource_type: &ResourceType) -> ResourceKind {
    match resource_type {
        ResourceType::Image => ResourceKind::Image,
        ResourceType::Stylesheet => ResourceKind::Stylesheet,
        ResourceType::Font => ResourceKind::Font,
        _ => ResourceKind::Other,
    }
}

/// Fails image, stylesheet and font requests; everything else continues.
fn block_heavy_resources(tab: &Arc<Tab>) -> Result<()> {
    let interceptor: Arc<dyn RequestInterceptor + Send + Sync> = Arc::new(
        |_transport: Arc<Transport>, _session_id: SessionId, event: RequestPausedEvent| {
            match classify_resource(resource_kind(&event.params.resource_Type)) {
                ResourceDecision::Block => RequestPausedDecision::Fail(FailRequest {
                    request_id: event.params.request_id,
                    error_reason: ErrorReason::BlockedByClient,
                }),
                ResourceDecision::Allow => RequestPausedDecision::Continue(None),
            }
        },
    );

    tab.enable_fetch(None, None)
        .map_err(|e| AppError::session(format!("Failed to enable request interception: {}", e)))?;
    tab.enable_request_interception(interceptor)
        .map_err(|e| AppError::session(format!("Failed to install request interceptor: {}", e)))?;

    Ok(())
}

pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    element_timeout: Duration,
}

impl ChromeSession {
    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| AppError::session("Render session already closed"))
    }
}

impl RenderSession for ChromeSession {
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        let tab = self.tab()?;
        tab.set_default_timeout(timeout);

        let outcome = tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| AppError::navigation(format!("Failed to load {}: {}", url, e)));

        tab.set_default_timeout(self.element_timeout);
        outcome
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.tab()?
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(|e| {
                AppError::navigation(format!(
                    "Waiting for '{}' timed out after {}ms: {}",
                    selector,
                    timeout.as_millis(),
                    e
                ))
            })
    }

    fn click_all(&self, selector: &str) -> Result<Vec<Result<()>>> {
        let elements = self
            .tab()?
            .find_elements(selector)
            .map_err(|e| AppError::navigation(format!("No elements match '{}': {}", selector, e)))?;

        Ok(elements
            .iter()
            .map(|element| {
                element
                    .click()
                    .map(|_| ())
                    .map_err(|e| AppError::navigation(format!("Failed to click '{}': {}", selector, e)))
            })
            .collect())
    }

    fn content(&self) -> Result<String> {
        self.tab()?
            .get_content()
            .map_err(|e| AppError::extraction(format!("Failed to get page content: {}", e)))
    }

    fn close(&mut self) -> Result<()> {
        let closed = match self.tab.take() {
            Some(tab) => tab
                .close(true)
                .map(|_| ())
                .map_err(|e| AppError::session(format!("Failed to close tab: {}", e))),
            None => Ok(()),
        };

        // Dropping the browser terminates the Chrome process.
        if self.browser.take().is_some() {
            debug!("Browser process shut down");
        }

        closed
    }
}

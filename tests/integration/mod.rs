// Integration tests for the Monito scraper.
// A fixture render engine serves a saved comparison page so the whole
// pipeline runs without a browser.

pub mod api_tests;
pub mod pipeline_tests;

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{Method, Request},
    response::Response,
};
use monito_scraper::{
    config::AppConfig,
    core::session::{BrowserIdentity, RenderEngine, RenderSession},
    web::AppState,
    AppError, MonitoScraper, SessionOptions,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const COMPARE_PAGE: &str = include_str!("../fixtures/compare_page.html");

/// Counters shared between a fixture engine and the sessions it hands out.
#[derive(Debug, Default)]
pub struct Recorder {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub visited: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

/// Serves fixed HTML; optionally never shows one selector.
pub struct FixtureEngine {
    html: String,
    missing_selector: Option<String>,
    recorder: Arc<Recorder>,
}

impl FixtureEngine {
    pub fn new(html: &str) -> Self {
        Self {
            html: html.to_string(),
            missing_selector: None,
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn compare_page() -> Self {
        Self::new(COMPARE_PAGE)
    }

    pub fn missing(mut self, selector: &str) -> Self {
        self.missing_selector = Some(selector.to_string());
        self
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        Arc::clone(&self.recorder)
    }
}

impl RenderEngine for FixtureEngine {
    fn launch(
        &self,
        _options: &SessionOptions,
        _identity: &BrowserIdentity,
    ) -> monito_scraper::Result<Box<dyn RenderSession>> {
        self.recorder.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureSession {
            html: self.html.clone(),
            missing_selector: self.missing_selector.clone(),
            recorder: Arc::clone(&self.recorder),
        }))
    }
}

struct FixtureSession {
    html: String,
    missing_selector: Option<String>,
    recorder: Arc<Recorder>,
}

impl RenderSession for FixtureSession {
    fn navigate(&self, url: &str, _timeout: Duration) -> monito_scraper::Result<()> {
        self.recorder.visited.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> monito_scraper::Result<()> {
        if self.missing_selector.as_deref() == Some(selector) {
            return Err(AppError::navigation(format!(
                "Waiting for '{}' timed out after {}ms",
                selector,
                timeout.as_millis()
            )));
        }
        Ok(())
    }

    fn click_all(&self, _selector: &str) -> monito_scraper::Result<Vec<monito_scraper::Result<()>>> {
        Ok(vec![
            Ok(()),
            Err(AppError::navigation("Element is not clickable")),
            Ok(()),
        ])
    }

    fn content(&self) -> monito_scraper::Result<String> {
        Ok(self.html.clone())
    }

    fn close(&mut self) -> monito_scraper::Result<()> {
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Configuration for tests: no settle delay.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.scraper.settle_delay_ms = 0;
    config
}

pub fn create_scraper(engine: FixtureEngine) -> anyhow::Result<(Arc<MonitoScraper>, Arc<Recorder>)> {
    let recorder = engine.recorder();
    let scraper = MonitoScraper::new(Arc::new(engine), &test_config().scraper)?;
    Ok((Arc::new(scraper), recorder))
}

/// Create test app state around a fixture engine
pub fn create_test_app_state(engine: FixtureEngine, config: AppConfig) -> anyhow::Result<AppState> {
    let scraper = MonitoScraper::new(Arc::new(engine), &config.scraper)?;
    Ok(AppState::new(Arc::new(scraper), config))
}

pub const TEST_PEER: &str = "198.51.100.20:41000";

/// Helper to build HTTP requests against the router, sent from [`TEST_PEER`]
pub fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> anyhow::Result<Request<Body>> {
    request_from(TEST_PEER, method, uri, body)
}

/// Same as [`request`], from a chosen socket peer.
pub fn request_from(
    peer: &str,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let mut request = builder.body(body)?;
    let addr: SocketAddr = peer.parse()?;
    request.extensions_mut().insert(ConnectInfo(addr));
    Ok(request)
}

pub async fn json_body(response: Response) -> anyhow::Result<serde_json::Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

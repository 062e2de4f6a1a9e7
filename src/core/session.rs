//! Render-session lifecycle: the engine seam, network policy and timeout budgets.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::models::SessionOptions;
use crate::Result;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_VIEWPORT: (u32, u32) = (1366, 768);

/// Fixed browser identity so the comparison page renders the same markup every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserIdentity {
    pub user_agent: String,
    pub viewport: (u32, u32),
}

impl Default for BrowserIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport: DEFAULT_VIEWPORT,
        }
    }
}

/// Wait budgets derived from the configured timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budgets {
    pub navigation: Duration,
    pub readiness: Duration,
}

impl Budgets {
    pub fn from_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            navigation: Duration::from_millis(timeout_ms),
            readiness: Duration::from_millis(timeout_ms / 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDecision {
    Allow,
    Block,
}

/// Sub-resource categories the network policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Stylesheet,
    Font,
    Other,
}

/// Network policy for sub-resource requests. Images, stylesheets and fonts are
/// blocked; anything else is allowed.
pub fn classify_resource(kind: ResourceKind) -> ResourceDecision {
    match kind {
        ResourceKind::Image | ResourceKind::Stylesheet | ResourceKind::Font => {
            ResourceDecision::Block
        }
        ResourceKind::Other => ResourceDecision::Allow,
    }
}

/// One rendered page owned by a single scrape.
#[cfg_attr(test, mockall::automock)]
pub trait RenderSession: Send {
    /// Load `url`, failing with a navigation error once `timeout` elapses.
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;
    /// Block until an element matching `selector` exists.
    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;
    /// Click every element matching `selector`, reporting each click separately.
    fn click_all(&self, selector: &str) -> Result<Vec<Result<()>>>;
    /// Serialized snapshot of the rendered DOM.
    fn content(&self) -> Result<String>;
    fn close(&mut self) -> Result<()>;
}

/// A browser engine able to open configured sessions.
pub trait RenderEngine: Send + Sync {
    fn launch(
        &self,
        options: &SessionOptions,
        identity: &BrowserIdentity,
    ) -> Result<Box<dyn RenderSession>>;
}

/// An acquired session plus its budgets. Released exactly once, at the latest on drop.
pub struct SessionHandle {
    session: Box<dyn RenderSession>,
    budgets: Budgets,
    released: bool,
}

impl SessionHandle {
    pub fn session(&self) -> &dyn RenderSession {
        self.session.as_ref()
    }

    pub fn budgets(&self) -> Budgets {
        self.budgets
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Closes the underlying session. Later calls are no-ops.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("Releasing render session");
        self.session.close()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "Render session release failed");
        }
    }
}

pub struct SessionManager {
    engine: Arc<dyn RenderEngine>,
    identity: BrowserIdentity,
}

impl SessionManager {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            identity: BrowserIdentity::default(),
        }
    }

    pub fn with_identity(mut self, identity: BrowserIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn acquire(&self, options: &SessionOptions) -> Result<SessionHandle> {
        let session = self.engine.launch(options, &self.identity)?;
        info!(
            headless = options.headless,
            timeout_ms = options.timeout_ms,
            block_resources = options.block_resources,
            "Render session acquired"
        );

        Ok(SessionHandle {
            session,
            budgets: Budgets::from_timeout_ms(options.timeout_ms),
            released: false,
        })
    }

    pub fn release(&self, handle: &mut SessionHandle) -> Result<()> {
        handle.release()
    }

    /// Runs `work` inside a freshly acquired session and releases it whatever the
    /// outcome. A release fault is logged and never replaces the result of `work`.
    pub fn scoped<T>(
        &self,
        options: &SessionOptions,
        work: impl FnOnce(&SessionHandle) -> Result<T>,
    ) -> Result<T> {
        let mut handle = self.acquire(options)?;
        let outcome = work(&handle);

        if let Err(e) = self.release(&mut handle) {
            warn!(error = %e, "Render session release failed");
        }

        outcome
    }
}

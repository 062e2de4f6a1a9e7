use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::core::navigation::DEFAULT_BASE_URL;
use crate::core::session::DEFAULT_USER_AGENT;
use crate::models::SessionOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub base_url: String,
    pub headless: bool,
    pub timeout_ms: u64,
    pub block_resources: bool,
    pub settle_delay_ms: u64,
    pub user_agent: String,
    pub chrome_path: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        let options = SessionOptions::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: options.headless,
            timeout_ms: options.timeout_ms,
            block_resources: options.block_resources,
            settle_delay_ms: 2000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chrome_path: None,
        }
    }
}

impl ScraperConfig {
    /// Session options used when a request does not override them.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            headless: self.headless,
            timeout_ms: self.timeout_ms,
            block_resources: self.block_resources,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
    /// Key clients on proxy headers (`X-Forwarded-For` and friends) instead of the
    /// socket peer. Only safe behind a proxy that overwrites those headers.
    #[serde(default)]
    pub trust_proxy: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 15 * 60,
            trust_proxy: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with built-in defaults
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "MONITO_"
            .add_source(Environment::with_prefix("MONITO").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.scraper.chrome_path.is_none() {
            config.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if Url::parse(&self.scraper.base_url).is_err() {
            return Err(ConfigError::Message("Invalid scraper base_url format".into()));
        }

        if self.scraper.timeout_ms == 0 {
            return Err(ConfigError::Message("Scraper timeout_ms must be greater than 0".into()));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent cannot be empty".into()));
        }

        if self.rate_limit.max_requests == 0 || self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Message(
                "Rate limit max_requests and window_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

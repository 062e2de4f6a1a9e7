pub mod browser;
pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod scraper;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use browser::ChromeEngine;
pub use config::AppConfig;
pub use models::{ProviderRecord, ScrapeResult, SessionOptions, TransferQuery};
pub use crate::scraper::{scrape_monito, MonitoScraper};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;

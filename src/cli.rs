//! Command-line surface: a one-shot `scrape` and a long-running `serve`.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ScraperConfig;
use crate::models::{ScrapeResult, SessionOptions, TransferQuery};
use crate::Result;

#[derive(Debug, Parser)]
#[command(name = "monito-scraper", version, about = "Money transfer comparison scraper for Monito")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape one route and print the result as JSON
    Scrape(ScrapeArgs),
    /// Run the HTTP API
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ScrapeArgs {
    #[arg(long, default_value = "de")]
    pub from_country: String,

    #[arg(long, default_value = "tn")]
    pub to_country: String,

    #[arg(long, default_value = "eur")]
    pub from_currency: String,

    #[arg(long, default_value = "tnd")]
    pub to_currency: String,

    #[arg(long, default_value_t = 100.0)]
    pub amount: f64,

    /// Overall budget in milliseconds (defaults to the configured timeout)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub no_headless: bool,

    /// Let images, stylesheets and fonts load
    #[arg(long)]
    pub no_block_resources: bool,

    /// Write the JSON result to this file as well as stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub pretty: bool,
}

impl ScrapeArgs {
    pub fn to_query(&self) -> TransferQuery {
        TransferQuery::new(
            &self.from_country,
            &self.to_country,
            &self.from_currency,
            &self.to_currency,
            self.amount,
        )
    }

    /// Flags only ever switch features off relative to the configuration.
    pub fn session_options(&self, config: &ScraperConfig) -> SessionOptions {
        let defaults = config.session_options();
        SessionOptions {
            headless: defaults.headless && !self.no_headless,
            timeout_ms: self.timeout.filter(|t| *t > 0).unwrap_or(defaults.timeout_ms),
            block_resources: defaults.block_resources && !self.no_block_resources,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Overrides server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Overrides server.port
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub fn render_json(result: &ScrapeResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

pub fn write_output(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

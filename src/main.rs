use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use monito_scraper::cli::{self, Cli, Command, ScrapeArgs, ServeArgs};
use monito_scraper::web::{self, AppState};
use monito_scraper::{scrape_monito, AppConfig, ChromeEngine, MonitoScraper};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "monito_scraper=debug" } else { "monito_scraper=info" };
    // Logs go to stderr so stdout carries only the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Scrape(args) => run_scrape(config, args).await,
        Command::Serve(args) => run_server(config, args).await,
    }
}

fn build_scraper(config: &AppConfig) -> Result<Arc<MonitoScraper>> {
    let engine = Arc::new(ChromeEngine::new(config.scraper.chrome_path.clone()));
    let scraper = MonitoScraper::new(engine, &config.scraper)
        .context("Failed to initialize scraper")?;
    Ok(Arc::new(scraper))
}

async fn run_scrape(config: AppConfig, args: ScrapeArgs) -> Result<ExitCode> {
    let query = args.to_query();
    if let Err(e) = query.validate() {
        eprintln!("Invalid arguments: {}", e);
        return Ok(ExitCode::FAILURE);
    }

    let options = args.session_options(&config.scraper);
    let scraper = build_scraper(&config)?;

    info!("Starting Monito scrape...");
    let result = scrape_monito(scraper, query.lowercased(), options).await;

    let json = cli::render_json(&result, args.pretty)?;
    println!("{}", json);

    if let Some(path) = &args.output {
        cli::write_output(path, &json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Result written to {}", path.display());
    }

    if result.success {
        info!("Found {} providers", result.total_providers.unwrap_or_default());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run_server(mut config: AppConfig, args: ServeArgs) -> Result<ExitCode> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("Starting Monito scraper API...");
    let state = AppState::new(build_scraper(&config)?, config.clone());
    web::serve(config, state).await?;

    info!("Shutting down...");
    Ok(ExitCode::SUCCESS)
}

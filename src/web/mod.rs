use axum::{
    middleware::from_fn,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{AppConfig, MonitoScraper};

pub mod handlers;
pub mod middleware;
pub mod responses;

pub use handlers::{api_docs, health_check, not_found, scrape_get, scrape_post};
pub use middleware::RateLimiter;
pub use responses::*;

#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<MonitoScraper>,
    pub config: AppConfig,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(scraper: Arc<MonitoScraper>, config: AppConfig) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        Self {
            scraper,
            config,
            limiter,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // API routes
        .nest("/api", api_routes(state.clone()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive())
                .layer(from_fn(middleware::security_headers)),
        )
        .with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/docs", get(api_docs))
        .route("/scrape", post(scrape_post))
        .route(
            "/scrape/:fromCountry/:toCountry/:fromCurrency/:toCurrency/:amount",
            get(scrape_get),
        )
        .layer(from_fn_with_state(state, middleware::rate_limiting))
}

pub async fn serve(config: AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await?;

    tracing::info!(
        "Server starting on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Health check: http://{}:{}/health", config.server.host, config.server.port);
    tracing::info!("API docs: http://{}:{}/api/docs", config.server.host, config.server.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

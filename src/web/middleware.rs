use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

use super::responses::ApiError;
use super::AppState;
use crate::config::RateLimitConfig;

/// Fixed-window request counter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    trust_proxy: bool,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            trust_proxy: config.trust_proxy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request for `client` at `now`; false once the window is exhausted.
    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Forget clients whose window has passed so the map stays small.
        windows.retain(|_, (started, _)| now.duration_since(*started) < self.window);

        let (_, count) = windows.entry(client.to_string()).or_insert((now, 0));
        if *count >= self.max_requests {
            return false;
        }
        *count += 1;
        true
    }

    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    /// The key a request is counted under: the socket peer, or the first
    /// forwarded address when proxy headers are trusted.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        let forwarded = if self.trust_proxy {
            extract_client_ip(headers)
        } else {
            None
        };

        forwarded
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Rate limiting middleware
pub async fn rate_limiting(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = state.limiter.client_key(request.headers(), peer);

    if !state.limiter.check(&client_ip) {
        warn!(client_ip = %client_ip, "Rate limit exceeded");
        return ApiError::TooManyRequests.into_response();
    }

    tracing::debug!(client_ip = %client_ip, "Rate limit check passed");
    next.run(request).await
}

/// Security headers middleware
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("X-XSS-Protection", HeaderValue::from_static("0"));
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));

    response
}

// Helper functions

fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    // Check various headers that might contain the real client IP
    let ip_headers = [
        "x-forwarded-for",
        "x-real-ip",
        "cf-connecting-ip", // Cloudflare
        "x-client-ip",
    ];

    for header_name in &ip_headers {
        if let Some(header_value) = headers.get(*header_name) {
            if let Ok(value) = header_value.to_str() {
                // Take the first IP if there are multiple (comma-separated)
                let ip = value.split(',').next().unwrap_or(value).trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    None
}

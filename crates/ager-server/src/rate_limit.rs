//! Fixed-window rate limiting for task submission.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::time::Instant;
use tracing::warn;

use crate::api::ApiError;
use crate::config::RateLimitConfig;
use crate::state::AppState;

/// Windows are swept once the table grows past this many keys.
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count one request for `key`. Returns `false` once the key has used up
    /// its window.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let window_len = self.config.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < window_len);
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                count: 0,
            };
        }
        if window.count >= self.config.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// First `X-Forwarded-For` entry, else the peer address, else `"unknown"`.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Middleware guarding `POST /api/tasks`.
pub async fn limit_submissions(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer);

    if !state.limiter.check(&key) {
        let config = state.limiter.config();
        warn!(
            client = %key,
            path = %request.uri().path(),
            limit = config.max_requests,
            window_secs = config.window.as_secs_f64(),
            "rate limit exceeded"
        );
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn allows_up_to_limit_then_rejects() {
        let limiter = limiter(3);
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        // other clients have their own window
        assert!(limiter.check("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn window_resets_after_expiry() {
        let limiter = limiter(1);
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(limiter.check("a"));
    }

    #[test]
    fn client_key_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer: SocketAddr = "127.0.0.1:9000".parse().unwrap();

        assert_eq!(client_key(&headers, Some(peer)), "203.0.113.7");
        assert_eq!(client_key(&HeaderMap::new(), Some(peer)), "127.0.0.1");
        assert_eq!(client_key(&HeaderMap::new(), None), "unknown");
    }
}

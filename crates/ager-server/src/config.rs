//! Server configuration from the environment.

use std::env;
use std::time::Duration;

use tracing::warn;

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    let Some(raw) = env::var(key).ok().filter(|s| !s.trim().is_empty()) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(key, value = %raw, "ignoring unparseable environment variable, using default");
        default
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Only origin allowed by CORS.
    pub frontend_url: String,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(60_000),
            max_requests: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
            frontend_url: "http://localhost:5173".to_string(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", &defaults.host),
            port: env_parse("PORT", defaults.port),
            frontend_url: env_or("FRONTEND_URL", &defaults.frontend_url),
            rate_limit: RateLimitConfig {
                window: Duration::from_millis(env_parse(
                    "API_TASK_ADD_LIMIT_WINDOW_MS",
                    defaults.rate_limit.window.as_millis() as u64,
                )),
                max_requests: env_parse(
                    "API_TASK_ADD_LIMIT_MAX_REQUESTS",
                    defaults.rate_limit.max_requests,
                ),
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Filter directive for the log subscriber: `RUST_LOG` wins, then `LOG_LEVEL`
/// (case-insensitive), then `info`.
pub fn log_filter() -> String {
    if let Ok(directive) = env::var("RUST_LOG")
        && !directive.trim().is_empty()
    {
        return directive;
    }
    env_or("LOG_LEVEL", "info").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5050");
        assert_eq!(config.frontend_url, "http://localhost:5173");
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.rate_limit.max_requests, 10);
    }

    // The only test touching these keys.
    #[test]
    fn from_env_overrides() {
        // SAFETY: no other test reads or writes these keys.
        unsafe {
            env::set_var("PORT", "8081");
            env::set_var("API_TASK_ADD_LIMIT_MAX_REQUESTS", "3");
            env::set_var("API_TASK_ADD_LIMIT_WINDOW_MS", "oops");
        }

        let config = ServerConfig::from_env();

        unsafe {
            env::remove_var("PORT");
            env::remove_var("API_TASK_ADD_LIMIT_MAX_REQUESTS");
            env::remove_var("API_TASK_ADD_LIMIT_WINDOW_MS");
        }

        assert_eq!(config.port, 8081);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
    }
}

//! Scheduler configuration.
//!
//! Values come from the environment (call `dotenvy::dotenv()` first if a
//! `.env` file should count). Missing or unparseable values fall back to the
//! defaults, unparseable ones with a warning; range checks happen in `SchedulerBuilder::build`.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::queue::{DEFAULT_AGING_FACTOR, ProgressIncrement};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(10_000);

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Parse a raw setting, falling back to `default` when it is absent or
/// does not parse. A value that is set but unparseable is logged.
fn parse_or_default<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = raw, "ignoring unparseable environment variable, using default");
            default
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    parse_or_default(key, env_opt(key).as_deref(), default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Period between ticks.
    pub tick_interval: Duration,
    pub increment: ProgressIncrement,
    /// Waited seconds per point of priority bonus.
    pub aging_factor: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            increment: ProgressIncrement::default(),
            aging_factor: DEFAULT_AGING_FACTOR,
        }
    }
}

impl SchedulerConfig {
    /// Read `TASK_PROCESS_INTERVAL_MS`, `TASK_PROGRESS_INCREMENT_MIN`,
    /// `TASK_PROGRESS_INCREMENT_MAX` and `AGING_FACTOR`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick_interval: Duration::from_millis(env_parse(
                "TASK_PROCESS_INTERVAL_MS",
                defaults.tick_interval.as_millis() as u64,
            )),
            increment: ProgressIncrement::new(
                env_parse("TASK_PROGRESS_INCREMENT_MIN", defaults.increment.min),
                env_parse("TASK_PROGRESS_INCREMENT_MAX", defaults.increment.max),
            ),
            aging_factor: env_parse("AGING_FACTOR", defaults.aging_factor),
        }
    }
}

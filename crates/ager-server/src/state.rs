use std::sync::Arc;

use ager_core::QueueService;
use tokio::sync::broadcast;

use crate::rate_limit::RateLimiter;

/// Shared handler state.
pub struct AppState {
    pub queue: Arc<dyn QueueService>,
    /// Serialized `QueueEvent` JSON, fanned out to every WebSocket client.
    pub broadcast: broadcast::Sender<String>,
    pub limiter: RateLimiter,
}

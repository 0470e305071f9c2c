mod api;
mod config;
mod live;
mod rate_limit;
mod router;
mod sink;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use ager_core::{QueueService, SchedulerBuilder, SchedulerConfig};
use anyhow::Context;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;
use crate::sink::BroadcastSink;
use crate::state::AppState;

/// Buffered live events per WebSocket subscriber.
const BROADCAST_CAPACITY: usize = 256;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config::log_filter()))
        .init();

    let server_config = ServerConfig::from_env();
    let scheduler_config = SchedulerConfig::from_env();
    info!(
        tick_ms = scheduler_config.tick_interval.as_millis() as u64,
        increment_min = scheduler_config.increment.min,
        increment_max = scheduler_config.increment.max,
        aging_factor = scheduler_config.aging_factor,
        "scheduler configuration loaded"
    );

    let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
    let scheduler = Arc::new(
        SchedulerBuilder::new()
            .config(scheduler_config)
            .sink(BroadcastSink::new(broadcast_tx.clone()))
            .build()
            .context("invalid scheduler configuration")?,
    );

    let state = Arc::new(AppState {
        queue: scheduler.clone(),
        broadcast: broadcast_tx,
        limiter: RateLimiter::new(server_config.rate_limit),
    });
    let app = router::build_router(state, &server_config.frontend_url);

    let addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, frontend = %server_config.frontend_url, "ager server listening");

    scheduler.start().await;

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    scheduler.stop().await;
    let counts = scheduler.snapshot().await.counts();
    info!(
        waiting = counts.waiting,
        processing = counts.processing,
        completed = counts.completed,
        "server stopped"
    );

    served.context("server error")
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::QueueCore;

/// Handle to the periodic tick task.
/// - `request_shutdown` でループを止める（実行中の tick は最後まで走る）
/// - `shutdown_and_join()` で終了を待てる
pub struct TickLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TickLoop {
    /// Spawn the loop. The first tick fires one `period` after spawning.
    pub fn spawn(core: Arc<Mutex<QueueCore>>, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(tick_loop(core, period, shutdown_rx));
        info!(interval_ms = period.as_millis() as u64, "task processing started");
        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(err) = self.join.await {
            error!(%err, "tick loop ended abnormally");
        }
        info!("task processing stopped");
    }
}

async fn tick_loop(
    core: Arc<Mutex<QueueCore>>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped counts as shutdown too
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        // 1 tick を別タスクで実行し、panic してもループは止めない
        let core = Arc::clone(&core);
        let result = tokio::spawn(async move { core.lock().await.tick() }).await;
        match result {
            Ok(Ok(outcome)) => debug!(?outcome, "tick finished"),
            Ok(Err(err)) => error!(%err, "tick failed, continuing on next interval"),
            Err(join_err) => error!(%join_err, "tick panicked, continuing on next interval"),
        }
    }
}

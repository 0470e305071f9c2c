//! Scheduler - QueueCore を共有し、周期 tick ループを管理する
//!
//! - 全ての操作は 1 つの Mutex の内側で行われ、tick と submit が交互に
//!   割り込むことはない
//! - start / stop は冪等

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::tick_loop::TickLoop;
use super::{QueueCore, TickOutcome};
use crate::domain::{AgerError, QueueSnapshot, Task};
use crate::ports::QueueService;

pub struct Scheduler {
    core: Arc<Mutex<QueueCore>>,
    tick_interval: Duration,
    tick_loop: Mutex<Option<TickLoop>>,
}

impl Scheduler {
    pub(crate) fn new(core: QueueCore, tick_interval: Duration) -> Self {
        Self {
            core: Arc::new(Mutex::new(core)),
            tick_interval,
            tick_loop: Mutex::new(None),
        }
    }

    /// Begin periodic processing. Calling it while already running is a no-op.
    pub async fn start(&self) {
        let mut slot = self.tick_loop.lock().await;
        if slot.is_some() {
            info!("task processing already running");
            return;
        }
        *slot = Some(TickLoop::spawn(Arc::clone(&self.core), self.tick_interval));
    }

    /// Stop periodic processing and wait for an in-flight tick to finish.
    /// Task state is left untouched.
    pub async fn stop(&self) {
        let running = self.tick_loop.lock().await.take();
        if let Some(tick_loop) = running {
            tick_loop.shutdown_and_join().await;
        }
    }

    pub async fn is_running(&self) -> bool {
        self.tick_loop.lock().await.is_some()
    }

    /// Run one tick right now, outside the timer.
    pub async fn tick(&self) -> Result<TickOutcome, AgerError> {
        self.core.lock().await.tick()
    }
}

#[async_trait]
impl QueueService for Scheduler {
    async fn submit(&self, name: String, priority: u32) -> Result<Task, AgerError> {
        self.core.lock().await.submit(name, priority)
    }

    async fn list_pending(&self) -> Vec<Task> {
        self.core.lock().await.list_pending()
    }

    async fn list_completed(&self) -> Vec<Task> {
        self.core.lock().await.list_completed()
    }

    async fn clear_completed(&self) -> Result<usize, AgerError> {
        self.core.lock().await.clear_completed()
    }

    async fn current(&self) -> Option<Task> {
        self.core.lock().await.current()
    }

    async fn snapshot(&self) -> QueueSnapshot {
        self.core.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::app::SchedulerBuilder;
    use crate::app::testing::FaultyStore;
    use crate::config::SchedulerConfig;
    use crate::domain::TaskStatus;
    use crate::impls::InMemoryTaskStore;
    use crate::ports::{FixedClock, RecordingSink, TaskStore};
    use crate::queue::ProgressIncrement;

    fn scheduler(sink: RecordingSink) -> Scheduler {
        scheduler_with_store(sink, Box::new(InMemoryTaskStore::new()))
    }

    fn scheduler_with_store(sink: RecordingSink, store: Box<dyn TaskStore>) -> Scheduler {
        let config = SchedulerConfig {
            tick_interval: Duration::from_secs(10),
            increment: ProgressIncrement::fixed(10),
            ..SchedulerConfig::default()
        };
        SchedulerBuilder::new()
            .config(config)
            .clock(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()))
            .store(store)
            .sink(sink)
            .seed(1)
            .build()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_fire_on_interval_once_started() {
        let sched = scheduler(RecordingSink::new());
        let task = sched.submit("render".into(), 1).await.unwrap();

        sched.start().await;
        tokio::time::sleep(Duration::from_secs(35)).await;
        sched.stop().await;

        let current = sched.current().await.unwrap();
        assert_eq!(current.id, task.id);
        assert_eq!(current.progress, 30);
        assert_eq!(current.status, TaskStatus::Processing);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_before_first_interval() {
        let sched = scheduler(RecordingSink::new());
        sched.submit("a".into(), 1).await.unwrap();

        sched.start().await;
        tokio::time::sleep(Duration::from_secs(9)).await;

        let pending = sched.list_pending().await;
        assert_eq!(pending[0].progress, 0);
        sched.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_progress_and_keeps_state() {
        let sink = RecordingSink::new();
        let sched = scheduler(sink.clone());
        sched.submit("a".into(), 1).await.unwrap();

        sched.start().await;
        tokio::time::sleep(Duration::from_secs(15)).await;
        sched.stop().await;
        assert!(!sched.is_running().await);

        let deltas = sink.progress_deltas().len();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(sink.progress_deltas().len(), deltas);
        let pending = sched.list_pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].progress, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_idempotent() {
        let sched = scheduler(RecordingSink::new());
        sched.submit("a".into(), 1).await.unwrap();

        sched.stop().await;
        sched.start().await;
        sched.start().await;
        assert!(sched.is_running().await);

        tokio::time::sleep(Duration::from_secs(25)).await;
        sched.stop().await;
        sched.stop().await;

        // a second loop would have doubled the progress
        let pending = sched.list_pending().await;
        assert_eq!(pending[0].progress, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_task_to_completion_then_idles() {
        let sink = RecordingSink::new();
        let sched = scheduler(sink.clone());
        let task = sched.submit("a".into(), 1).await.unwrap();

        for _ in 0..10 {
            sched.tick().await.unwrap();
        }
        assert_eq!(sched.tick().await.unwrap(), TickOutcome::Idle);

        let completed = sched.list_completed().await;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, task.id);
        assert_eq!(sink.completions().len(), 1);

        assert_eq!(sched.clear_completed().await.unwrap(), 1);
        let snap = sched.snapshot().await;
        assert!(snap.pending.is_empty() && snap.completed.is_empty());
        assert!(snap.current.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_does_not_stop_the_loop() {
        let store = FaultyStore::default();
        let sched = scheduler_with_store(RecordingSink::new(), Box::new(store.clone()));
        let task = sched.submit("render".into(), 1).await.unwrap();
        store.fail_updates(0, 1);

        sched.start().await;
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(sched.is_running().await);
        sched.stop().await;

        // first tick fails, the next two advance
        let current = sched.current().await.unwrap();
        assert_eq!(current.id, task.id);
        assert_eq!(current.progress, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_tick_does_not_stop_the_loop() {
        let store = FaultyStore::default();
        let sched = scheduler_with_store(RecordingSink::new(), Box::new(store.clone()));
        let task = sched.submit("render".into(), 1).await.unwrap();
        store.panic_next_updates(1);

        sched.start().await;
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(sched.is_running().await);
        sched.stop().await;

        let current = sched.current().await.unwrap();
        assert_eq!(current.id, task.id);
        assert_eq!(current.progress, 20);
    }

    #[tokio::test]
    async fn submit_rejects_blank_name() {
        let sched = scheduler(RecordingSink::new());
        let err = sched.submit("   ".into(), 3).await.unwrap_err();
        assert_eq!(err.kind(), crate::domain::ErrorKind::InvalidInput);
    }
}

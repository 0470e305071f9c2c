//! QueueCore - スケジューラの状態機械
//!
//! キューの可変状態（TaskStore、current ポインタ、乱数）をひとまとめにした
//! 同期的なオブジェクトです。`Scheduler` が 1 つの Mutex で包み、
//! tick / submit / clear をそれぞれ 1 回のロック内で完結させます。
//!
//! # tick のフロー
//! 1. pending を再ランク（実効優先度を保存）
//! 2. current を選択（先頭のままなら継続 = ヒステリシス）
//! 3. current が無ければ Idle
//! 4. current が既に 100% なら完了処理だけ行い、選択をやり直す（1 tick に 1 回）
//! 5. 乱数で progress を進めて保存
//! 6. progress 通知
//! 7. 100% に到達したら完了処理 → 同じ tick 内で次の current を選択
//! 8. snapshot 通知

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

use crate::domain::{AgerError, ProgressDelta, QueueSnapshot, Task, TaskId, TaskStatus};
use crate::ports::{Clock, IdGenerator, NotificationSink, TaskStore};
use crate::queue::{AgingRanker, ProgressIncrement};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No pending task; nothing changed.
    Idle,
    /// The current task moved forward but is not done yet.
    Advanced { task_id: TaskId, progress: u8 },
    /// The current task reached 100 during this tick.
    Completed { task_id: TaskId },
    /// The current task was already at 100; only the bookkeeping ran.
    Recovered { task_id: TaskId },
    /// The current task vanished from the store; the pointer was cleared.
    LostCurrent { task_id: TaskId },
}

pub struct QueueCore {
    store: Box<dyn TaskStore>,
    current: Option<TaskId>,
    ranker: AgingRanker,
    increment: ProgressIncrement,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    sink: Arc<dyn NotificationSink>,
}

impl QueueCore {
    pub(crate) fn new(
        store: Box<dyn TaskStore>,
        ranker: AgingRanker,
        increment: ProgressIncrement,
        rng: StdRng,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            current: None,
            ranker,
            increment,
            rng,
            clock,
            ids,
            sink,
        }
    }

    /// Create a waiting task, re-run selection so it can take the lead
    /// immediately, and publish a snapshot.
    pub fn submit(&mut self, name: String, priority: u32) -> Result<Task, AgerError> {
        if name.trim().is_empty() {
            return Err(AgerError::invalid_input("task name must not be empty"));
        }

        let now = self.clock.now();
        let task = Task::new(self.ids.generate_task_id(), name, priority, now);
        let id = task.id;
        info!(task_id = %id, name = %task.name, priority, "new task added");

        if let Err(err) = self.store.insert(task) {
            error!(task_id = %id, %err, "failed to insert task");
            return Err(err);
        }

        let previous = self.current;
        if let Err(err) = self.reselect(now, None) {
            error!(task_id = %id, %err, "failed to schedule new task, rolling back");
            self.store.delete(&id);
            self.current = previous;
            if let Err(restore_err) = self.reselect(now, None) {
                error!(%restore_err, "failed to restore current task after rollback");
            }
            return Err(err);
        }
        self.emit_snapshot(now);

        self.store.get(&id).ok_or(AgerError::NotFound(id))
    }

    /// Delete every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize, AgerError> {
        let now = self.clock.now();
        let completed = self.store.list_completed();
        for task in &completed {
            self.store.delete(&task.id);
            if self.current == Some(task.id) {
                self.current = None;
            }
        }
        info!(count = completed.len(), "cleared completed tasks");

        self.emit_snapshot(now);
        Ok(completed.len())
    }

    pub fn tick(&mut self) -> Result<TickOutcome, AgerError> {
        let now = self.clock.now();
        debug!("running task processing cycle");

        let ranked = self.ranker.rank(self.store.list_pending(), now);
        self.persist_ranking(&ranked)?;
        self.select_current(&ranked)?;

        let Some(current) = self.current else {
            debug!("no tasks to process");
            return Ok(TickOutcome::Idle);
        };

        let Some(mut task) = self.store.get(&current) else {
            warn!(task_id = %current, "current task not found in store");
            self.current = None;
            self.emit_snapshot(now);
            return Ok(TickOutcome::LostCurrent { task_id: current });
        };

        if task.is_completed() {
            // Only reachable when the store and the pending listing disagree.
            info!(task_id = %current, "current task was already completed");
            task.mark_completed(now);
            self.store.update(task.clone())?;
            self.current = None;
            self.sink.completed(&task);
            self.reselect(now, Some(current))?;
            self.emit_snapshot(now);
            return Ok(TickOutcome::Recovered { task_id: current });
        }

        let step = self.increment.draw(&mut self.rng);
        let progress = task.advance(step);
        self.store.update(task.clone())?;
        info!(task_id = %task.id, name = %task.name, step, progress, "processing task");
        self.sink.progress(&ProgressDelta {
            task_id: task.id,
            progress,
        });

        if task.is_pending() {
            self.emit_snapshot(now);
            return Ok(TickOutcome::Advanced {
                task_id: task.id,
                progress,
            });
        }

        task.mark_completed(now);
        self.store.update(task.clone())?;
        self.current = None;
        info!(task_id = %task.id, name = %task.name, "task completed");
        self.sink.completed(&task);

        self.reselect(now, None)?;
        self.emit_snapshot(now);
        Ok(TickOutcome::Completed { task_id: task.id })
    }

    /// Pending tasks, highest effective priority first.
    pub fn list_pending(&self) -> Vec<Task> {
        self.ranker.rank(self.store.list_pending(), self.clock.now())
    }

    pub fn list_completed(&self) -> Vec<Task> {
        self.store.list_completed()
    }

    pub fn current(&self) -> Option<Task> {
        self.current.and_then(|id| self.store.get(&id))
    }

    pub fn current_id(&self) -> Option<TaskId> {
        self.current
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.build_snapshot(self.clock.now())
    }

    fn build_snapshot(&self, now: DateTime<Utc>) -> QueueSnapshot {
        let pending = self.ranker.rank(self.store.list_pending(), now);
        let current = self.current.and_then(|id| {
            pending
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .or_else(|| self.store.get(&id))
        });
        QueueSnapshot {
            pending,
            completed: self.store.list_completed(),
            current,
        }
    }

    fn emit_snapshot(&self, now: DateTime<Utc>) {
        self.sink.snapshot(&self.build_snapshot(now));
        debug!("queue update notification sent");
    }

    /// Write freshly computed effective priorities back to the store.
    fn persist_ranking(&mut self, ranked: &[Task]) -> Result<(), AgerError> {
        for ranked_task in ranked {
            let Some(mut stored) = self.store.get(&ranked_task.id) else {
                continue;
            };
            if stored.is_pending() {
                stored.effective_priority = ranked_task.effective_priority;
                self.store.update(stored)?;
            }
        }
        Ok(())
    }

    /// Rank again and pick the leader, skipping `exclude` if given.
    fn reselect(
        &mut self,
        now: DateTime<Utc>,
        exclude: Option<TaskId>,
    ) -> Result<(), AgerError> {
        let mut ranked = self.ranker.rank(self.store.list_pending(), now);
        if let Some(excluded) = exclude {
            ranked.retain(|t| t.id != excluded);
        }
        self.select_current(&ranked)
    }

    /// Keep the current task while it still leads; otherwise hand over to the
    /// leader.
    fn select_current(&mut self, ranked: &[Task]) -> Result<(), AgerError> {
        let leader = ranked.first().map(|t| t.id);

        if let Some(current) = self.current
            && leader == Some(current)
        {
            debug!(task_id = %current, "continuing current task");
            // no-op unless an earlier hand-over failed halfway
            return self.set_status(current, TaskStatus::Processing);
        }

        let previous = self.current.take();
        self.current = leader;
        if previous == leader {
            return Ok(());
        }

        if let Some(prev_id) = previous {
            self.set_status(prev_id, TaskStatus::Waiting)?;
        }
        if let Some(next_id) = leader {
            self.set_status(next_id, TaskStatus::Processing)?;
        }

        match ranked.first() {
            Some(next) => info!(
                task_id = %next.id,
                name = %next.name,
                previous = ?previous,
                "switched currently processing task"
            ),
            None => info!(previous = ?previous, "no task left to process"),
        }
        Ok(())
    }

    /// Apply a status change if the stored task allows it. Completed tasks
    /// and vanished ids are left alone.
    fn set_status(&mut self, id: TaskId, status: TaskStatus) -> Result<(), AgerError> {
        let Some(mut task) = self.store.get(&id) else {
            return Ok(());
        };
        if task.is_completed() || !task.status.can_transition_to(status) {
            return Ok(());
        }
        task.status = status;
        self.store.update(task)
    }
}

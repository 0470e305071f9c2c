//! Events - キューの変更通知
//!
//! スケジューラは変更のたびに以下を NotificationSink へ送ります。
//! - QueueSnapshot: pending（ランク順）/ completed / current の全体像
//! - ProgressDelta: 1 タスクの progress 変化
//! - 完了したタスク本体
//!
//! トランスポート側でひとつの型として扱えるように `QueueEvent` にもまとめています。

use serde::{Deserialize, Serialize};

use super::{Task, TaskId, TaskStatus};

/// Full view of the queue after a mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    /// Pending tasks, highest effective priority first.
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub current: Option<Task>,
}

/// Progress change of a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDelta {
    pub task_id: TaskId,
    pub progress: u8,
}

/// Per-status task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    pub waiting: usize,
    pub processing: usize,
    pub completed: usize,
}

impl QueueSnapshot {
    pub fn counts(&self) -> QueueCounts {
        let mut counts = QueueCounts::default();
        for task in self.pending.iter().chain(self.completed.iter()) {
            match task.status {
                TaskStatus::Waiting => counts.waiting += 1,
                TaskStatus::Processing => counts.processing += 1,
                TaskStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }
}

/// One outbound notification, tagged the way push transports expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum QueueEvent {
    QueueUpdate(QueueSnapshot),
    TaskProgress(ProgressDelta),
    TaskCompleted { task: Task },
}

impl QueueEvent {
    pub fn name(&self) -> &'static str {
        match self {
            QueueEvent::QueueUpdate(_) => "queue_update",
            QueueEvent::TaskProgress(_) => "task_progress",
            QueueEvent::TaskCompleted { .. } => "task_completed",
        }
    }
}

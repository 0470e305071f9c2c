use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TaskId, TaskStatus};

/// Progress value at which a task is complete.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Effective priority reported for completed tasks; sorts below any pending task.
pub const COMPLETED_EFFECTIVE_PRIORITY: f64 = -1.0;

/// A queued unit of simulated work.
///
/// `id`, `name`, `priority` and `created_at` never change after creation.
/// `progress`, `status`, `effective_priority` and `completed_at` are written
/// by the scheduler only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub priority: u32,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub status: TaskStatus,
    pub effective_priority: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// New waiting task with zero progress.
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        priority: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            progress: 0,
            created_at,
            status: TaskStatus::Waiting,
            effective_priority: f64::from(priority),
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.progress < PROGRESS_COMPLETE
    }

    pub fn is_completed(&self) -> bool {
        !self.is_pending()
    }

    /// Add `increment` to progress, clamped to 100. Returns the new progress.
    pub fn advance(&mut self, increment: u8) -> u8 {
        self.progress = self
            .progress
            .saturating_add(increment)
            .min(PROGRESS_COMPLETE);
        self.progress
    }

    /// Terminal bookkeeping. `completed_at` is only stamped the first time.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.progress = PROGRESS_COMPLETE;
        self.status = TaskStatus::Completed;
        self.effective_priority = COMPLETED_EFFECTIVE_PRIORITY;
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
    }
}

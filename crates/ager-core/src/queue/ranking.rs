//! Aging ranker: effective priority and pending-queue ordering.

use chrono::{DateTime, Utc};

use crate::domain::{COMPLETED_EFFECTIVE_PRIORITY, Task};

/// Default divisor: 10000 waited seconds buy one priority point.
pub const DEFAULT_AGING_FACTOR: f64 = 10_000.0;

/// Computes effective priority from base priority plus waiting time.
///
/// effective = priority + floor(seconds since created_at) / aging_factor
///
/// Example with aging_factor = 10:
/// - priority 1, waited 0s: 1.0
/// - priority 1, waited 100s: 11.0
/// - priority 1, waited 105.9s: 11.5 (whole seconds only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgingRanker {
    aging_factor: f64,
}

impl AgingRanker {
    /// `aging_factor` must be positive; the builder validates this.
    pub fn new(aging_factor: f64) -> Self {
        Self { aging_factor }
    }

    /// Pure: the same task and `now` always give the same value.
    /// Completed tasks get the -1 sentinel so they never win a ranking.
    pub fn effective_priority(&self, task: &Task, now: DateTime<Utc>) -> f64 {
        if task.is_completed() {
            return COMPLETED_EFFECTIVE_PRIORITY;
        }
        // A clock stepping backwards must not lower the bonus below zero.
        let waited_secs = (now - task.created_at).num_seconds().max(0);
        f64::from(task.priority) + waited_secs as f64 / self.aging_factor
    }

    /// Refresh `effective_priority` on every task and sort them descending.
    ///
    /// The sort is stable, so tasks with equal effective priority keep the
    /// order they were given in (insertion order when fed from the store).
    pub fn rank(&self, mut tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<Task> {
        for task in &mut tasks {
            task.effective_priority = self.effective_priority(task, now);
        }
        tasks.sort_by(|a, b| b.effective_priority.total_cmp(&a.effective_priority));
        tasks
    }
}

impl Default for AgingRanker {
    fn default() -> Self {
        Self::new(DEFAULT_AGING_FACTOR)
    }
}

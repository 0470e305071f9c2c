//! InMemoryTaskStore - プロセス内のタスク正本
//!
//! # 実装詳細
//! - HashMap<TaskId, StoredTask> で保持
//! - 挿入ごとに単調増加の seq を振り、一覧は seq 順で返す
//!   （ランキングで同点のときに挿入順を保つため）
//! - ロックは持たない。スケジューラの Mutex の内側で使う前提

use std::collections::HashMap;

use crate::domain::{AgerError, Task, TaskId};
use crate::ports::TaskStore;

#[derive(Debug, Clone)]
struct StoredTask {
    seq: u64,
    task: Task,
}

/// InMemoryTaskStore は HashMap ベースの TaskStore
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    records: HashMap<TaskId, StoredTask>,
    next_seq: u64,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_where(&self, pred: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut matching: Vec<&StoredTask> = self
            .records
            .values()
            .filter(|stored| pred(&stored.task))
            .collect();
        matching.sort_by_key(|stored| stored.seq);
        matching.into_iter().map(|stored| stored.task.clone()).collect()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn insert(&mut self, task: Task) -> Result<(), AgerError> {
        if self.records.contains_key(&task.id) {
            return Err(AgerError::InternalInconsistency(format!(
                "duplicate task id {}",
                task.id
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.insert(task.id, StoredTask { seq, task });
        Ok(())
    }

    fn get(&self, id: &TaskId) -> Option<Task> {
        self.records.get(id).map(|stored| stored.task.clone())
    }

    fn update(&mut self, task: Task) -> Result<(), AgerError> {
        let Some(stored) = self.records.get_mut(&task.id) else {
            return Err(AgerError::NotFound(task.id));
        };
        stored.task = task;
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> Option<Task> {
        self.records.remove(id).map(|stored| stored.task)
    }

    fn list_pending(&self) -> Vec<Task> {
        self.collect_where(Task::is_pending)
    }

    fn list_completed(&self) -> Vec<Task> {
        self.collect_where(Task::is_completed)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

//! テスト用の TaskStore

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::{AgerError, Task, TaskId};
use crate::impls::InMemoryTaskStore;
use crate::ports::TaskStore;

/// In-memory store whose next `update` calls can be made to fail or panic.
#[derive(Clone, Default)]
pub(crate) struct FaultyStore {
    inner: Arc<Mutex<InMemoryTaskStore>>,
    passing_updates: Arc<AtomicUsize>,
    failing_updates: Arc<AtomicUsize>,
    panicking_updates: Arc<AtomicUsize>,
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl FaultyStore {
    /// Let `skip` updates through, then reject the following `n`.
    pub(crate) fn fail_updates(&self, skip: usize, n: usize) {
        self.passing_updates.store(skip, Ordering::SeqCst);
        self.failing_updates.store(n, Ordering::SeqCst);
    }

    pub(crate) fn panic_next_updates(&self, n: usize) {
        self.panicking_updates.store(n, Ordering::SeqCst);
    }
}

impl TaskStore for FaultyStore {
    fn insert(&mut self, task: Task) -> Result<(), AgerError> {
        self.inner.lock().unwrap().insert(task)
    }

    fn get(&self, id: &TaskId) -> Option<Task> {
        self.inner.lock().unwrap().get(id)
    }

    fn update(&mut self, task: Task) -> Result<(), AgerError> {
        // checked before locking so the inner mutex is never poisoned
        if take_one(&self.panicking_updates) {
            panic!("store update panicked for {}", task.id);
        }
        if !take_one(&self.passing_updates) && take_one(&self.failing_updates) {
            return Err(AgerError::InternalInconsistency(format!(
                "update rejected for {}",
                task.id
            )));
        }
        self.inner.lock().unwrap().update(task)
    }

    fn delete(&mut self, id: &TaskId) -> Option<Task> {
        self.inner.lock().unwrap().delete(id)
    }

    fn list_pending(&self) -> Vec<Task> {
        self.inner.lock().unwrap().list_pending()
    }

    fn list_completed(&self) -> Vec<Task> {
        self.inner.lock().unwrap().list_completed()
    }

    fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

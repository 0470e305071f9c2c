//! NotificationSink port - 変更通知の抽象化
//!
//! スケジューラはキューのロックを保持したまま sink を呼びます。
//! そのため同じ task に対する通知の順序は保存されますが、
//! 実装はブロックしてはいけません（channel への send 程度に留める）。
//!
//! # 実装
//! - NoopSink: 何もしない
//! - RecordingSink: 受け取ったイベントを記録（テスト用）
//! - BroadcastSink (ager-server): WebSocket 配信

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{ProgressDelta, QueueEvent, QueueSnapshot, Task};

/// NotificationSink はスケジューラからの通知を受け取る
pub trait NotificationSink: Send + Sync {
    fn snapshot(&self, snapshot: &QueueSnapshot);

    fn progress(&self, delta: &ProgressDelta);

    fn completed(&self, task: &Task);
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn snapshot(&self, snapshot: &QueueSnapshot) {
        (**self).snapshot(snapshot)
    }

    fn progress(&self, delta: &ProgressDelta) {
        (**self).progress(delta)
    }

    fn completed(&self, task: &Task) {
        (**self).completed(task)
    }
}

/// NoopSink は通知を捨てる
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn snapshot(&self, _snapshot: &QueueSnapshot) {}

    fn progress(&self, _delta: &ProgressDelta) {}

    fn completed(&self, _task: &Task) {}
}

/// RecordingSink は受け取った通知を順番に保持する
///
/// clone したハンドル同士で記録を共有します。
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<QueueEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<QueueEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 記録を取り出して空にする
    pub fn take(&self) -> Vec<QueueEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn snapshots(&self) -> Vec<QueueSnapshot> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                QueueEvent::QueueUpdate(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn progress_deltas(&self) -> Vec<ProgressDelta> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                QueueEvent::TaskProgress(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<Task> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                QueueEvent::TaskCompleted { task } => Some(task),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: QueueEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl NotificationSink for RecordingSink {
    fn snapshot(&self, snapshot: &QueueSnapshot) {
        self.push(QueueEvent::QueueUpdate(snapshot.clone()));
    }

    fn progress(&self, delta: &ProgressDelta) {
        self.push(QueueEvent::TaskProgress(*delta));
    }

    fn completed(&self, task: &Task) {
        self.push(QueueEvent::TaskCompleted { task: task.clone() });
    }
}

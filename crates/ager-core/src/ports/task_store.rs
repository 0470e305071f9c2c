//! TaskStore port - タスクの正本（source of truth）
//!
//! 純粋なデータ保持のみを担当し、通知や状態遷移の判断はしません。
//! 排他制御はスケジューラ側の Mutex が持つので、ここは同期 API です。

use crate::domain::{AgerError, Task, TaskId};

/// TaskStore は task id → Task の対応を保持
///
/// # 契約
/// - `insert` は既存 id に対しては `InternalInconsistency`
/// - `update` は存在しない id に対しては `NotFound`
/// - `delete` は存在しなくてもエラーにしない
/// - `list_pending` / `list_completed` は挿入順
pub trait TaskStore: Send {
    fn insert(&mut self, task: Task) -> Result<(), AgerError>;

    fn get(&self, id: &TaskId) -> Option<Task>;

    fn update(&mut self, task: Task) -> Result<(), AgerError>;

    fn delete(&mut self, id: &TaskId) -> Option<Task>;

    /// progress < 100 のタスク
    fn list_pending(&self) -> Vec<Task>;

    /// progress == 100 のタスク
    fn list_completed(&self) -> Vec<Task>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

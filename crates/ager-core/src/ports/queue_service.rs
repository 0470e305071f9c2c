//! QueueService port - リクエスト処理側から見たコアの境界
//!
//! HTTP ハンドラはこの trait だけに依存し、`Scheduler` の具体型を知りません。

use async_trait::async_trait;

use crate::domain::{AgerError, QueueSnapshot, Task};

/// QueueService はキューへの inbound 操作
#[async_trait]
pub trait QueueService: Send + Sync {
    /// 新しいタスクを投入（name は空白のみ不可）
    async fn submit(&self, name: String, priority: u32) -> Result<Task, AgerError>;

    /// pending タスクを実効優先度の降順で返す
    async fn list_pending(&self) -> Vec<Task>;

    async fn list_completed(&self) -> Vec<Task>;

    /// 完了済みタスクを全削除し、削除件数を返す
    async fn clear_completed(&self) -> Result<usize, AgerError>;

    async fn current(&self) -> Option<Task>;

    async fn snapshot(&self) -> QueueSnapshot;
}

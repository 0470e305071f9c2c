//! State - タスクの状態
//!
//! # 状態遷移
//! - Waiting -> Processing: スケジューラが先頭タスクとして選択
//! - Processing -> Waiting: より高い実効優先度のタスクに追い抜かれた
//! - Processing -> Completed: progress が 100 に到達（終端）

use serde::{Deserialize, Serialize};

/// TaskStatus はタスクの状態を表現
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 実行待ち
    Waiting,

    /// 現在スケジューラが進めているタスク（同時に高々 1 件）
    Processing,

    /// progress が 100 に到達した
    Completed,
}

impl TaskStatus {
    /// Is the transition `self -> next` allowed?
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Waiting, Processing) | (Processing, Waiting) | (Processing, Completed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Waiting, TaskStatus::Processing, true)]
    #[case(TaskStatus::Processing, TaskStatus::Waiting, true)]
    #[case(TaskStatus::Processing, TaskStatus::Completed, true)]
    #[case(TaskStatus::Completed, TaskStatus::Waiting, false)]
    #[case(TaskStatus::Completed, TaskStatus::Processing, false)]
    #[case(TaskStatus::Waiting, TaskStatus::Waiting, false)]
    #[case(TaskStatus::Waiting, TaskStatus::Completed, false)]
    fn transitions(#[case] from: TaskStatus, #[case] to: TaskStatus, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }
}

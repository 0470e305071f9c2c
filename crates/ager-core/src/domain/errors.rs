//! Errors - エラー型と分類
//!
//! どの操作もコア自身ではリトライしません。tick が失敗しても
//! ループは次の interval で再度 tick します。

use thiserror::Error;

use super::TaskId;

/// ErrorKind はエラーの運用上の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 呼び出し側の入力が不正（リトライ無意味）
    InvalidInput,
    /// 参照した task がストアに無い（ローカルで回復する）
    NotFound,
    /// プログラミングエラー（起きてはいけない）
    Internal,
}

/// AgerError はドメインエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl AgerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AgerError::InvalidInput(_) => ErrorKind::InvalidInput,
            AgerError::NotFound(_) => ErrorKind::NotFound,
            AgerError::InternalInconsistency(_) => ErrorKind::Internal,
        }
    }
}

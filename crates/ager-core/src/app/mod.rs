//! App - アプリケーション層
//!
//! ports を組み合わせてスケジューラを実装します。
//!
//! # 主要コンポーネント
//! - **SchedulerBuilder**: 設定の検証と port のワイヤリング
//! - **QueueCore**: 同期的な状態機械（submit / tick / clear）
//! - **Scheduler**: QueueCore を Mutex で共有し、QueueService を提供
//! - **TickLoop**: 一定間隔で tick を実行するバックグラウンドタスク

pub mod builder;
pub mod core;
pub mod scheduler;
pub mod tick_loop;

#[cfg(test)]
pub(crate) mod testing;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, SchedulerBuilder};
pub use self::core::{QueueCore, TickOutcome};
pub use self::scheduler::Scheduler;
pub use self::tick_loop::TickLoop;

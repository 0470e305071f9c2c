//! ager-core
//!
//! Core building blocks for the aging priority task queue.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, state, events, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, Clock, IdGenerator, NotificationSink, QueueService）
//! - **queue**: 判定ロジック（AgingRanker, ProgressIncrement）
//! - **app**: アプリケーションロジック（builder, core, scheduler, tick_loop）
//! - **impls**: 実装（InMemoryTaskStore）
//! - **config**: 環境変数からの設定読み込み

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod queue;

pub use app::{BuildError, Scheduler, SchedulerBuilder, TickOutcome};
pub use config::SchedulerConfig;
pub use domain::{AgerError, QueueEvent, QueueSnapshot, Task, TaskId, TaskStatus};
pub use ports::{NotificationSink, QueueService};

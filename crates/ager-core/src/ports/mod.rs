//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! スケジューラはこれらの trait にだけ依存し、時刻・ID・保存先・通知先を
//! 差し替えられるようにしています。

pub mod clock;
pub mod id_generator;
pub mod notification_sink;
pub mod queue_service;
pub mod task_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notification_sink::{NoopSink, NotificationSink, RecordingSink};
pub use self::queue_service::QueueService;
pub use self::task_store::TaskStore;

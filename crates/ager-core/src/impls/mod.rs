//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryTaskStore**: プロセス内の TaskStore（永続化なし）
//!
//! Clock / IdGenerator / NotificationSink の小さな実装は各 port と同じファイルに置いています。

pub mod inmem_store;

pub use self::inmem_store::InMemoryTaskStore;

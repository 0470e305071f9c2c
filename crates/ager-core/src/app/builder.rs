//! SchedulerBuilder - スケジューラの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 設定値の範囲チェックは build() 時に行い、BuildError を返す
//! - 差し替えなかった port はデフォルト実装（SystemClock, UlidGenerator,
//!   InMemoryTaskStore, NoopSink）で埋める

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{QueueCore, Scheduler};
use crate::config::SchedulerConfig;
use crate::domain::PROGRESS_COMPLETE;
use crate::impls::InMemoryTaskStore;
use crate::ports::{
    Clock, IdGenerator, NoopSink, NotificationSink, SystemClock, TaskStore, UlidGenerator,
};
use crate::queue::AgingRanker;

/// SchedulerBuilder はスケジューラを構築
///
/// # 使用例
/// ```ignore
/// let scheduler = SchedulerBuilder::new()
///     .config(SchedulerConfig::from_env())
///     .sink(my_sink)
///     .build()?;
/// scheduler.start().await;
/// ```
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    clock: Option<Arc<dyn Clock>>,
    store: Option<Box<dyn TaskStore>>,
    sink: Option<Arc<dyn NotificationSink>>,
    seed: Option<u64>,
}

/// BuildError は構築時の設定エラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("progress increment range is empty: min {min} > max {max}")]
    EmptyIncrementRange { min: u8, max: u8 },

    #[error("progress increment bounds must be within 1..=100, got {min}..={max}")]
    IncrementOutOfRange { min: u8, max: u8 },

    #[error("aging factor must be a positive finite number, got {0}")]
    InvalidAgingFactor(f64),

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            clock: None,
            store: None,
            sink: None,
            seed: None,
        }
    }

    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn store(mut self, store: Box<dyn TaskStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// 乱数のシードを固定（テスト用）。未指定ならエントロピーから初期化
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<(), BuildError> {
        let inc = self.config.increment;
        if inc.min > inc.max {
            return Err(BuildError::EmptyIncrementRange {
                min: inc.min,
                max: inc.max,
            });
        }
        if inc.min == 0 || inc.max > PROGRESS_COMPLETE {
            return Err(BuildError::IncrementOutOfRange {
                min: inc.min,
                max: inc.max,
            });
        }
        let factor = self.config.aging_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(BuildError::InvalidAgingFactor(factor));
        }
        if self.config.tick_interval.is_zero() {
            return Err(BuildError::ZeroTickInterval);
        }
        Ok(())
    }

    /// 同期的な状態機械だけを構築（ループ無し）
    pub fn build_core(self) -> Result<QueueCore, BuildError> {
        self.validate()?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let ids: Arc<dyn IdGenerator> = Arc::new(UlidGenerator::new(Arc::clone(&clock)));
        let store = self
            .store
            .unwrap_or_else(|| Box::new(InMemoryTaskStore::new()) as Box<dyn TaskStore>);
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(NoopSink) as Arc<dyn NotificationSink>);
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(QueueCore::new(
            store,
            AgingRanker::new(self.config.aging_factor),
            self.config.increment,
            rng,
            clock,
            ids,
            sink,
        ))
    }

    pub fn build(self) -> Result<Scheduler, BuildError> {
        let tick_interval = self.config.tick_interval;
        let core = self.build_core()?;
        Ok(Scheduler::new(core, tick_interval))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

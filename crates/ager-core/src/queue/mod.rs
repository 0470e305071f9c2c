//! Queue policies: aging-based ranking and progress increments.
//!
//! Both are pure "judgment logic"; the scheduler owns the state they act on.

mod increment;
mod ranking;

pub use increment::ProgressIncrement;
pub use ranking::{AgingRanker, DEFAULT_AGING_FACTOR};

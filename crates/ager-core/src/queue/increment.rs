//! Progress increment policy: how far one tick advances the current task.

use rand::Rng;

/// Closed integer range `[min, max]` a tick draws its progress step from.
///
/// Defaults to 10..=20, so an uncontested task completes in 5–10 ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressIncrement {
    pub min: u8,
    pub max: u8,
}

impl ProgressIncrement {
    pub const DEFAULT_MIN: u8 = 10;
    pub const DEFAULT_MAX: u8 = 20;

    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Always the same step. Handy for deterministic tests.
    pub fn fixed(step: u8) -> Self {
        Self::new(step, step)
    }

    /// Uniform draw from `[min, max]`. Callers guarantee `min <= max`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for ProgressIncrement {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

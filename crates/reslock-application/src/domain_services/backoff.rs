//! Exponential backoff with jitter

use std::time::Duration;

use rand::Rng;
use reslock_domain::constants::{BACKOFF_BASE_DELAY, BACKOFF_JITTER_RATIO, BACKOFF_MAX_DELAY};

/// Delay schedule between acquisition attempts
///
/// Starts at the base delay and doubles per attempt up to the cap. Each
/// delay is drawn uniformly from ±25 % around the nominal value, with the
/// upper bound cut at the cap, so capped delays spread over `[cap * 0.75, cap]`.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    jitter: f64,
    attempt: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(BACKOFF_BASE_DELAY, BACKOFF_MAX_DELAY, BACKOFF_JITTER_RATIO)
    }
}

impl Backoff {
    /// Create a schedule with explicit bounds
    pub fn new(base: Duration, max: Duration, jitter: f64) -> Self {
        Self {
            base,
            max: max.max(base),
            jitter: jitter.clamp(0.0, 1.0),
            attempt: 0,
        }
    }

    /// Un-jittered delay for the current attempt
    fn nominal(&self) -> Duration {
        let factor = 1u32.checked_shl(self.attempt.min(31)).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Delay before the next attempt, advancing the schedule
    pub fn next_delay(&mut self) -> Duration {
        let nominal = self.nominal();
        self.attempt = self.attempt.saturating_add(1);

        if self.jitter == 0.0 {
            return nominal;
        }
        let low = nominal.mul_f64(1.0 - self.jitter);
        let high = nominal.mul_f64(1.0 + self.jitter).min(self.max);
        if low >= high {
            return high;
        }
        rand::rng().random_range(low..=high)
    }

    /// Delay before the next attempt, never beyond `remaining`
    pub fn next_delay_within(&mut self, remaining: Option<Duration>) -> Duration {
        let delay = self.next_delay();
        match remaining {
            Some(remaining) => delay.min(remaining),
            None => delay,
        }
    }

    /// Number of delays handed out so far
    pub fn attempts(&self) -> u32 {
        self.attempt
    }
}

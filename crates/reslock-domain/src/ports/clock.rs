//! Clock Port

use chrono::Utc;

/// Source of Unix wall-clock time in milliseconds
///
/// Throttle windows are aligned to wall-clock boundaries so that every
/// process sharing a backend agrees on the current bucket.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// [`Clock`] backed by the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

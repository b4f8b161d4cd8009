//! Domain constants
//!
//! Defaults for lock and throttling behavior. Infrastructure configuration
//! types fall back to these values.

use std::time::Duration;

// ============================================================================
// LOCK PROVIDER DEFAULTS
// ============================================================================

/// Default key prefix applied to every lock record
pub const DEFAULT_LOCK_KEY_PREFIX: &str = "resource-lock:";

/// Default maximum resource name length
pub const DEFAULT_MAX_RESOURCE_NAME_LENGTH: usize = 1024;

/// Default cap on distinct resources with local waiters
pub const DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES: usize = 10_000;

/// Default cap on local waiters per resource
pub const DEFAULT_MAX_WAITERS_PER_RESOURCE: usize = 1_000;

/// Default lock lifetime (20 minutes)
pub const DEFAULT_TIME_UNTIL_EXPIRES: Duration = Duration::from_secs(20 * 60);

/// Default time spent retrying an acquisition (30 seconds)
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// RETRY AND BACKOFF
// ============================================================================

/// First wait between acquisition attempts
pub const BACKOFF_BASE_DELAY: Duration = Duration::from_millis(50);

/// Upper bound on the wait between acquisition attempts
pub const BACKOFF_MAX_DELAY: Duration = Duration::from_secs(3);

/// Jitter applied to each backoff delay, as a fraction of the delay
pub const BACKOFF_JITTER_RATIO: f64 = 0.25;

/// Attempts made to remove a lock record on release
pub const RELEASE_MAX_ATTEMPTS: u32 = 15;

/// Attempts made to refresh a lock record on renew
pub const RENEW_MAX_ATTEMPTS: u32 = 5;

/// Attempts made by read-only lock queries
pub const QUERY_MAX_ATTEMPTS: u32 = 5;

// ============================================================================
// THROTTLING DEFAULTS
// ============================================================================

/// Default key prefix applied to throttle window counters
pub const DEFAULT_THROTTLING_KEY_PREFIX: &str = "throttling-lock:";

/// Default permits granted per window
pub const DEFAULT_MAX_HITS_PER_PERIOD: u64 = 100;

/// Default window length (15 minutes)
pub const DEFAULT_THROTTLING_PERIOD: Duration = Duration::from_secs(15 * 60);

/// Consecutive storage errors tolerated by one throttled acquisition
pub const THROTTLING_MAX_STORAGE_ERRORS: u32 = 3;

/// Sleep used when the window boundary has already passed
pub const THROTTLING_FALLBACK_DELAY: Duration = Duration::from_millis(50);

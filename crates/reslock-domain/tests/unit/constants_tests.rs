//! Unit tests for domain defaults

use reslock_domain::constants::*;
use std::time::Duration;

#[test]
fn test_backoff_bounds_are_ordered() {
    assert!(BACKOFF_BASE_DELAY < BACKOFF_MAX_DELAY);
    assert!(BACKOFF_JITTER_RATIO > 0.0 && BACKOFF_JITTER_RATIO < 1.0);
}

#[test]
fn test_lock_defaults() {
    assert_eq!(DEFAULT_LOCK_KEY_PREFIX, "resource-lock:");
    assert_eq!(DEFAULT_TIME_UNTIL_EXPIRES, Duration::from_secs(1200));
    assert_eq!(DEFAULT_ACQUIRE_TIMEOUT, Duration::from_secs(30));
    assert_eq!(RELEASE_MAX_ATTEMPTS, 15);
}

#[test]
fn test_throttling_defaults() {
    assert_eq!(DEFAULT_THROTTLING_KEY_PREFIX, "throttling-lock:");
    assert_eq!(DEFAULT_MAX_HITS_PER_PERIOD, 100);
    assert_eq!(DEFAULT_THROTTLING_PERIOD, Duration::from_secs(900));
}

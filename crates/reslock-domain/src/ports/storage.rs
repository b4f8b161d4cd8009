//! Lock Storage Provider Port
//!
//! Port for key-value backends holding lock records and throttle counters.
//! Every conditional write must be atomic at the backend: two processes
//! racing `insert_if_absent` on the same key must see exactly one `true`.
//!
//! Keys passed here are already prefixed by the caller. A `ttl` of `None`
//! stores the record without expiry.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Atomic key-value operations used by the lock providers
#[async_trait]
pub trait LockStorageProvider: Send + Sync + std::fmt::Debug {
    /// Store `value` under `key` only if no live record exists
    ///
    /// Returns `true` when this call created the record.
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>)
    -> Result<bool>;

    /// Replace the record with `new_value` only if it currently equals `expected`
    ///
    /// The TTL is reset to `ttl`; `None` removes any expiry.
    async fn replace_if_equal(
        &self,
        key: &str,
        expected: &str,
        new_value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool>;

    /// Delete the record only if it currently equals `expected`
    async fn remove_if_equal(&self, key: &str, expected: &str) -> Result<bool>;

    /// Remaining lifetime of the record
    ///
    /// `None` when the record is missing or has no expiry.
    async fn get_expiration(&self, key: &str) -> Result<Option<Duration>>;

    /// Whether a live record exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Current value of the record
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// All live records whose key starts with `prefix`, keyed by full key
    async fn get_all_by_prefix(&self, prefix: &str) -> Result<HashMap<String, String>>;

    /// Number of live records whose key starts with `prefix`
    async fn get_count(&self, prefix: &str) -> Result<usize>;

    /// Atomically add `amount` to an integer counter, creating it at zero
    ///
    /// When `ttl` is given the counter's expiry is set to it. Returns the
    /// value after the increment.
    async fn increment(&self, key: &str, amount: i64, ttl: Option<Duration>) -> Result<i64>;

    /// Backend identifier
    fn provider_name(&self) -> &str;
}

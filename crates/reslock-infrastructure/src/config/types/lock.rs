//! Distributed lock configuration types

use reslock_application::use_cases::LockProviderOptions;
use reslock_domain::constants::{
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_LOCK_KEY_PREFIX, DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES,
    DEFAULT_MAX_RESOURCE_NAME_LENGTH, DEFAULT_MAX_WAITERS_PER_RESOURCE,
    DEFAULT_TIME_UNTIL_EXPIRES,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Distributed lock configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LockConfig {
    /// Prefix prepended to every lock key in storage
    pub key_prefix: String,

    /// Longest accepted resource name, in characters
    pub max_resource_name_length: usize,

    /// Cap on distinct resources with waiters in this process
    pub max_concurrent_waiting_resources: usize,

    /// Cap on waiters per resource in this process
    pub max_waiters_per_resource: usize,

    /// Lock lifetime when a caller does not pass one (seconds)
    pub default_time_until_expires_secs: u64,

    /// Acquire timeout when a caller does not pass one (milliseconds)
    pub default_acquire_timeout_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_LOCK_KEY_PREFIX.to_string(),
            max_resource_name_length: DEFAULT_MAX_RESOURCE_NAME_LENGTH,
            max_concurrent_waiting_resources: DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES,
            max_waiters_per_resource: DEFAULT_MAX_WAITERS_PER_RESOURCE,
            default_time_until_expires_secs: DEFAULT_TIME_UNTIL_EXPIRES.as_secs(),
            default_acquire_timeout_ms: u64::try_from(DEFAULT_ACQUIRE_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl From<&LockConfig> for LockProviderOptions {
    fn from(config: &LockConfig) -> Self {
        Self {
            key_prefix: config.key_prefix.clone(),
            max_resource_name_length: config.max_resource_name_length,
            max_concurrent_waiting_resources: config.max_concurrent_waiting_resources,
            max_waiters_per_resource: config.max_waiters_per_resource,
            default_time_until_expires: Duration::from_secs(
                config.default_time_until_expires_secs,
            ),
            default_acquire_timeout: Duration::from_millis(config.default_acquire_timeout_ms),
        }
    }
}

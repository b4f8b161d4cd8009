//! Throttling configuration types

use reslock_application::use_cases::ThrottlingOptions;
use reslock_domain::constants::{
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_HITS_PER_PERIOD, DEFAULT_MAX_RESOURCE_NAME_LENGTH,
    DEFAULT_THROTTLING_KEY_PREFIX, DEFAULT_THROTTLING_PERIOD,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Throttling lock configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThrottlingConfig {
    /// Prefix prepended to every window counter key
    pub key_prefix: String,

    /// Permits granted per window
    pub max_hits_per_period: u64,

    /// Window length (milliseconds)
    pub period_ms: u64,

    /// Acquire timeout when a caller does not pass one (milliseconds)
    pub default_acquire_timeout_ms: u64,

    /// Longest accepted resource name (characters)
    pub max_resource_name_length: usize,
}

impl Default for ThrottlingConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_THROTTLING_KEY_PREFIX.to_string(),
            max_hits_per_period: DEFAULT_MAX_HITS_PER_PERIOD,
            period_ms: u64::try_from(DEFAULT_THROTTLING_PERIOD.as_millis()).unwrap_or(u64::MAX),
            default_acquire_timeout_ms: u64::try_from(DEFAULT_ACQUIRE_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
            max_resource_name_length: DEFAULT_MAX_RESOURCE_NAME_LENGTH,
        }
    }
}

impl From<&ThrottlingConfig> for ThrottlingOptions {
    fn from(config: &ThrottlingConfig) -> Self {
        Self {
            key_prefix: config.key_prefix.clone(),
            max_hits_per_period: config.max_hits_per_period,
            period: Duration::from_millis(config.period_ms),
            default_acquire_timeout: Duration::from_millis(config.default_acquire_timeout_ms),
            max_resource_name_length: config.max_resource_name_length,
        }
    }
}

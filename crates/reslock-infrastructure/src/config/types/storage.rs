//! Lock storage configuration types

use crate::constants::DEFAULT_STORAGE_PROVIDER;
use reslock_application::ports::registry::StorageProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lock storage configuration
///
/// `provider` names an entry in the storage registry (`memory`, `redis`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Registered provider name
    pub provider: String,

    /// Connection URI, e.g. `redis://localhost:6379`
    pub uri: Option<String>,

    /// Provider-specific settings
    pub extra: BTreeMap<String, String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_STORAGE_PROVIDER.to_string(),
            uri: None,
            extra: BTreeMap::new(),
        }
    }
}

impl StorageConfig {
    /// Config for the in-process store
    pub fn memory() -> Self {
        Self::default()
    }

    /// Config for a Redis server
    pub fn redis(uri: impl Into<String>) -> Self {
        Self {
            provider: "redis".to_string(),
            uri: Some(uri.into()),
            ..Default::default()
        }
    }
}

impl From<&StorageConfig> for StorageProviderConfig {
    fn from(config: &StorageConfig) -> Self {
        let mut registry = StorageProviderConfig::new(&config.provider);
        if let Some(uri) = &config.uri {
            registry = registry.with_uri(uri);
        }
        for (key, value) in &config.extra {
            registry = registry.with_extra(key, value);
        }
        registry
    }
}

//! Application configuration root

use serde::{Deserialize, Serialize};

use super::{EventBusConfig, LockConfig, LoggingConfig, StorageConfig, ThrottlingConfig};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Logging output
    pub logging: LoggingConfig,

    /// Distributed lock provider
    pub lock: LockConfig,

    /// Throttling lock provider
    pub throttling: ThrottlingConfig,

    /// Lock storage backend
    pub storage: StorageConfig,

    /// Release event bus
    pub event_bus: EventBusConfig,
}

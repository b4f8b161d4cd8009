//! EventBus configuration types

use crate::constants::{DEFAULT_EVENT_BUS_CAPACITY, DEFAULT_NATS_CLIENT_NAME};
use reslock_providers::constants::EVENTS_NATS_DEFAULT_SUBJECT;
use serde::{Deserialize, Serialize};

/// EventBus provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventBusKind {
    /// In-process broadcast channel (Tokio)
    #[default]
    Tokio,
    /// Distributed message bus (NATS), for multi-process deployments
    Nats,
    /// Discards events; waiters fall back to polling
    Null,
}

/// EventBus configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EventBusConfig {
    /// EventBus provider to use
    pub provider: EventBusKind,

    /// Buffer capacity for the in-process bus.
    /// Slow subscribers miss the oldest events once it fills.
    pub capacity: usize,

    /// NATS server URL (for NATS provider)
    /// Example: "nats://localhost:4222"
    pub nats_url: Option<String>,

    /// NATS subject carrying lock events
    pub nats_subject: String,

    /// NATS client name (for NATS provider)
    pub nats_client_name: Option<String>,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            provider: EventBusKind::Tokio,
            capacity: DEFAULT_EVENT_BUS_CAPACITY,
            nats_url: None,
            nats_subject: EVENTS_NATS_DEFAULT_SUBJECT.to_string(),
            nats_client_name: Some(DEFAULT_NATS_CLIENT_NAME.to_string()),
        }
    }
}

impl EventBusConfig {
    /// Create config for Tokio broadcast (default)
    pub fn tokio() -> Self {
        Self::default()
    }

    /// Create config for NATS
    pub fn nats(url: impl Into<String>) -> Self {
        Self {
            provider: EventBusKind::Nats,
            nats_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create config for Null (polling only)
    pub fn null() -> Self {
        Self {
            provider: EventBusKind::Null,
            ..Default::default()
        }
    }
}

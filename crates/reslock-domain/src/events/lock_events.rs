//! Lock event payloads

use serde::{Deserialize, Serialize};

/// Events published by lock providers
///
/// Distributed event buses serialize these as JSON, so the wire shape is the
/// externally tagged serde representation:
/// `{"LockReleased":{"resource":"job:42","lock_id":"…"}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LockEvent {
    /// A lock record was removed by the holder of `lock_id`
    LockReleased {
        /// Resource name without the storage key prefix
        resource: String,
        /// Lock id of the released acquisition
        lock_id: String,
    },
}

impl LockEvent {
    /// Build a `LockReleased` event
    pub fn released(resource: impl Into<String>, lock_id: impl Into<String>) -> Self {
        Self::LockReleased {
            resource: resource.into(),
            lock_id: lock_id.into(),
        }
    }

    /// Resource the event refers to
    pub fn resource(&self) -> &str {
        match self {
            Self::LockReleased { resource, .. } => resource,
        }
    }
}

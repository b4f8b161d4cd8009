//! Null Event Bus Provider
//!
//! Discards published events and hands out streams that end immediately.
//! Lock waiters using it fall back to backoff polling.

use async_trait::async_trait;
use futures::stream;
use reslock_domain::error::Result;
use reslock_domain::events::LockEvent;
use reslock_domain::ports::{EventBusProvider, LockEventStream};
use std::sync::Arc;

/// Event bus that delivers nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventBusProvider;

impl NullEventBusProvider {
    pub fn new() -> Self {
        Self
    }

    /// Create as Arc for sharing
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl EventBusProvider for NullEventBusProvider {
    async fn publish_event(&self, _event: LockEvent) -> Result<()> {
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<LockEventStream> {
        Ok(Box::pin(stream::empty()))
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}

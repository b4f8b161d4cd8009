//! Event Bus Provider Port
//!
//! Defines the contract for lock event publish/subscribe services.
//!
//! ## Usage
//!
//! ```no_run
//! use reslock_domain::events::LockEvent;
//! use reslock_domain::ports::EventBusProvider;
//! use std::sync::Arc;
//!
//! async fn announce(bus: Arc<dyn EventBusProvider>) -> reslock_domain::Result<()> {
//!     bus.publish_event(LockEvent::released("job:42", "4f1c…")).await
//! }
//! ```

use crate::error::Result;
use crate::events::LockEvent;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Boxed async stream of lock events
pub type LockEventStream = Pin<Box<dyn Stream<Item = LockEvent> + Send + 'static>>;

/// Event bus provider interface for typed lock events
///
/// | Method | Purpose |
/// |--------|---------|
/// | `publish_event` | Publish a [`LockEvent`] to every subscriber |
/// | `subscribe_events` | Get a stream of [`LockEvent`] |
/// | `provider_name` | Backend identifier for logs |
#[async_trait]
pub trait EventBusProvider: Send + Sync + std::fmt::Debug {
    /// Publish a lock event
    async fn publish_event(&self, event: LockEvent) -> Result<()>;

    /// Subscribe to lock events
    ///
    /// Events published before the call are not replayed.
    async fn subscribe_events(&self) -> Result<LockEventStream>;

    /// Backend identifier
    fn provider_name(&self) -> &str;
}

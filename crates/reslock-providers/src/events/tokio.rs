//! Tokio Broadcast Event Bus Provider
//!
//! In-process event distribution over a tokio broadcast channel. Suitable
//! when every lock client shares one process, or as the local leg in tests.
//!
//! ## Example
//!
//! ```ignore
//! use reslock_providers::events::TokioEventBusProvider;
//!
//! let bus = TokioEventBusProvider::new();
//! let stream = bus.subscribe_events().await?;
//! bus.publish_event(LockEvent::released("job:42", lock_id)).await?;
//! ```

use async_trait::async_trait;
use futures::stream;
use reslock_domain::error::Result;
use reslock_domain::events::LockEvent;
use reslock_domain::ports::{EventBusProvider, LockEventStream};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::constants::EVENTS_TOKIO_DEFAULT_CAPACITY;

/// Event bus provider using tokio broadcast channels
///
/// When the channel is full the oldest events are dropped and lagging
/// subscribers log a warning. A missed release only delays a waiter until
/// its next poll.
#[derive(Clone)]
pub struct TokioEventBusProvider {
    sender: Arc<broadcast::Sender<LockEvent>>,
    capacity: usize,
}

impl TokioEventBusProvider {
    /// Create a new tokio event bus with default capacity (1024)
    pub fn new() -> Self {
        Self::with_capacity(EVENTS_TOKIO_DEFAULT_CAPACITY)
    }

    /// Create with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
            capacity,
        }
    }

    /// Get the current number of subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for TokioEventBusProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokioEventBusProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioEventBusProvider")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}

#[async_trait]
impl EventBusProvider for TokioEventBusProvider {
    async fn publish_event(&self, event: LockEvent) -> Result<()> {
        match self.sender.send(event) {
            Ok(count) => debug!("Published lock event to {} subscribers", count),
            Err(_) => debug!("Published lock event but no subscribers"),
        }
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<LockEventStream> {
        let receiver = self.sender.subscribe();

        let stream = stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Lock event stream lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &str {
        "tokio"
    }
}

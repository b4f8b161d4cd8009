//! NATS Event Bus Provider
//!
//! Distributed lock event delivery over NATS core pub/sub. Events are JSON
//! encoded [`LockEvent`] values on a single subject.
//!
//! ## Example
//!
//! ```ignore
//! use reslock_providers::events::NatsEventBusProvider;
//!
//! let bus = NatsEventBusProvider::new("nats://localhost:4222").await?;
//! let stream = bus.subscribe_events().await?;
//! ```

use async_nats::Client;
use async_trait::async_trait;
use futures::{StreamExt, stream};
use reslock_domain::error::{Error, Result};
use reslock_domain::events::LockEvent;
use reslock_domain::ports::{EventBusProvider, LockEventStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::constants::EVENTS_NATS_DEFAULT_SUBJECT;

/// Event bus provider using NATS for distributed systems
pub struct NatsEventBusProvider {
    client: Client,
    subject: String,
    /// Active subscriber count (local tracking only)
    subscriber_count: Arc<AtomicUsize>,
}

/// Decrements the local subscriber count when a stream is dropped
struct SubscriberGuard(Arc<AtomicUsize>);

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl NatsEventBusProvider {
    /// Connect using the default subject
    pub async fn new(url: &str) -> Result<Self> {
        Self::with_options(url, EVENTS_NATS_DEFAULT_SUBJECT, None).await
    }

    /// Connect with a custom subject and optional client name
    pub async fn with_options(url: &str, subject: &str, client_name: Option<&str>) -> Result<Self> {
        info!("Connecting to NATS server at {}", url);

        let mut options = async_nats::ConnectOptions::new();
        if let Some(name) = client_name {
            options = options.name(name);
        }

        let client = options.connect(url).await.map_err(|e| {
            Error::event_bus_with_source(format!("Failed to connect to NATS server at {url}"), e)
        })?;

        info!("Connected to NATS server at {}", url);

        Ok(Self {
            client,
            subject: subject.to_string(),
            subscriber_count: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Get the configured subject
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl std::fmt::Debug for NatsEventBusProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsEventBusProvider")
            .field("subject", &self.subject)
            .field("subscribers", &self.subscriber_count.load(Ordering::Acquire))
            .finish()
    }
}

#[async_trait]
impl EventBusProvider for NatsEventBusProvider {
    async fn publish_event(&self, event: LockEvent) -> Result<()> {
        let payload = serde_json::to_vec(&event)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await
            .map_err(|e| Error::event_bus_with_source("Failed to publish lock event to NATS", e))?;

        debug!("Published lock event to NATS subject '{}'", self.subject);
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<LockEventStream> {
        let subscriber = self
            .client
            .subscribe(self.subject.clone())
            .await
            .map_err(|e| {
                Error::event_bus_with_source(
                    format!("Failed to subscribe to NATS subject '{}'", self.subject),
                    e,
                )
            })?;

        self.subscriber_count.fetch_add(1, Ordering::AcqRel);
        let guard = SubscriberGuard(Arc::clone(&self.subscriber_count));

        let stream = stream::unfold((subscriber, guard), |(mut sub, guard)| async move {
            while let Some(msg) = sub.next().await {
                match serde_json::from_slice::<LockEvent>(&msg.payload) {
                    Ok(event) => return Some((event, (sub, guard))),
                    Err(e) => warn!("Skipping malformed NATS lock event: {}", e),
                }
            }
            None
        });

        Ok(Box::pin(stream))
    }

    fn provider_name(&self) -> &str {
        "nats"
    }
}

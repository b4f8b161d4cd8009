//! Event Bus Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | NullEventBusProvider | Polling | Discards all events |
//! | TokioEventBusProvider | In-Process | Tokio broadcast channels |
//! | NatsEventBusProvider | Distributed | NATS for multi-process systems |
//!
//! ## Provider Selection Guide
//!
//! - **Polling only**: `NullEventBusProvider`; waiters rely on backoff
//! - **Single Instance**: `TokioEventBusProvider`
//! - **Distributed**: `NatsEventBusProvider` alongside Redis storage

#[cfg(feature = "events-nats")]
pub mod nats;
pub mod null;
pub mod tokio;

#[cfg(feature = "events-nats")]
pub use nats::NatsEventBusProvider;
pub use null::NullEventBusProvider;
pub use tokio::TokioEventBusProvider;

pub use reslock_domain::events::LockEvent;
pub use reslock_domain::ports::{EventBusProvider, LockEventStream};

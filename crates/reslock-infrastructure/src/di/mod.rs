//! Composition root
//!
//! Turns an [`AppConfig`](crate::config::AppConfig) into ready-to-use lock
//! providers. Storage backends come from the linkme registry; the event bus
//! is picked from the configured kind.

pub mod bootstrap;
pub mod provider_resolvers;

pub use bootstrap::*;
pub use provider_resolvers::{EventBusProviderResolver, StorageProviderResolver};

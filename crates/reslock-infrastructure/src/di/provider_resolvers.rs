//! Provider Resolvers
//!
//! ```text
//! AppConfig → Resolver → linkme registry / event bus kind → Arc<dyn Provider>
//! ```

use crate::config::{AppConfig, EventBusConfig, EventBusKind};
use crate::error_ext::registry_error;
use reslock_application::ports::registry::{
    StorageProviderConfig, list_storage_providers, resolve_storage_provider,
};
use reslock_domain::error::Result;
use reslock_domain::ports::{EventBusProvider, LockStorageProvider};
use reslock_providers::events::{NullEventBusProvider, TokioEventBusProvider};
use std::sync::Arc;
use tracing::info;

// ============================================================================
// Storage Provider Resolver
// ============================================================================

/// Resolves lock storage backends by name from the linkme registry
pub struct StorageProviderResolver {
    config: Arc<AppConfig>,
}

impl StorageProviderResolver {
    /// Create a new resolver with config
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Resolve provider from current application config
    pub fn resolve_from_config(&self) -> Result<Arc<dyn LockStorageProvider>> {
        let registry_config = StorageProviderConfig::from(&self.config.storage);
        self.resolve_from_override(&registry_config)
    }

    /// Resolve provider from an explicit registry config
    pub fn resolve_from_override(
        &self,
        override_config: &StorageProviderConfig,
    ) -> Result<Arc<dyn LockStorageProvider>> {
        let storage = resolve_storage_provider(override_config)
            .map_err(|message| registry_error(&override_config.provider, message))?;
        info!(provider = storage.provider_name(), "Lock storage resolved");
        Ok(storage)
    }

    /// List available storage providers
    pub fn list_available(&self) -> Vec<(&'static str, &'static str)> {
        list_storage_providers()
    }
}

impl std::fmt::Debug for StorageProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageProviderResolver")
            .field("provider", &self.config.storage.provider)
            .finish()
    }
}

// ============================================================================
// Event Bus Provider Resolver
// ============================================================================

/// Builds the release event bus for the configured kind
pub struct EventBusProviderResolver {
    config: Arc<AppConfig>,
}

impl EventBusProviderResolver {
    /// Create a new resolver with config
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }

    /// Resolve provider from current application config
    pub async fn resolve_from_config(&self) -> Result<Arc<dyn EventBusProvider>> {
        resolve_event_bus(&self.config.event_bus).await
    }
}

impl std::fmt::Debug for EventBusProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBusProviderResolver")
            .field("provider", &self.config.event_bus.provider)
            .finish()
    }
}

async fn resolve_event_bus(config: &EventBusConfig) -> Result<Arc<dyn EventBusProvider>> {
    let bus: Arc<dyn EventBusProvider> = match config.provider {
        EventBusKind::Tokio => Arc::new(TokioEventBusProvider::with_capacity(config.capacity)),
        EventBusKind::Null => NullEventBusProvider::new_shared(),
        EventBusKind::Nats => connect_nats(config).await?,
    };
    info!(provider = bus.provider_name(), "Event bus resolved");
    Ok(bus)
}

#[cfg(feature = "events-nats")]
async fn connect_nats(config: &EventBusConfig) -> Result<Arc<dyn EventBusProvider>> {
    use reslock_domain::error::Error;
    use reslock_providers::events::NatsEventBusProvider;

    let url = config
        .nats_url
        .as_deref()
        .ok_or_else(|| Error::configuration("NATS URL is required for the nats event bus"))?;
    let bus = NatsEventBusProvider::with_options(
        url,
        &config.nats_subject,
        config.nats_client_name.as_deref(),
    )
    .await?;
    Ok(Arc::new(bus))
}

#[cfg(not(feature = "events-nats"))]
async fn connect_nats(_config: &EventBusConfig) -> Result<Arc<dyn EventBusProvider>> {
    Err(reslock_domain::error::Error::configuration(
        "The nats event bus requires the `events-nats` feature",
    ))
}

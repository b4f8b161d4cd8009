//! Application bootstrap
//!
//! Builds one [`DistributedLockProvider`] and one [`ThrottlingLockProvider`]
//! over a shared storage backend and event bus.
//!
//! ```text
//! AppConfig → StorageProviderResolver  ─┐
//!           → EventBusProviderResolver ─┴→ AppContext { lock, throttling }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! let context = init_app(config).await?;
//!
//! if let Some(handle) = context
//!     .lock_provider()
//!     .try_acquire("orders:42", AcquireOptions::new())
//!     .await?
//! {
//!     // ...
//!     handle.release().await?;
//! }
//! context.shutdown();
//! ```

use crate::config::AppConfig;
use crate::config::loader::validate_app_config;
use crate::di::provider_resolvers::{EventBusProviderResolver, StorageProviderResolver};
use reslock_application::use_cases::{
    DistributedLockProvider, LockProviderOptions, ThrottlingLockProvider, ThrottlingOptions,
};
use reslock_domain::error::Result;
use reslock_domain::ports::{EventBusProvider, LockStorageProvider};
use std::sync::Arc;
use tracing::info;

/// Application context holding the configured providers
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    storage: Arc<dyn LockStorageProvider>,
    event_bus: Arc<dyn EventBusProvider>,
    lock_provider: DistributedLockProvider,
    throttling_provider: ThrottlingLockProvider,
}

impl AppContext {
    /// Assemble a context from already-built providers
    pub fn from_parts(
        config: AppConfig,
        storage: Arc<dyn LockStorageProvider>,
        event_bus: Arc<dyn EventBusProvider>,
    ) -> Result<Self> {
        let lock_provider = DistributedLockProvider::new(
            Arc::clone(&storage),
            Arc::clone(&event_bus),
            LockProviderOptions::from(&config.lock),
        );
        let throttling_provider = ThrottlingLockProvider::new(
            Arc::clone(&storage),
            ThrottlingOptions::from(&config.throttling),
        )?;

        Ok(Self {
            config: Arc::new(config),
            storage,
            event_bus,
            lock_provider,
            throttling_provider,
        })
    }

    /// Shared lock storage backend
    pub fn storage(&self) -> Arc<dyn LockStorageProvider> {
        Arc::clone(&self.storage)
    }

    /// Release event bus
    pub fn event_bus(&self) -> Arc<dyn EventBusProvider> {
        Arc::clone(&self.event_bus)
    }

    /// Distributed mutex provider
    pub fn lock_provider(&self) -> &DistributedLockProvider {
        &self.lock_provider
    }

    /// Fixed-window throttling provider
    pub fn throttling_provider(&self) -> &ThrottlingLockProvider {
        &self.throttling_provider
    }

    /// Wake every local waiter and drop their wait entries
    ///
    /// Waiters still inside `try_acquire` fall back to polling until their
    /// timeout. Held locks are not released.
    pub fn shutdown(&self) {
        let waiting = self.lock_provider.wait_coordinator().waiting_resources();
        self.lock_provider.wait_coordinator().clear();
        info!(waiting_resources = waiting, "Lock providers shut down");
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("storage", &self.storage.provider_name())
            .field("event_bus", &self.event_bus.provider_name())
            .field("lock_provider", &self.lock_provider)
            .field("throttling_provider", &self.throttling_provider)
            .finish_non_exhaustive()
    }
}

/// Build the application context from configuration
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    validate_app_config(&config)?;
    let shared = Arc::new(config);

    let storage = StorageProviderResolver::new(Arc::clone(&shared)).resolve_from_config()?;
    let event_bus = EventBusProviderResolver::new(Arc::clone(&shared))
        .resolve_from_config()
        .await?;

    let config = Arc::unwrap_or_clone(shared);
    let context = AppContext::from_parts(config, storage, event_bus)?;
    info!(
        storage = context.storage.provider_name(),
        event_bus = context.event_bus.provider_name(),
        "Application context initialized"
    );
    Ok(context)
}

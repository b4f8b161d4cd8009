//! Storage Provider Registry

use std::collections::HashMap;
use std::sync::Arc;

use reslock_domain::ports::LockStorageProvider;

/// Configuration for storage provider creation
///
/// Providers use what they need and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct StorageProviderConfig {
    /// Provider name (e.g., "memory", "redis")
    pub provider: String,
    /// Connection URI (for distributed backends)
    pub uri: Option<String>,
    /// Additional provider-specific configuration
    pub extra: HashMap<String, String>,
}

impl StorageProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Add extra configuration
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for storage providers
pub struct StorageProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&StorageProviderConfig) -> Result<Arc<dyn LockStorageProvider>, String>,
}

#[linkme::distributed_slice]
pub static STORAGE_PROVIDERS: [StorageProviderEntry] = [..];

/// Resolve storage provider by name from registry
///
/// # Returns
/// * `Ok(Arc<dyn LockStorageProvider>)` - Created provider instance
/// * `Err(String)` - Error message if provider not found or creation failed
pub fn resolve_storage_provider(
    config: &StorageProviderConfig,
) -> Result<Arc<dyn LockStorageProvider>, String> {
    let provider_name = &config.provider;

    for entry in STORAGE_PROVIDERS {
        if entry.name == provider_name {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = STORAGE_PROVIDERS.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown storage provider '{provider_name}'. Available providers: {available:?}"
    ))
}

/// List all registered storage providers as (name, description) pairs
pub fn list_storage_providers() -> Vec<(&'static str, &'static str)> {
    STORAGE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}

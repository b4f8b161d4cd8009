//! Composition root

use reslock_application::ports::registry::StorageProviderConfig;
use reslock_application::{AcquireOptions, LockProvider};
use reslock_domain::error::Error;
use reslock_infrastructure::config::{AppConfig, EventBusConfig, StorageConfig};
use reslock_infrastructure::di::{AppContext, StorageProviderResolver, init_app};
use reslock_providers::events::NullEventBusProvider;
use reslock_providers::storage::MemoryLockStorage;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_default_context_uses_memory_and_tokio() {
    let context = init_app(AppConfig::default()).await.unwrap();
    assert_eq!(context.storage().provider_name(), "memory");
    assert_eq!(context.event_bus().provider_name(), "tokio");

    let handle = context
        .lock_provider()
        .try_acquire("orders:42", AcquireOptions::no_wait())
        .await
        .unwrap()
        .expect("free resource");

    // Records land under the configured prefix in the shared storage
    assert!(context.storage().exists("resource-lock:orders:42").await.unwrap());
    handle.release().await.unwrap();
    assert!(!context.storage().exists("resource-lock:orders:42").await.unwrap());
}

#[tokio::test]
async fn test_providers_follow_config() {
    let mut config = AppConfig::default();
    config.lock.key_prefix = "app-lock:".to_string();
    config.throttling.max_hits_per_period = 1;
    config.throttling.period_ms = 60_000;
    config.event_bus = EventBusConfig::null();

    let context = init_app(config).await.unwrap();
    assert_eq!(context.event_bus().provider_name(), "null");
    assert_eq!(context.lock_provider().options().key_prefix, "app-lock:");
    assert_eq!(
        context.throttling_provider().options().period,
        Duration::from_secs(60)
    );

    let throttle = context.throttling_provider();
    assert!(
        throttle
            .try_acquire("reports", AcquireOptions::no_wait())
            .await
            .unwrap()
            .is_some()
    );
    assert!(
        throttle
            .try_acquire("reports", AcquireOptions::no_wait())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_unknown_storage_provider_fails() {
    let config = AppConfig {
        storage: StorageConfig {
            provider: "etcd".to_string(),
            ..StorageConfig::default()
        },
        ..AppConfig::default()
    };

    let err = init_app(config).await.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("etcd"));
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_resolving() {
    let mut config = AppConfig::default();
    config.lock.max_concurrent_waiting_resources = 0;
    assert!(matches!(
        init_app(config).await,
        Err(Error::Configuration { .. })
    ));
}

#[cfg(not(feature = "events-nats"))]
#[tokio::test]
async fn test_nats_requires_feature() {
    let config = AppConfig {
        event_bus: EventBusConfig::nats("nats://localhost:4222"),
        ..AppConfig::default()
    };
    assert!(matches!(
        init_app(config).await,
        Err(Error::Configuration { .. })
    ));
}

#[tokio::test]
async fn test_shutdown_wakes_and_clears_waiters() {
    let context = AppContext::from_parts(
        AppConfig::default(),
        Arc::new(MemoryLockStorage::new()),
        NullEventBusProvider::new_shared(),
    )
    .unwrap();
    let provider = context.lock_provider().clone();

    let holder = provider
        .try_acquire("batch", AcquireOptions::no_wait())
        .await
        .unwrap()
        .expect("free resource");

    let waiter = tokio::spawn({
        let provider = provider.clone();
        async move {
            provider
                .try_acquire(
                    "batch",
                    AcquireOptions::new().with_acquire_timeout(Duration::from_millis(300)),
                )
                .await
        }
    });

    while provider.wait_coordinator().waiter_count("batch") == 0 {
        tokio::task::yield_now().await;
    }
    context.shutdown();
    assert_eq!(provider.wait_coordinator().waiting_resources(), 0);

    // The waiter keeps polling and times out while the lock is held
    assert!(waiter.await.unwrap().unwrap().is_none());
    holder.release().await.unwrap();
}

#[test]
fn test_resolver_lists_and_resolves_memory() {
    let resolver = StorageProviderResolver::new(Arc::new(AppConfig::default()));
    let available = resolver.list_available();
    assert!(available.iter().any(|(name, _)| *name == "memory"));

    let storage = resolver
        .resolve_from_override(&StorageProviderConfig::new("memory"))
        .unwrap();
    assert_eq!(storage.provider_name(), "memory");

    assert!(
        resolver
            .resolve_from_override(&StorageProviderConfig::new("missing"))
            .is_err()
    );
}

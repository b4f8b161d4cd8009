//! Tests for storage provider auto-registration

use reslock_application::ports::registry::{
    StorageProviderConfig, list_storage_providers, resolve_storage_provider,
};

#[test]
fn test_memory_provider_is_registered() {
    let names: Vec<_> = list_storage_providers()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert!(names.contains(&"memory"), "registered: {names:?}");
}

#[test]
fn test_resolve_memory_provider() {
    let storage = resolve_storage_provider(&StorageProviderConfig::new("memory")).unwrap();
    assert_eq!(storage.provider_name(), "memory");
}

#[test]
fn test_unknown_provider_lists_alternatives() {
    let err = resolve_storage_provider(&StorageProviderConfig::new("etcd")).unwrap_err();
    assert!(err.contains("etcd"));
    assert!(err.contains("memory"));
}

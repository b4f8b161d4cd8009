//! Tests for the in-memory lock storage

use reslock_domain::ports::LockStorageProvider;
use reslock_providers::storage::MemoryLockStorage;
use std::time::Duration;

#[tokio::test]
async fn test_insert_is_exclusive() {
    let storage = MemoryLockStorage::new();
    assert!(storage.insert_if_absent("job:42", "a", None).await.unwrap());
    assert!(!storage.insert_if_absent("job:42", "b", None).await.unwrap());
    assert_eq!(storage.get("job:42").await.unwrap().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_compare_and_swap_requires_matching_value() {
    let storage = MemoryLockStorage::new();
    storage.insert_if_absent("job:42", "a", None).await.unwrap();

    assert!(!storage.replace_if_equal("job:42", "stale", "b", None).await.unwrap());
    assert!(!storage.remove_if_equal("job:42", "stale").await.unwrap());
    assert!(storage.exists("job:42").await.unwrap());

    assert!(storage.remove_if_equal("job:42", "a").await.unwrap());
    assert!(!storage.exists("job:42").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_replace_resets_expiration() {
    let storage = MemoryLockStorage::new();
    storage
        .insert_if_absent("job:42", "a", Some(Duration::from_secs(60)))
        .await
        .unwrap();
    assert!(
        storage
            .replace_if_equal("job:42", "a", "a", Some(Duration::from_secs(600)))
            .await
            .unwrap()
    );
    assert_eq!(
        storage.get_expiration("job:42").await.unwrap(),
        Some(Duration::from_secs(600))
    );

    assert!(storage.replace_if_equal("job:42", "a", "a", None).await.unwrap());
    assert_eq!(storage.get_expiration("job:42").await.unwrap(), None);
    assert!(storage.exists("job:42").await.unwrap());
}

#[tokio::test]
async fn test_prefix_queries_only_see_matching_keys() {
    let storage = MemoryLockStorage::new();
    storage.insert_if_absent("lock:a", "1", None).await.unwrap();
    storage.insert_if_absent("lock:b", "2", None).await.unwrap();
    storage.insert_if_absent("throttle:a", "3", None).await.unwrap();

    let locks = storage.get_all_by_prefix("lock:").await.unwrap();
    assert_eq!(locks.len(), 2);
    assert_eq!(locks.get("lock:b").map(String::as_str), Some("2"));
    assert_eq!(storage.get_count("throttle:").await.unwrap(), 1);
    assert_eq!(storage.get_count("").await.unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_increment_creates_and_expires_counters() {
    let storage = MemoryLockStorage::new();
    let ttl = Some(Duration::from_secs(1));
    assert_eq!(storage.increment("hits", 1, ttl).await.unwrap(), 1);
    assert_eq!(storage.increment("hits", 2, ttl).await.unwrap(), 3);

    tokio::time::advance(Duration::from_millis(1001)).await;
    assert_eq!(storage.get("hits").await.unwrap(), None);
    assert_eq!(storage.increment("hits", 1, ttl).await.unwrap(), 1);
}

#[tokio::test]
async fn test_clones_share_records() {
    let storage = MemoryLockStorage::new();
    let clone = storage.clone();
    storage.insert_if_absent("k", "v", None).await.unwrap();
    assert!(clone.exists("k").await.unwrap());
    assert_eq!(clone.provider_name(), "memory");
}

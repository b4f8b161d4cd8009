//! Tests for the Redis lock storage
//!
//! Require a Redis server at `REDIS_URL` (default `redis://localhost:6379`).

use reslock_domain::ports::LockStorageProvider;
use reslock_domain::value_objects::LockId;
use reslock_providers::storage::RedisLockStorage;
use std::time::Duration;

fn storage() -> RedisLockStorage {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    RedisLockStorage::new(&url).unwrap()
}

fn unique_prefix() -> String {
    format!("reslock-test:{}:", LockId::generate())
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_lock_record_lifecycle() {
    let storage = storage();
    let key = format!("{}job", unique_prefix());

    assert!(
        storage
            .insert_if_absent(&key, "a", Some(Duration::from_secs(30)))
            .await
            .unwrap()
    );
    assert!(!storage.insert_if_absent(&key, "b", None).await.unwrap());

    let ttl = storage.get_expiration(&key).await.unwrap().unwrap();
    assert!(ttl <= Duration::from_secs(30) && ttl > Duration::from_secs(25));

    assert!(storage.replace_if_equal(&key, "a", "a", None).await.unwrap());
    assert_eq!(storage.get_expiration(&key).await.unwrap(), None);

    assert!(!storage.remove_if_equal(&key, "b").await.unwrap());
    assert!(storage.remove_if_equal(&key, "a").await.unwrap());
    assert!(!storage.exists(&key).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_prefix_scan_and_counters() {
    let storage = storage();
    let prefix = unique_prefix();
    for i in 0..3 {
        storage
            .insert_if_absent(&format!("{prefix}{i}"), "v", Some(Duration::from_secs(30)))
            .await
            .unwrap();
    }
    assert_eq!(storage.get_count(&prefix).await.unwrap(), 3);
    assert_eq!(storage.get_all_by_prefix(&prefix).await.unwrap().len(), 3);

    let counter = format!("{prefix}hits");
    let ttl = Some(Duration::from_secs(5));
    assert_eq!(storage.increment(&counter, 1, ttl).await.unwrap(), 1);
    assert_eq!(storage.increment(&counter, 1, ttl).await.unwrap(), 2);
    assert!(storage.get_expiration(&counter).await.unwrap().is_some());
}

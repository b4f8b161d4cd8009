//! Shared fixtures for application tests

use async_trait::async_trait;
use reslock_application::{DistributedLockProvider, LockProviderOptions};
use reslock_domain::error::{Error, Result};
use reslock_domain::events::LockEvent;
use reslock_domain::ports::{Clock, EventBusProvider, LockEventStream, LockStorageProvider};
use reslock_providers::events::{NullEventBusProvider, TokioEventBusProvider};
use reslock_providers::storage::MemoryLockStorage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Memory storage that counts successful removals and records inserted values
#[derive(Debug, Default)]
pub struct CountingStorage {
    inner: MemoryLockStorage,
    pub removals: AtomicUsize,
    inserted: Mutex<Vec<String>>,
}

impl CountingStorage {
    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }

    /// Values passed to `insert_if_absent`, in call order
    pub fn inserted(&self) -> Vec<String> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LockStorageProvider for CountingStorage {
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<bool> {
        self.inserted.lock().unwrap().push(value.to_string());
        self.inner.insert_if_absent(key, value, ttl).await
    }

    async fn replace_if_equal(
        &self,
        key: &str,
        expected: &str,
        new_value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.inner.replace_if_equal(key, expected, new_value, ttl).await
    }

    async fn remove_if_equal(&self, key: &str, expected: &str) -> Result<bool> {
        let removed = self.inner.remove_if_equal(key, expected).await?;
        if removed {
            self.removals.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }

    async fn get_expiration(&self, key: &str) -> Result<Option<Duration>> {
        self.inner.get_expiration(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn get_all_by_prefix(&self, prefix: &str) -> Result<HashMap<String, String>> {
        self.inner.get_all_by_prefix(prefix).await
    }

    async fn get_count(&self, prefix: &str) -> Result<usize> {
        self.inner.get_count(prefix).await
    }

    async fn increment(&self, key: &str, amount: i64, ttl: Option<Duration>) -> Result<i64> {
        self.inner.increment(key, amount, ttl).await
    }

    fn provider_name(&self) -> &str {
        "counting"
    }
}

/// Memory storage where one key vanishes as soon as its expiration is read
///
/// Stands in for a lock that expires between a listing scan and the
/// follow-up expiration lookup.
#[derive(Debug)]
pub struct VanishingStorage {
    pub inner: MemoryLockStorage,
    vanishing_suffix: String,
}

impl VanishingStorage {
    pub fn new(vanishing_suffix: &str) -> Self {
        Self {
            inner: MemoryLockStorage::new(),
            vanishing_suffix: vanishing_suffix.to_string(),
        }
    }
}

#[async_trait]
impl LockStorageProvider for VanishingStorage {
    async fn insert_if_absent(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<bool> {
        self.inner.insert_if_absent(key, value, ttl).await
    }

    async fn replace_if_equal(
        &self,
        key: &str,
        expected: &str,
        new_value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.inner.replace_if_equal(key, expected, new_value, ttl).await
    }

    async fn remove_if_equal(&self, key: &str, expected: &str) -> Result<bool> {
        self.inner.remove_if_equal(key, expected).await
    }

    async fn get_expiration(&self, key: &str) -> Result<Option<Duration>> {
        if key.ends_with(&self.vanishing_suffix) {
            if let Some(value) = self.inner.get(key).await? {
                self.inner.remove_if_equal(key, &value).await?;
            }
            return Ok(None);
        }
        self.inner.get_expiration(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(key).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn get_all_by_prefix(&self, prefix: &str) -> Result<HashMap<String, String>> {
        self.inner.get_all_by_prefix(prefix).await
    }

    async fn get_count(&self, prefix: &str) -> Result<usize> {
        self.inner.get_count(prefix).await
    }

    async fn increment(&self, key: &str, amount: i64, ttl: Option<Duration>) -> Result<i64> {
        self.inner.increment(key, amount, ttl).await
    }

    fn provider_name(&self) -> &str {
        "vanishing"
    }
}

/// Event bus whose subscriptions end immediately, counting subscribe calls
#[derive(Debug, Default)]
pub struct EndedEventBus {
    subscriptions: AtomicUsize,
}

impl EndedEventBus {
    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventBusProvider for EndedEventBus {
    async fn publish_event(&self, _event: LockEvent) -> Result<()> {
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<LockEventStream> {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::pin(futures::stream::empty::<LockEvent>()))
    }

    fn provider_name(&self) -> &str {
        "ended"
    }
}

/// Storage whose every operation fails with a transient error
#[derive(Debug, Default)]
pub struct FailingStorage {
    pub calls: AtomicUsize,
}

impl FailingStorage {
    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::storage("backend unavailable"))
    }
}

#[async_trait]
impl LockStorageProvider for FailingStorage {
    async fn insert_if_absent(&self, _: &str, _: &str, _: Option<Duration>) -> Result<bool> {
        self.fail()
    }

    async fn replace_if_equal(&self, _: &str, _: &str, _: &str, _: Option<Duration>) -> Result<bool> {
        self.fail()
    }

    async fn remove_if_equal(&self, _: &str, _: &str) -> Result<bool> {
        self.fail()
    }

    async fn get_expiration(&self, _: &str) -> Result<Option<Duration>> {
        self.fail()
    }

    async fn exists(&self, _: &str) -> Result<bool> {
        self.fail()
    }

    async fn get(&self, _: &str) -> Result<Option<String>> {
        self.fail()
    }

    async fn get_all_by_prefix(&self, _: &str) -> Result<HashMap<String, String>> {
        self.fail()
    }

    async fn get_count(&self, _: &str) -> Result<usize> {
        self.fail()
    }

    async fn increment(&self, _: &str, _: i64, _: Option<Duration>) -> Result<i64> {
        self.fail()
    }

    fn provider_name(&self) -> &str {
        "failing"
    }
}

/// Wall clock that follows tokio's (possibly paused) clock
#[derive(Debug)]
pub struct TokioClock {
    origin: Instant,
    origin_ms: i64,
}

impl TokioClock {
    /// Clock starting at `origin_ms` Unix milliseconds
    pub fn starting_at(origin_ms: i64) -> Self {
        Self {
            origin: Instant::now(),
            origin_ms,
        }
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        self.origin_ms + i64::try_from(self.origin.elapsed().as_millis()).unwrap()
    }
}

pub fn memory_provider() -> DistributedLockProvider {
    DistributedLockProvider::new(
        Arc::new(MemoryLockStorage::new()),
        Arc::new(NullEventBusProvider::new()),
        LockProviderOptions::default(),
    )
}

/// Two providers sharing storage and an event bus, as two processes would
pub fn provider_pair() -> (DistributedLockProvider, DistributedLockProvider) {
    let storage: Arc<dyn LockStorageProvider> = Arc::new(MemoryLockStorage::new());
    let bus: Arc<dyn EventBusProvider> = Arc::new(TokioEventBusProvider::new());
    (
        DistributedLockProvider::new(
            Arc::clone(&storage),
            Arc::clone(&bus),
            LockProviderOptions::default(),
        ),
        DistributedLockProvider::new(storage, bus, LockProviderOptions::default()),
    )
}

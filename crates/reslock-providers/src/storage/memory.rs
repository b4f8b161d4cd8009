//! In-memory lock storage
//!
//! Records live in a `DashMap` and expire on `tokio::time::Instant`, so
//! tests running on a paused tokio clock see TTLs elapse deterministically.
//! Expired records are dropped lazily when touched, or in bulk through
//! [`MemoryLockStorage::purge_expired`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use reslock_domain::error::{Error, Result};
use reslock_domain::ports::LockStorageProvider;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct Record {
    value: String,
    expires_at: Option<Instant>,
}

impl Record {
    fn new(value: impl Into<String>, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value: value.into(),
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Lock storage held in process memory
#[derive(Clone, Default)]
pub struct MemoryLockStorage {
    records: Arc<DashMap<String, Record>>,
}

impl MemoryLockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired record, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.records.len();
        self.records.retain(|_, record| record.is_live(now));
        let purged = before.saturating_sub(self.records.len());
        if purged > 0 {
            debug!(purged, "Purged expired lock records");
        }
        purged
    }

    /// Number of stored records, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn live_records<'a>(
        &'a self,
        prefix: &'a str,
        now: Instant,
    ) -> impl Iterator<Item = (String, String)> + 'a {
        self.records.iter().filter_map(move |entry| {
            (entry.key().starts_with(prefix) && entry.value().is_live(now))
                .then(|| (entry.key().clone(), entry.value().value.clone()))
        })
    }
}

impl std::fmt::Debug for MemoryLockStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLockStorage")
            .field("records", &self.records.len())
            .finish()
    }
}

#[async_trait]
impl LockStorageProvider for MemoryLockStorage {
    async fn insert_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let now = Instant::now();
        match self.records.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    return Ok(false);
                }
                occupied.insert(Record::new(value, ttl, now));
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Record::new(value, ttl, now));
                Ok(true)
            }
        }
    }

    async fn replace_if_equal(
        &self,
        key: &str,
        expected: &str,
        new_value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let now = Instant::now();
        match self.records.get_mut(key) {
            Some(mut record) if record.is_live(now) && record.value == expected => {
                *record = Record::new(new_value, ttl, now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_if_equal(&self, key: &str, expected: &str) -> Result<bool> {
        let now = Instant::now();
        let removed = self
            .records
            .remove_if(key, |_, record| record.is_live(now) && record.value == expected);
        if removed.is_none() {
            self.records.remove_if(key, |_, record| !record.is_live(now));
        }
        Ok(removed.is_some())
    }

    async fn get_expiration(&self, key: &str) -> Result<Option<Duration>> {
        let now = Instant::now();
        Ok(self.records.get(key).and_then(|record| {
            if record.is_live(now) {
                record.expires_at.map(|at| at.saturating_duration_since(now))
            } else {
                None
            }
        }))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .records
            .get(key)
            .is_some_and(|record| record.is_live(now)))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        Ok(self
            .records
            .get(key)
            .filter(|record| record.is_live(now))
            .map(|record| record.value.clone()))
    }

    async fn get_all_by_prefix(&self, prefix: &str) -> Result<HashMap<String, String>> {
        Ok(self.live_records(prefix, Instant::now()).collect())
    }

    async fn get_count(&self, prefix: &str) -> Result<usize> {
        Ok(self.live_records(prefix, Instant::now()).count())
    }

    async fn increment(&self, key: &str, amount: i64, ttl: Option<Duration>) -> Result<i64> {
        let now = Instant::now();
        match self.records.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().is_live(now) => {
                let record = occupied.get_mut();
                let current: i64 = record.value.parse().map_err(|e| {
                    Error::storage_with_source(format!("value at '{key}' is not an integer"), e)
                })?;
                let next = current.checked_add(amount).ok_or_else(|| {
                    Error::storage(format!("increment of '{key}' overflowed"))
                })?;
                record.value = next.to_string();
                if let Some(ttl) = ttl {
                    record.expires_at = now.checked_add(ttl);
                }
                Ok(next)
            }
            Entry::Occupied(mut occupied) => {
                occupied.insert(Record::new(amount.to_string(), ttl, now));
                Ok(amount)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Record::new(amount.to_string(), ttl, now));
                Ok(amount)
            }
        }
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use reslock_application::ports::registry::{
    STORAGE_PROVIDERS, StorageProviderConfig, StorageProviderEntry,
};

#[linkme::distributed_slice(STORAGE_PROVIDERS)]
static MEMORY_PROVIDER: StorageProviderEntry = StorageProviderEntry {
    name: "memory",
    description: "In-process lock storage (single instance only)",
    factory: |_config: &StorageProviderConfig| Ok(Arc::new(MemoryLockStorage::new())),
};

//! Key prefixing storage adapter
//!
//! Wraps any [`LockStorageProvider`] so callers deal in bare resource names
//! while the backend sees `prefix + resource`. Keys coming back out of
//! prefix scans are stripped again.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reslock_domain::error::Result;
use reslock_domain::ports::LockStorageProvider;

/// Storage adapter that confines all keys to one prefix
#[derive(Clone)]
pub struct ScopedLockStorage {
    inner: Arc<dyn LockStorageProvider>,
    prefix: String,
}

impl ScopedLockStorage {
    /// Scope `inner` under `prefix`
    pub fn new(inner: Arc<dyn LockStorageProvider>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn unscoped_key<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }
}

impl fmt::Debug for ScopedLockStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedLockStorage")
            .field("prefix", &self.prefix)
            .field("inner", &self.inner.provider_name())
            .finish()
    }
}

#[async_trait]
impl LockStorageProvider for ScopedLockStorage {
    async fn insert_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.inner
            .insert_if_absent(&self.scoped_key(key), value, ttl)
            .await
    }

    async fn replace_if_equal(
        &self,
        key: &str,
        expected: &str,
        new_value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        self.inner
            .replace_if_equal(&self.scoped_key(key), expected, new_value, ttl)
            .await
    }

    async fn remove_if_equal(&self, key: &str, expected: &str) -> Result<bool> {
        self.inner
            .remove_if_equal(&self.scoped_key(key), expected)
            .await
    }

    async fn get_expiration(&self, key: &str) -> Result<Option<Duration>> {
        self.inner.get_expiration(&self.scoped_key(key)).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.inner.exists(&self.scoped_key(key)).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(&self.scoped_key(key)).await
    }

    async fn get_all_by_prefix(&self, prefix: &str) -> Result<HashMap<String, String>> {
        let records = self
            .inner
            .get_all_by_prefix(&self.scoped_key(prefix))
            .await?;
        Ok(records
            .into_iter()
            .map(|(key, value)| (self.unscoped_key(&key).to_string(), value))
            .collect())
    }

    async fn get_count(&self, prefix: &str) -> Result<usize> {
        self.inner.get_count(&self.scoped_key(prefix)).await
    }

    async fn increment(&self, key: &str, amount: i64, ttl: Option<Duration>) -> Result<i64> {
        self.inner
            .increment(&self.scoped_key(key), amount, ttl)
            .await
    }

    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

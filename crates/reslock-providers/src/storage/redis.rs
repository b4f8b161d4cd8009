//! Redis lock storage
//!
//! Lock records are plain string keys. Conditional writes are atomic on the
//! server: inserts use `SET NX PX`, compare-and-swap operations run as Lua
//! scripts. Scans walk the keyspace with a `SCAN MATCH` cursor and fetch
//! values with `MGET`.
//!
//! ## Example
//!
//! ```ignore
//! use reslock_providers::storage::RedisLockStorage;
//!
//! let storage = RedisLockStorage::new("redis://localhost:6379")?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{Client, Script, aio::MultiplexedConnection};
use reslock_domain::error::{Error, Result};
use reslock_domain::ports::LockStorageProvider;
use tracing::info;

use crate::constants::{REDIS_DEFAULT_URL, REDIS_SCAN_BATCH_SIZE};

/// Replace the value (and TTL) only when the current value matches.
/// ARGV: expected, new value, ttl in ms or "" for none.
const REPLACE_IF_EQUAL_SCRIPT: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    if ARGV[3] ~= '' then
        redis.call('SET', KEYS[1], ARGV[2], 'PX', ARGV[3])
    else
        redis.call('SET', KEYS[1], ARGV[2])
    end
    return 1
end
return 0
";

const REMOVE_IF_EQUAL_SCRIPT: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
";

/// ARGV: amount, ttl in ms or "" to keep the current expiry.
const INCREMENT_SCRIPT: &str = r"
local value = redis.call('INCRBY', KEYS[1], ARGV[1])
if ARGV[2] ~= '' then
    redis.call('PEXPIRE', KEYS[1], ARGV[2])
end
return value
";

/// Redis-backed lock storage
#[derive(Clone)]
pub struct RedisLockStorage {
    client: Client,
    replace_script: Arc<Script>,
    remove_script: Arc<Script>,
    increment_script: Arc<Script>,
}

impl RedisLockStorage {
    /// Create a storage for the given connection URL
    ///
    /// No connection is made until the first operation.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string)
            .map_err(|e| Error::storage_with_source("Failed to create Redis client", e))?;
        info!("Redis lock storage configured");

        Ok(Self {
            client,
            replace_script: Arc::new(Script::new(REPLACE_IF_EQUAL_SCRIPT)),
            remove_script: Arc::new(Script::new(REMOVE_IF_EQUAL_SCRIPT)),
            increment_script: Arc::new(Script::new(INCREMENT_SCRIPT)),
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::storage_with_source("Failed to get Redis connection", e))
    }

    /// Scan keys matching `prefix*`
    async fn scan_prefix(
        &self,
        conn: &mut MultiplexedConnection,
        prefix: &str,
    ) -> Result<Vec<String>> {
        let pattern = format!("{}*", escape_glob(prefix));
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_BATCH_SIZE)
                .query_async(conn)
                .await
                .map_err(|e| Error::storage_with_source("Redis SCAN failed", e))?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

/// Escape glob metacharacters so a prefix matches literally in `SCAN MATCH`
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// TTL argument for scripts; `""` means no expiry
fn ttl_arg(ttl: Option<Duration>) -> String {
    ttl.map(|ttl| ttl_millis(ttl).to_string()).unwrap_or_default()
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl LockStorageProvider for RedisLockStorage {
    async fn insert_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX");
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(ttl_millis(ttl));
        }
        let reply: Option<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis SET NX failed", e))?;
        Ok(reply.is_some())
    }

    async fn replace_if_equal(
        &self,
        key: &str,
        expected: &str,
        new_value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let replaced: i64 = self
            .replace_script
            .key(key)
            .arg(expected)
            .arg(new_value)
            .arg(ttl_arg(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis replace script failed", e))?;
        Ok(replaced == 1)
    }

    async fn remove_if_equal(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let removed: i64 = self
            .remove_script
            .key(key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis remove script failed", e))?;
        Ok(removed > 0)
    }

    async fn get_expiration(&self, key: &str) -> Result<Option<Duration>> {
        let mut conn = self.get_connection().await?;
        let pttl: i64 = redis::cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis PTTL failed", e))?;
        // -2: missing, -1: no expiry
        Ok(u64::try_from(pttl).ok().map(Duration::from_millis))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let count: i64 = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis EXISTS failed", e))?;
        Ok(count > 0)
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis GET failed", e))
    }

    async fn get_all_by_prefix(&self, prefix: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.get_connection().await?;
        let keys = self.scan_prefix(&mut conn, prefix).await?;

        let mut records = HashMap::with_capacity(keys.len());
        for chunk in keys.chunks(REDIS_SCAN_BATCH_SIZE) {
            let values: Vec<Option<String>> = redis::cmd("MGET")
                .arg(chunk)
                .query_async(&mut conn)
                .await
                .map_err(|e| Error::storage_with_source("Redis MGET failed", e))?;
            // Keys that expired between SCAN and MGET come back as nil.
            records.extend(
                chunk
                    .iter()
                    .zip(values)
                    .filter_map(|(key, value)| value.map(|v| (key.clone(), v))),
            );
        }
        Ok(records)
    }

    async fn get_count(&self, prefix: &str) -> Result<usize> {
        let mut conn = self.get_connection().await?;
        Ok(self.scan_prefix(&mut conn, prefix).await?.len())
    }

    async fn increment(&self, key: &str, amount: i64, ttl: Option<Duration>) -> Result<i64> {
        let mut conn = self.get_connection().await?;
        self.increment_script
            .key(key)
            .arg(amount)
            .arg(ttl_arg(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Error::storage_with_source("Redis increment script failed", e))
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisLockStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLockStorage")
            .field("provider", &self.provider_name())
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use reslock_application::ports::registry::{
    STORAGE_PROVIDERS, StorageProviderConfig, StorageProviderEntry,
};

fn redis_storage_factory(
    config: &StorageProviderConfig,
) -> std::result::Result<Arc<dyn LockStorageProvider>, String> {
    let uri = config
        .uri
        .clone()
        .unwrap_or_else(|| REDIS_DEFAULT_URL.to_string());

    let storage =
        RedisLockStorage::new(&uri).map_err(|e| format!("Failed to create Redis storage: {e}"))?;

    Ok(Arc::new(storage))
}

#[linkme::distributed_slice(STORAGE_PROVIDERS)]
static REDIS_PROVIDER: StorageProviderEntry = StorageProviderEntry {
    name: "redis",
    description: "Redis distributed lock storage",
    factory: redis_storage_factory,
};

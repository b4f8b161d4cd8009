//! Throttling Lock Provider Use Case
//!
//! Fixed-window rate limiter expressed as a lock provider: each successful
//! `try_acquire` consumes one of `max_hits_per_period` permits in the current
//! wall-clock window. Windows are aligned to multiples of the period since
//! the Unix epoch, so every process sharing the backend counts into the same
//! bucket. Counters expire with their window.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reslock_domain::constants::{
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_HITS_PER_PERIOD, DEFAULT_MAX_RESOURCE_NAME_LENGTH,
    DEFAULT_THROTTLING_KEY_PREFIX, DEFAULT_THROTTLING_PERIOD, QUERY_MAX_ATTEMPTS, THROTTLING_FALLBACK_DELAY,
    THROTTLING_MAX_STORAGE_ERRORS,
};
use reslock_domain::error::{Error, Result};
use reslock_domain::ports::{Clock, LockStorageProvider, SystemClock};
use reslock_domain::value_objects::{LockId, TimeLimit};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain_services::{ScopedLockStorage, retry_transient};
use crate::ports::{AcquireOptions, LockProvider};
use crate::use_cases::LockHandle;

/// Runtime options for [`ThrottlingLockProvider`]
#[derive(Debug, Clone)]
pub struct ThrottlingOptions {
    /// Prefix prepended to every window counter key
    pub key_prefix: String,
    /// Permits granted per window
    pub max_hits_per_period: u64,
    /// Window length
    pub period: Duration,
    /// Acquire timeout used when a call does not specify one
    pub default_acquire_timeout: Duration,
    /// Longest accepted resource name, in characters
    pub max_resource_name_length: usize,
}

impl Default for ThrottlingOptions {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_THROTTLING_KEY_PREFIX.to_string(),
            max_hits_per_period: DEFAULT_MAX_HITS_PER_PERIOD,
            period: DEFAULT_THROTTLING_PERIOD,
            default_acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            max_resource_name_length: DEFAULT_MAX_RESOURCE_NAME_LENGTH,
        }
    }
}

/// Current window of a throttled resource
#[derive(Debug, Clone, PartialEq, Eq)]
struct Window {
    key: String,
    /// Unix milliseconds at which the window closes
    end_ms: i64,
}

struct Inner {
    storage: ScopedLockStorage,
    clock: Arc<dyn Clock>,
    options: ThrottlingOptions,
    period_ms: i64,
}

/// Fixed-window rate limiter over a shared storage backend
#[derive(Clone)]
pub struct ThrottlingLockProvider {
    inner: Arc<Inner>,
}

impl fmt::Debug for ThrottlingLockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrottlingLockProvider")
            .field("storage", &self.inner.storage)
            .field("max_hits_per_period", &self.inner.options.max_hits_per_period)
            .field("period", &self.inner.options.period)
            .finish()
    }
}

impl ThrottlingLockProvider {
    /// Create a provider using the system clock
    pub fn new(storage: Arc<dyn LockStorageProvider>, options: ThrottlingOptions) -> Result<Self> {
        Self::with_clock(storage, Arc::new(SystemClock), options)
    }

    /// Create a provider reading wall-clock time from `clock`
    pub fn with_clock(
        storage: Arc<dyn LockStorageProvider>,
        clock: Arc<dyn Clock>,
        options: ThrottlingOptions,
    ) -> Result<Self> {
        if options.max_hits_per_period == 0 {
            return Err(Error::invalid_argument(
                "max_hits_per_period must be greater than zero",
            ));
        }
        let period_ms = i64::try_from(options.period.as_millis()).unwrap_or(i64::MAX);
        if period_ms < 1 {
            return Err(Error::invalid_argument(
                "throttling period must be at least one millisecond",
            ));
        }
        Ok(Self {
            inner: Arc::new(Inner {
                storage: ScopedLockStorage::new(storage, options.key_prefix.clone()),
                clock,
                options,
                period_ms,
            }),
        })
    }

    pub fn options(&self) -> &ThrottlingOptions {
        &self.inner.options
    }

    fn validate_resource(&self, resource: &str) -> Result<()> {
        if resource.is_empty() {
            return Err(Error::invalid_argument("resource must not be empty"));
        }
        let length = resource.chars().count();
        let max = self.inner.options.max_resource_name_length;
        if length > max {
            return Err(Error::invalid_argument(format!(
                "resource name is {length} characters long (max {max})"
            )));
        }
        Ok(())
    }

    fn window(&self, resource: &str, now_ms: i64) -> Window {
        let start_ms = now_ms - now_ms.rem_euclid(self.inner.period_ms);
        Window {
            key: format!("{resource}:{start_ms}"),
            end_ms: start_ms.saturating_add(self.inner.period_ms),
        }
    }

    fn max_hits(&self) -> u64 {
        self.inner.options.max_hits_per_period
    }

    async fn read_count(&self, key: &str) -> Result<u64> {
        match self.inner.storage.get(key).await? {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::storage_with_source(format!("invalid throttle counter at '{key}'"), e)
            }),
            None => Ok(0),
        }
    }

    /// Try to take one permit in the current window
    async fn try_hit(&self, resource: &str) -> Result<bool> {
        let now_ms = self.inner.clock.now_millis();
        let window = self.window(resource, now_ms);

        if self.read_count(&window.key).await? >= self.max_hits() {
            return Ok(false);
        }

        let remaining_ms = u64::try_from(window.end_ms - now_ms).unwrap_or(0).max(1);
        let hits = self
            .inner
            .storage
            .increment(&window.key, 1, Some(Duration::from_millis(remaining_ms)))
            .await?;
        let granted = u64::try_from(hits).is_ok_and(|h| h <= self.max_hits());
        if !granted {
            debug!(resource, hits, "Throttle window filled by a concurrent caller");
        }
        Ok(granted)
    }

    /// Time until the next window opens, as seen now
    fn delay_until_next_window(&self, resource: &str) -> Duration {
        let now_ms = self.inner.clock.now_millis();
        let window = self.window(resource, now_ms);
        match u64::try_from(window.end_ms + 1 - now_ms) {
            Ok(ms) if ms > 0 => Duration::from_millis(ms),
            _ => THROTTLING_FALLBACK_DELAY,
        }
    }

    /// Permits already taken in the current window of `resource`
    pub async fn current_hits(&self, resource: &str) -> Result<u64> {
        self.validate_resource(resource)?;
        let window = self.window(resource, self.inner.clock.now_millis());
        retry_transient("current_hits", QUERY_MAX_ATTEMPTS, None, || {
            self.read_count(&window.key)
        })
        .await
    }
}

#[async_trait]
impl LockProvider for ThrottlingLockProvider {
    async fn try_acquire(
        &self,
        resource: &str,
        options: AcquireOptions,
    ) -> Result<Option<LockHandle>> {
        self.validate_resource(resource)?;
        let timeout = options
            .acquire_timeout
            .unwrap_or(TimeLimit::Finite(self.inner.options.default_acquire_timeout));
        let cancel = options.cancellation.unwrap_or_default();

        let started = Instant::now();
        let deadline = timeout.as_duration().and_then(|d| started.checked_add(d));
        let mut consecutive_errors = 0u32;

        loop {
            if cancel.is_cancelled() {
                info!(resource, "Throttled acquisition cancelled");
                return Ok(None);
            }

            let delay = match self.try_hit(resource).await {
                Ok(true) => {
                    let waited = started.elapsed();
                    debug!(resource, "Throttle permit granted");
                    return Ok(Some(LockHandle::new(
                        resource,
                        LockId::generate().as_str(),
                        waited,
                        Arc::new(self.clone()),
                    )));
                }
                Ok(false) => {
                    consecutive_errors = 0;
                    self.delay_until_next_window(resource)
                }
                Err(e) => {
                    consecutive_errors += 1;
                    if consecutive_errors >= THROTTLING_MAX_STORAGE_ERRORS {
                        error!(
                            resource,
                            errors = consecutive_errors,
                            error = %e,
                            "Giving up throttled acquisition after repeated storage errors"
                        );
                        return Ok(None);
                    }
                    warn!(resource, error = %e, "Throttle storage error, retrying");
                    THROTTLING_FALLBACK_DELAY
                }
            };

            let delay = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!(resource, "Timed out waiting for throttle permit");
                        return Ok(None);
                    }
                    delay.min(deadline - now)
                }
                None => delay,
            };

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = cancel.cancelled() => {
                    info!(resource, "Throttled acquisition cancelled");
                    return Ok(None);
                }
            }
        }
    }

    /// Permits are not returned; the window counter only expires.
    async fn release(
        &self,
        _resource: &str,
        _lock_id: &str,
        _cancellation: Option<CancellationToken>,
    ) -> Result<()> {
        Ok(())
    }

    async fn renew(
        &self,
        _resource: &str,
        _lock_id: &str,
        _time_until_expires: Option<TimeLimit>,
    ) -> Result<bool> {
        Ok(true)
    }

    /// Whether the current window has no permits left
    async fn is_locked(&self, resource: &str) -> Result<bool> {
        Ok(self.current_hits(resource).await? >= self.max_hits())
    }
}

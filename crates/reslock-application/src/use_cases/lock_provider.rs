//! Distributed Lock Provider Use Case
//!
//! Mutual exclusion over a shared [`LockStorageProvider`]. A lock is a
//! storage record keyed by the prefixed resource name whose value is the
//! holder's lock id; only the holder of that id may renew or remove it.
//!
//! Contending callers retry with jittered exponential backoff. Waiters in
//! this process share a per-resource signal in the [`WaitCoordinator`] that
//! is fired by local releases and by `LockReleased` events arriving from the
//! event bus, so a release usually wakes the next waiter long before its
//! backoff delay runs out. Without a working event bus the providers fall
//! back to polling.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reslock_domain::constants::{
    DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_LOCK_KEY_PREFIX, DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES,
    DEFAULT_MAX_RESOURCE_NAME_LENGTH, DEFAULT_MAX_WAITERS_PER_RESOURCE,
    DEFAULT_TIME_UNTIL_EXPIRES, QUERY_MAX_ATTEMPTS, RELEASE_MAX_ATTEMPTS, RENEW_MAX_ATTEMPTS,
};
use reslock_domain::error::{Error, Result};
use reslock_domain::events::LockEvent;
use reslock_domain::ports::{EventBusProvider, LockStorageProvider};
use reslock_domain::value_objects::{LockId, LockInfo, TimeLimit};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain_services::{Backoff, ScopedLockStorage, WaitCoordinator, retry_transient};
use crate::ports::{AcquireOptions, LockProvider};
use crate::use_cases::LockHandle;

// ============================================================================
// OPTIONS
// ============================================================================

/// Runtime options for [`DistributedLockProvider`]
#[derive(Debug, Clone)]
pub struct LockProviderOptions {
    /// Prefix prepended to every resource name in storage
    pub key_prefix: String,
    /// Longest accepted resource name, in characters
    pub max_resource_name_length: usize,
    /// Cap on distinct resources with local waiters
    pub max_concurrent_waiting_resources: usize,
    /// Cap on local waiters per resource
    pub max_waiters_per_resource: usize,
    /// Lock lifetime used when a call does not specify one
    pub default_time_until_expires: Duration,
    /// Acquire timeout used when a call does not specify one
    pub default_acquire_timeout: Duration,
}

impl Default for LockProviderOptions {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_LOCK_KEY_PREFIX.to_string(),
            max_resource_name_length: DEFAULT_MAX_RESOURCE_NAME_LENGTH,
            max_concurrent_waiting_resources: DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES,
            max_waiters_per_resource: DEFAULT_MAX_WAITERS_PER_RESOURCE,
            default_time_until_expires: DEFAULT_TIME_UNTIL_EXPIRES,
            default_acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

// ============================================================================
// PROVIDER
// ============================================================================

/// Aborts the release-event forwarder when the provider goes away
struct SubscriptionTask(JoinHandle<()>);

impl SubscriptionTask {
    fn is_running(&self) -> bool {
        !self.0.is_finished()
    }
}

impl Drop for SubscriptionTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

struct Inner {
    storage: ScopedLockStorage,
    event_bus: Arc<dyn EventBusProvider>,
    coordinator: Arc<WaitCoordinator>,
    options: LockProviderOptions,
    subscription: Mutex<Option<SubscriptionTask>>,
}

/// Distributed mutex over a shared storage backend
///
/// Cheap to clone; clones share storage, event subscription and waiters.
#[derive(Clone)]
pub struct DistributedLockProvider {
    inner: Arc<Inner>,
}

impl fmt::Debug for DistributedLockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistributedLockProvider")
            .field("storage", &self.inner.storage)
            .field("event_bus", &self.inner.event_bus.provider_name())
            .field("coordinator", &self.inner.coordinator)
            .field(
                "subscribed",
                &self
                    .inner
                    .subscription
                    .try_lock()
                    .is_ok_and(|task| task.as_ref().is_some_and(SubscriptionTask::is_running)),
            )
            .finish()
    }
}

impl DistributedLockProvider {
    /// Create a provider over `storage`, announcing releases on `event_bus`
    pub fn new(
        storage: Arc<dyn LockStorageProvider>,
        event_bus: Arc<dyn EventBusProvider>,
        options: LockProviderOptions,
    ) -> Self {
        let coordinator = Arc::new(WaitCoordinator::new(
            options.max_concurrent_waiting_resources,
            options.max_waiters_per_resource,
        ));
        Self::with_coordinator(storage, event_bus, coordinator, options)
    }

    /// Create a provider sharing an existing [`WaitCoordinator`]
    pub fn with_coordinator(
        storage: Arc<dyn LockStorageProvider>,
        event_bus: Arc<dyn EventBusProvider>,
        coordinator: Arc<WaitCoordinator>,
        options: LockProviderOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage: ScopedLockStorage::new(storage, options.key_prefix.clone()),
                event_bus,
                coordinator,
                options,
                subscription: Mutex::new(None),
            }),
        }
    }

    /// Local waiter registry, for inspection and teardown
    pub fn wait_coordinator(&self) -> &Arc<WaitCoordinator> {
        &self.inner.coordinator
    }

    pub fn options(&self) -> &LockProviderOptions {
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

    fn resolve_ttl(&self, time_until_expires: Option<TimeLimit>) -> Result<Option<Duration>> {
        time_until_expires
            .unwrap_or(TimeLimit::Finite(self.inner.options.default_time_until_expires))
            .to_ttl()
    }

    /// One insert attempt under `lock_id`
    async fn attempt(
        &self,
        resource: &str,
        lock_id: &LockId,
        ttl: Option<Duration>,
        started: Instant,
    ) -> Option<LockHandle> {
        match self
            .inner
            .storage
            .insert_if_absent(resource, lock_id.as_str(), ttl)
            .await
        {
            Ok(true) => {
                let waited = started.elapsed();
                debug!(
                    resource,
                    lock_id = %lock_id,
                    waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                    "Lock acquired"
                );
                Some(LockHandle::new(
                    resource,
                    lock_id.as_str(),
                    waited,
                    Arc::new(self.clone()),
                ))
            }
            Ok(false) => None,
            Err(e) => {
                warn!(resource, error = %e, "Lock acquisition attempt failed");
                None
            }
        }
    }

    /// Start forwarding release events to the wait coordinator
    ///
    /// Subscribes on first use and again whenever the previous event stream
    /// has ended. A failed subscription is retried by the next wait.
    async fn ensure_subscription(&self) {
        let mut subscription = self.inner.subscription.lock().await;
        match subscription.as_ref() {
            Some(task) if task.is_running() => return,
            Some(_) => debug!(
                event_bus = self.inner.event_bus.provider_name(),
                "Resubscribing to lock release events"
            ),
            None => {}
        }

        match self.inner.event_bus.subscribe_events().await {
            Ok(mut events) => {
                let coordinator = Arc::clone(&self.inner.coordinator);
                let event_bus = self.inner.event_bus.provider_name().to_string();
                let handle = tokio::spawn(async move {
                    while let Some(event) = events.next().await {
                        match event {
                            LockEvent::LockReleased { resource, .. } => {
                                coordinator.notify(&resource);
                            }
                        }
                    }
                    warn!(
                        event_bus = %event_bus,
                        "Lock event stream ended; falling back to polling"
                    );
                });
                debug!(
                    event_bus = self.inner.event_bus.provider_name(),
                    "Subscribed to lock release events"
                );
                *subscription = Some(SubscriptionTask(handle));
            }
            Err(e) => {
                *subscription = None;
                warn!(
                    event_bus = self.inner.event_bus.provider_name(),
                    error = %e,
                    "Release event subscription failed; waiting by polling"
                );
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Remaining lifetime of the lock on `resource`
    ///
    /// `None` when the resource is free or its lock never expires.
    pub async fn get_expiration(&self, resource: &str) -> Result<Option<Duration>> {
        self.validate_resource(resource)?;
        let storage = &self.inner.storage;
        retry_transient("get_expiration", QUERY_MAX_ATTEMPTS, None, || {
            storage.get_expiration(resource)
        })
        .await
    }

    /// Holder and remaining lifetime of the lock on `resource`
    pub async fn get_lock_info(&self, resource: &str) -> Result<Option<LockInfo>> {
        self.validate_resource(resource)?;
        let storage = &self.inner.storage;
        let Some(lock_id) =
            retry_transient("get_lock_info", QUERY_MAX_ATTEMPTS, None, || storage.get(resource))
                .await?
        else {
            return Ok(None);
        };
        let expires_in = retry_transient("get_lock_info", QUERY_MAX_ATTEMPTS, None, || {
            storage.get_expiration(resource)
        })
        .await?;
        Ok(Some(LockInfo {
            resource: resource.to_string(),
            lock_id,
            expires_in,
        }))
    }

    /// Every lock currently held, sorted by resource name
    pub async fn list_active_locks(&self) -> Result<Vec<LockInfo>> {
        let storage = &self.inner.storage;
        let records = retry_transient("list_active_locks", QUERY_MAX_ATTEMPTS, None, || {
            storage.get_all_by_prefix("")
        })
        .await?;

        let mut locks = Vec::with_capacity(records.len());
        for (resource, lock_id) in records {
            let expires_in = retry_transient("list_active_locks", QUERY_MAX_ATTEMPTS, None, || {
                storage.get_expiration(&resource)
            })
            .await?;
            // No expiration is also what a record removed since the scan reports.
            if expires_in.is_none()
                && !retry_transient("list_active_locks", QUERY_MAX_ATTEMPTS, None, || {
                    storage.exists(&resource)
                })
                .await?
            {
                debug!(resource, "Lock disappeared while listing");
                continue;
            }
            locks.push(LockInfo {
                resource,
                lock_id,
                expires_in,
            });
        }
        locks.sort_by(|a, b| a.resource.cmp(&b.resource));
        Ok(locks)
    }

    /// Number of locks currently held
    pub async fn get_active_locks_count(&self) -> Result<usize> {
        let storage = &self.inner.storage;
        retry_transient("get_active_locks_count", QUERY_MAX_ATTEMPTS, None, || {
            storage.get_count("")
        })
        .await
    }
}

#[async_trait]
impl LockProvider for DistributedLockProvider {
    async fn try_acquire(
        &self,
        resource: &str,
        options: AcquireOptions,
    ) -> Result<Option<LockHandle>> {
        self.validate_resource(resource)?;
        let ttl = self.resolve_ttl(options.time_until_expires)?;
        let timeout = options
            .acquire_timeout
            .unwrap_or(TimeLimit::Finite(self.inner.options.default_acquire_timeout));
        let cancel = options.cancellation.unwrap_or_default();

        let started = Instant::now();
        // An unrepresentable deadline is treated as no deadline.
        let deadline = timeout.as_duration().and_then(|d| started.checked_add(d));

        if cancel.is_cancelled() {
            info!(resource, "Lock acquisition cancelled before the first attempt");
            return Ok(None);
        }

        let lock_id = LockId::generate();
        if let Some(handle) = self.attempt(resource, &lock_id, ttl, started).await {
            return Ok(Some(handle));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            debug!(resource, "Lock is held and no wait was requested");
            return Ok(None);
        }

        let registration = self.inner.coordinator.register(resource)?;
        self.ensure_subscription().await;

        let mut backoff = Backoff::default();
        let signal = registration.signal();
        let mut pending = Box::pin(signal.notified());
        pending.as_mut().enable();

        loop {
            if cancel.is_cancelled() {
                info!(resource, attempts = backoff.attempts() + 1, "Lock acquisition cancelled");
                return Ok(None);
            }
            let remaining = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!(
                            resource,
                            attempts = backoff.attempts() + 1,
                            "Timed out waiting for lock"
                        );
                        return Ok(None);
                    }
                    Some(deadline - now)
                }
                None => None,
            };

            let delay = backoff.next_delay_within(remaining);
            tokio::select! {
                () = &mut pending => {
                    debug!(resource, "Woken by lock release");
                }
                () = tokio::time::sleep(delay) => {}
                () = cancel.cancelled() => {
                    info!(resource, attempts = backoff.attempts(), "Lock acquisition cancelled");
                    return Ok(None);
                }
            }
            tokio::task::yield_now().await;

            // Re-arm before the attempt so a release racing it still wakes the next wait.
            pending = Box::pin(signal.notified());
            pending.as_mut().enable();

            if let Some(handle) = self.attempt(resource, &lock_id, ttl, started).await {
                return Ok(Some(handle));
            }
        }
    }

    async fn release(
        &self,
        resource: &str,
        lock_id: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<()> {
        self.validate_resource(resource)?;
        let storage = &self.inner.storage;
        let removed = retry_transient("release", RELEASE_MAX_ATTEMPTS, cancellation.as_ref(), || {
            storage.remove_if_equal(resource, lock_id)
        })
        .await?;

        if removed {
            debug!(resource, lock_id, "Lock released");
            self.inner.coordinator.notify(resource);
            if let Err(e) = self
                .inner
                .event_bus
                .publish_event(LockEvent::released(resource, lock_id))
                .await
            {
                warn!(resource, lock_id, error = %e, "Failed to publish lock release");
            }
            return Ok(());
        }

        match storage.get(resource).await {
            Ok(None) => debug!(
                resource,
                lock_id, "Release found no lock record (expired or already released)"
            ),
            Ok(Some(current)) => debug!(
                resource,
                lock_id,
                current_lock_id = %current,
                "Release skipped: lock is now held by another owner"
            ),
            Err(e) => debug!(resource, lock_id, error = %e, "Release was a no-op"),
        }
        Ok(())
    }

    async fn renew(
        &self,
        resource: &str,
        lock_id: &str,
        time_until_expires: Option<TimeLimit>,
    ) -> Result<bool> {
        self.validate_resource(resource)?;
        let ttl = self.resolve_ttl(time_until_expires)?;
        let storage = &self.inner.storage;
        let renewed = retry_transient("renew", RENEW_MAX_ATTEMPTS, None, || {
            storage.replace_if_equal(resource, lock_id, lock_id, ttl)
        })
        .await?;
        if !renewed {
            debug!(resource, lock_id, "Renew skipped: lock no longer owned");
        }
        Ok(renewed)
    }

    async fn is_locked(&self, resource: &str) -> Result<bool> {
        self.validate_resource(resource)?;
        let storage = &self.inner.storage;
        retry_transient("is_locked", QUERY_MAX_ATTEMPTS, None, || {
            storage.exists(resource)
        })
        .await
    }
}

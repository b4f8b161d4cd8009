//! Held lock handle

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reslock_domain::error::Result;
use reslock_domain::value_objects::TimeLimit;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::ports::LockProvider;

/// A lock acquired through a [`LockProvider`]
///
/// The handle releases the lock at most once, whichever of [`release`],
/// [`dispose`] or `Drop` runs first. Dropping an unreleased handle inside a
/// tokio runtime spawns the release in the background; outside a runtime
/// the record is left to expire.
///
/// [`release`]: LockHandle::release
/// [`dispose`]: LockHandle::dispose
pub struct LockHandle {
    resource: String,
    lock_id: String,
    acquired_at: DateTime<Utc>,
    time_waited: Duration,
    renewal_count: AtomicU32,
    released: AtomicBool,
    provider: Arc<dyn LockProvider>,
}

impl LockHandle {
    /// Wrap a successful acquisition
    pub fn new(
        resource: impl Into<String>,
        lock_id: impl Into<String>,
        time_waited: Duration,
        provider: Arc<dyn LockProvider>,
    ) -> Self {
        Self {
            resource: resource.into(),
            lock_id: lock_id.into(),
            acquired_at: Utc::now(),
            time_waited,
            renewal_count: AtomicU32::new(0),
            released: AtomicBool::new(false),
            provider,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn lock_id(&self) -> &str {
        &self.lock_id
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Time spent waiting before the lock was granted
    pub fn time_waited(&self) -> Duration {
        self.time_waited
    }

    /// Number of successful renewals
    pub fn renewal_count(&self) -> u32 {
        self.renewal_count.load(Ordering::Acquire)
    }

    /// Whether release has been started on this handle
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Whether the resource is still locked (by anyone)
    pub async fn is_locked(&self) -> Result<bool> {
        self.provider.is_locked(&self.resource).await
    }

    /// Extend the lock's lifetime
    ///
    /// Returns `false` once the handle has been released or the lock has
    /// passed to another owner.
    pub async fn renew(&self, time_until_expires: Option<TimeLimit>) -> Result<bool> {
        if self.is_released() {
            return Ok(false);
        }
        let renewed = self
            .provider
            .renew(&self.resource, &self.lock_id, time_until_expires)
            .await?;
        if renewed {
            self.renewal_count.fetch_add(1, Ordering::AcqRel);
        }
        Ok(renewed)
    }

    /// Release the lock
    ///
    /// Only the first call does any work; later calls return `Ok(())`.
    pub async fn release(&self) -> Result<()> {
        self.release_inner(None).await
    }

    /// Release the lock, giving up retries when `cancellation` fires
    pub async fn release_with_cancellation(&self, cancellation: CancellationToken) -> Result<()> {
        self.release_inner(Some(cancellation)).await
    }

    async fn release_inner(&self, cancellation: Option<CancellationToken>) -> Result<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.provider
            .release(&self.resource, &self.lock_id, cancellation)
            .await
    }

    /// Release the lock, logging instead of returning any failure
    pub async fn dispose(self) {
        if let Err(e) = self.release().await {
            warn!(
                resource = %self.resource,
                lock_id = %self.lock_id,
                error = %e,
                "Failed to release lock on dispose"
            );
        }
    }
}

impl fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockHandle")
            .field("resource", &self.resource)
            .field("lock_id", &self.lock_id)
            .field("acquired_at", &self.acquired_at)
            .field("time_waited", &self.time_waited)
            .field("renewal_count", &self.renewal_count())
            .field("released", &self.is_released())
            .finish()
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let provider = Arc::clone(&self.provider);
                let resource = std::mem::take(&mut self.resource);
                let lock_id = std::mem::take(&mut self.lock_id);
                debug!(resource = %resource, lock_id = %lock_id, "Releasing dropped lock handle");
                runtime.spawn(async move {
                    if let Err(e) = provider.release(&resource, &lock_id, None).await {
                        warn!(
                            resource = %resource,
                            lock_id = %lock_id,
                            error = %e,
                            "Background release of dropped lock failed"
                        );
                    }
                });
            }
            Err(_) => {
                warn!(
                    resource = %self.resource,
                    lock_id = %self.lock_id,
                    "Lock handle dropped outside a tokio runtime; record will expire by TTL"
                );
            }
        }
    }
}

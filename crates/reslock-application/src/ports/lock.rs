//! Lock Provider Port
//!
//! Contract shared by [`DistributedLockProvider`](crate::use_cases::DistributedLockProvider)
//! and [`ThrottlingLockProvider`](crate::use_cases::ThrottlingLockProvider).
//! A [`LockHandle`] keeps an `Arc<dyn LockProvider>` so it can release
//! itself through whichever provider created it.

use std::time::Duration;

use async_trait::async_trait;
use reslock_domain::error::Result;
use reslock_domain::value_objects::TimeLimit;
use tokio_util::sync::CancellationToken;

use crate::use_cases::LockHandle;

/// Per-call acquisition options
///
/// `None` fields fall back to the provider's configured defaults.
///
/// ```
/// use reslock_application::ports::AcquireOptions;
/// use std::time::Duration;
///
/// let options = AcquireOptions::new()
///     .with_time_until_expires(Duration::from_secs(300))
///     .with_acquire_timeout(Duration::ZERO);
/// assert!(options.cancellation.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AcquireOptions {
    /// Lifetime of the lock record
    pub time_until_expires: Option<TimeLimit>,
    /// Total time spent retrying; `Finite(0)` means a single attempt
    pub acquire_timeout: Option<TimeLimit>,
    /// Caller-driven abort of the wait
    pub cancellation: Option<CancellationToken>,
}

impl AcquireOptions {
    /// Options using every provider default
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lock lifetime
    pub fn with_time_until_expires(mut self, limit: impl Into<TimeLimit>) -> Self {
        self.time_until_expires = Some(limit.into());
        self
    }

    /// Set the acquire timeout
    pub fn with_acquire_timeout(mut self, limit: impl Into<TimeLimit>) -> Self {
        self.acquire_timeout = Some(limit.into());
        self
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Single-attempt options
    pub fn no_wait() -> Self {
        Self::new().with_acquire_timeout(Duration::ZERO)
    }
}

/// Lock provider interface
#[async_trait]
pub trait LockProvider: Send + Sync + std::fmt::Debug {
    /// Try to acquire `resource`
    ///
    /// Returns `Ok(None)` when the lock could not be obtained before the
    /// acquire timeout elapsed or the caller cancelled.
    async fn try_acquire(&self, resource: &str, options: AcquireOptions)
    -> Result<Option<LockHandle>>;

    /// Release `resource` if it is still held by `lock_id`
    ///
    /// Releasing a lock that expired or changed owner is a silent success.
    async fn release(
        &self,
        resource: &str,
        lock_id: &str,
        cancellation: Option<CancellationToken>,
    ) -> Result<()>;

    /// Extend the lifetime of `resource` if it is still held by `lock_id`
    ///
    /// Returns `false` when the caller no longer owns the lock.
    async fn renew(
        &self,
        resource: &str,
        lock_id: &str,
        time_until_expires: Option<TimeLimit>,
    ) -> Result<bool>;

    /// Whether `resource` is currently unavailable
    async fn is_locked(&self, resource: &str) -> Result<bool>;
}

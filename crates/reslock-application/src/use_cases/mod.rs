//! Use Cases
//!
//! | Use Case | Description |
//! |----------|-------------|
//! | [`DistributedLockProvider`] | Mutual exclusion over a shared storage backend |
//! | [`ThrottlingLockProvider`] | Fixed-window rate limiting over the same backend |
//! | [`LockHandle`] | A held lock with at-most-once release |

/// Held lock handle
pub mod lock_handle;
/// Distributed mutex provider
pub mod lock_provider;
/// Fixed-window throttling provider
pub mod throttling_lock_provider;

pub use lock_handle::LockHandle;
pub use lock_provider::{DistributedLockProvider, LockProviderOptions};
pub use throttling_lock_provider::{ThrottlingLockProvider, ThrottlingOptions};

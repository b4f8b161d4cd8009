//! Domain Services
//!
//! Building blocks used by the lock providers.
//!
//! | Service | Description |
//! |---------|-------------|
//! | [`Backoff`] | Jittered exponential delay between acquisition attempts |
//! | [`retry_transient`] | Bounded retry of storage calls on transient errors |
//! | [`WaitCoordinator`] | Per-resource wake signals for local waiters |
//! | [`ScopedLockStorage`] | Key prefixing adapter over a storage backend |

/// Acquisition backoff
pub mod backoff;
/// Transient-error retry helper
pub mod retry;
/// Key prefixing storage adapter
pub mod scoped_storage;
/// Local waiter registry
pub mod wait_coordinator;

pub use backoff::Backoff;
pub use retry::retry_transient;
pub use scoped_storage::ScopedLockStorage;
pub use wait_coordinator::{WaitCoordinator, WaitRegistration};

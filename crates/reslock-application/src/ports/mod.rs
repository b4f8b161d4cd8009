//! Application ports
//!
//! - **lock** - lock provider contract shared by the mutex and throttling providers
//! - **registry** - auto-registration of storage backends

/// Lock provider port
pub mod lock;
/// Provider registry
pub mod registry;

pub use lock::{AcquireOptions, LockProvider};

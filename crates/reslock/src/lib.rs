//! # reslock
//!
//! Distributed resource locks and fixed-window throttling over a shared
//! storage backend.
//!
//! ## Example
//!
//! ```ignore
//! use reslock::{AcquireOptions, LockProvider, infrastructure::{ConfigLoader, init_app}};
//! use std::time::Duration;
//!
//! let context = init_app(ConfigLoader::new().load()?).await?;
//! let options = AcquireOptions::new()
//!     .with_time_until_expires(Duration::from_secs(60))
//!     .with_acquire_timeout(Duration::from_secs(5));
//!
//! if let Some(handle) = context.lock_provider().try_acquire("invoices", options).await? {
//!     // exclusive section
//!     handle.release().await?;
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - errors, constants, events, ports and value objects
//! - `application` - lock providers, handles and their domain services
//! - `providers` - storage backends and event buses
//! - `infrastructure` - configuration, logging and the composition root

// Force-link reslock-providers so linkme storage registrations are included
extern crate reslock_providers;

/// Domain layer - core types and ports
pub mod domain {
    pub use reslock_domain::*;
}

/// Application layer - lock providers and use cases
pub mod application {
    pub use reslock_application::*;
}

/// Provider implementations - storage backends and event buses
pub mod providers {
    pub use reslock_providers::*;
}

/// Infrastructure layer - config, logging and bootstrap
pub mod infrastructure {
    pub use reslock_infrastructure::*;
}

/// Admin command line interface
pub mod cli;

// Re-export commonly used types at the crate root
pub use reslock_application::ports::{AcquireOptions, LockProvider};
pub use reslock_application::use_cases::{
    DistributedLockProvider, LockHandle, LockProviderOptions, ThrottlingLockProvider,
    ThrottlingOptions,
};
pub use reslock_domain::error::{Error, Result};
pub use reslock_domain::value_objects::{LockId, LockInfo, TimeLimit};

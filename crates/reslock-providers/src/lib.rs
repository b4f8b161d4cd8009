//! # reslock - Provider Implementations
//!
//! Backends for the ports defined in `reslock-domain`.
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Storage | `LockStorageProvider` | Memory, Redis |
//! | Events | `EventBusProvider` | Tokio, Nats, Null |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! reslock-providers = { version = "0.1", default-features = false, features = ["storage-redis", "events-nats"] }
//! ```
//!
//! Storage backends register themselves in
//! `reslock_application::ports::registry::STORAGE_PROVIDERS` and are picked
//! by name at startup.

pub use reslock_domain::error::{Error, Result};
pub use reslock_domain::ports::{EventBusProvider, LockStorageProvider};

/// Provider-specific constants
pub mod constants;

/// Lock storage implementations
pub mod storage;

/// Event bus implementations
pub mod events;

//! Application Layer - reslock
//!
//! Lock acquisition, renewal and release orchestrated over the storage and
//! event bus ports defined in `reslock-domain`.
//!
//! ## Layout
//!
//! - `ports::lock`: the [`LockProvider`] trait and [`AcquireOptions`]
//! - `ports::registry`: linkme registry for storage backends
//! - `domain_services::*`: backoff, retry, wait coordination, key scoping
//! - `use_cases::*`: [`DistributedLockProvider`], [`ThrottlingLockProvider`],
//!   [`LockHandle`]
//!
//! ## Dependencies
//!
//! This crate depends only on `reslock-domain` and runtime libraries. Concrete
//! backends live in `reslock-providers` and register into
//! [`ports::registry::STORAGE_PROVIDERS`].

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use domain_services::*;
pub use ports::*;
pub use use_cases::*;

//! # Domain Layer
//!
//! Core types and contracts for distributed resource locks.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`constants`] | Defaults shared by every layer |
//! | [`error`] | Domain error type and `Result` alias |
//! | [`events`] | Lock lifecycle events broadcast between processes |
//! | [`ports`] | Storage, event bus and clock contracts |
//! | [`value_objects`] | Lock ids, time limits, lock info |
//!
//! This crate has no knowledge of concrete backends. Storage and event bus
//! implementations live in `reslock-providers`; orchestration lives in
//! `reslock-application`.

pub mod constants;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};

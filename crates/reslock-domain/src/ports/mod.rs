//! Domain Port Interfaces
//!
//! Boundary contracts implemented by `reslock-providers`.
//!
//! - **storage** - atomic key-value operations backing lock records
//! - **events** - release notifications between processes
//! - **clock** - wall-clock source for time-bucketed throttling

/// Wall-clock port
pub mod clock;
/// Event bus port
pub mod events;
/// Lock storage port
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use events::{EventBusProvider, LockEventStream};
pub use storage::LockStorageProvider;

//! Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`LockId`] | Ownership token for one acquisition |
//! | [`TimeLimit`] | Finite duration or "no limit" |
//! | [`LockInfo`] | Snapshot of a held lock |

/// Lock value objects
pub mod lock;

pub use lock::{LockId, LockInfo, TimeLimit};

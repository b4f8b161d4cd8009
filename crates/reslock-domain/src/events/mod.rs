//! Lock Events
//!
//! Lock lifecycle events broadcast between processes sharing a storage
//! backend. A waiter in one process learns about a release in another
//! process through these events.
//!
//! | Event | Description |
//! |-------|-------------|
//! | [`LockEvent::LockReleased`] | A lock record was removed by its owner |

/// Lock event definitions
pub mod lock_events;

pub use lock_events::LockEvent;

//! Provider Constants

// ============================================================================
// EVENT BUS CONSTANTS
// ============================================================================

/// Tokio broadcast channel capacity
pub const EVENTS_TOKIO_DEFAULT_CAPACITY: usize = 1024;

/// NATS subject carrying lock events
pub const EVENTS_NATS_DEFAULT_SUBJECT: &str = "reslock.events";

// ============================================================================
// REDIS STORAGE CONSTANTS
// ============================================================================

/// Keys requested per SCAN round trip
pub const REDIS_SCAN_BATCH_SIZE: usize = 500;

/// Default Redis URL when none is configured
pub const REDIS_DEFAULT_URL: &str = "redis://localhost:6379";

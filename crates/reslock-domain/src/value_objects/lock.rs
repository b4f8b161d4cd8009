//! Lock value objects

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// LOCK ID
// ============================================================================

/// Ownership token stored as the lock record's value
///
/// A new id is generated for every acquisition attempt and rendered as 32
/// lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockId(String);

impl LockId {
    /// Generate a fresh random lock id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing id read back from storage or supplied by a caller
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LockId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// TIME LIMIT
// ============================================================================

/// A duration bound that may be lifted entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeLimit {
    /// No bound: no TTL for lock lifetimes, wait forever for acquire timeouts
    Infinite,
    /// Bounded by the given duration
    Finite(Duration),
}

impl TimeLimit {
    /// The bound as an optional duration, `None` meaning infinite
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Self::Infinite => None,
            Self::Finite(d) => Some(d),
        }
    }

    /// Whether this is [`TimeLimit::Infinite`]
    pub fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }

    /// Resolve a lock lifetime into a storage TTL
    ///
    /// A finite lifetime of zero would expire the record on creation and is
    /// rejected.
    pub fn to_ttl(self) -> Result<Option<Duration>> {
        match self {
            Self::Infinite => Ok(None),
            Self::Finite(d) if d.is_zero() => Err(Error::invalid_argument(
                "time_until_expires must be greater than zero",
            )),
            Self::Finite(d) => Ok(Some(d)),
        }
    }
}

impl From<Duration> for TimeLimit {
    fn from(d: Duration) -> Self {
        Self::Finite(d)
    }
}

// ============================================================================
// LOCK INFO
// ============================================================================

/// Snapshot of a held lock as seen in storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Resource name without the key prefix
    pub resource: String,
    /// Lock id of the current holder
    pub lock_id: String,
    /// Remaining lifetime, `None` when the record never expires
    pub expires_in: Option<Duration>,
}

//! Lock Storage Provider Implementations
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`MemoryLockStorage`] | Local | Single-process storage for tests and embedded use |
//! | [`RedisLockStorage`] | Distributed | Redis-backed for multi-instance deployments |
//!
//! Only the Redis backend gives mutual exclusion across processes.

#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-redis")]
pub mod redis;

#[cfg(feature = "storage-memory")]
pub use memory::MemoryLockStorage;
#[cfg(feature = "storage-redis")]
pub use redis::RedisLockStorage;

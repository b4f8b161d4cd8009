//! Provider Registry System
//!
//! Auto-registration infrastructure for storage backends. Uses `linkme`
//! distributed slices so that linking `reslock-providers` is enough to make
//! its backends resolvable by name.
//!
//! ```text
//!  1. Provider defines:  #[linkme::distributed_slice(STORAGE_PROVIDERS)]
//!                        static ENTRY: StorageProviderEntry = ...
//!  2. Registry declares: pub static STORAGE_PROVIDERS: [Entry] = [..]
//!  3. Resolver queries:  STORAGE_PROVIDERS.iter()
//!  4. Config selects:    "provider = redis" → RedisLockStorage
//! ```
//!
//! ## Registering a Provider (in reslock-providers)
//!
//! ```ignore
//! use reslock_application::ports::registry::{StorageProviderEntry, STORAGE_PROVIDERS};
//!
//! #[linkme::distributed_slice(STORAGE_PROVIDERS)]
//! static MEMORY_PROVIDER: StorageProviderEntry = StorageProviderEntry {
//!     name: "memory",
//!     description: "In-process lock storage",
//!     factory: |_config| Ok(Arc::new(MemoryLockStorage::new())),
//! };
//! ```

pub mod storage;

pub use storage::{
    STORAGE_PROVIDERS, StorageProviderConfig, StorageProviderEntry, list_storage_providers,
    resolve_storage_provider,
};

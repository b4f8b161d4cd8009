//! Local waiter registry
//!
//! Maps a resource name to a shared wake signal for every task in this
//! process that is waiting to acquire it. Release events, local or remote,
//! call [`WaitCoordinator::notify`] to wake those tasks early instead of
//! letting them sleep out their backoff delay.
//!
//! Entries are reference counted by [`WaitRegistration`] guards and removed
//! as soon as the last guard is dropped, so the map only ever holds
//! resources that currently have waiters.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use reslock_domain::constants::{
    DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES, DEFAULT_MAX_WAITERS_PER_RESOURCE,
};
use reslock_domain::error::{Error, Result};
use tokio::sync::Notify;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct WaitEntry {
    signal: Notify,
    waiters: AtomicUsize,
}

/// Bounded registry of per-resource wait signals
pub struct WaitCoordinator {
    entries: DashMap<String, Arc<WaitEntry>>,
    // Serializes insert/increment/decrement/remove. Never held across an await.
    mutations: Mutex<()>,
    max_resources: usize,
    max_waiters_per_resource: usize,
}

impl Default for WaitCoordinator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_CONCURRENT_WAITING_RESOURCES,
            DEFAULT_MAX_WAITERS_PER_RESOURCE,
        )
    }
}

impl fmt::Debug for WaitCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitCoordinator")
            .field("waiting_resources", &self.entries.len())
            .field("max_resources", &self.max_resources)
            .field("max_waiters_per_resource", &self.max_waiters_per_resource)
            .finish()
    }
}

impl WaitCoordinator {
    /// Create a coordinator with the given caps
    pub fn new(max_resources: usize, max_waiters_per_resource: usize) -> Self {
        Self {
            entries: DashMap::new(),
            mutations: Mutex::new(()),
            max_resources,
            max_waiters_per_resource,
        }
    }

    fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a waiter for `resource`
    ///
    /// Fails with [`Error::ResourceExhausted`] when the resource already has
    /// the maximum number of waiters, or when it would be a new entry and
    /// the map is full.
    pub fn register(self: &Arc<Self>, resource: &str) -> Result<WaitRegistration> {
        let _guard = self.lock_mutations();

        let existing = self.entries.get(resource).map(|e| Arc::clone(e.value()));
        let entry = match existing {
            Some(entry) => {
                let waiters = entry.waiters.load(Ordering::Acquire);
                if waiters >= self.max_waiters_per_resource {
                    warn!(resource, waiters, "Too many local waiters for resource");
                    return Err(Error::resource_exhausted(format!(
                        "resource '{resource}' already has {waiters} local waiters (max {})",
                        self.max_waiters_per_resource
                    )));
                }
                entry.waiters.fetch_add(1, Ordering::AcqRel);
                entry
            }
            None => {
                let waiting = self.entries.len();
                if waiting >= self.max_resources || self.max_waiters_per_resource == 0 {
                    warn!(resource, waiting, "Too many resources with local waiters");
                    return Err(Error::resource_exhausted(format!(
                        "{waiting} resources already have local waiters (max {})",
                        self.max_resources
                    )));
                }
                let entry = Arc::new(WaitEntry::default());
                entry.waiters.store(1, Ordering::Release);
                self.entries.insert(resource.to_string(), Arc::clone(&entry));
                entry
            }
        };

        Ok(WaitRegistration {
            coordinator: Arc::clone(self),
            resource: resource.to_string(),
            entry,
        })
    }

    fn unregister(&self, resource: &str, entry: &Arc<WaitEntry>) {
        let _guard = self.lock_mutations();
        let previous = entry.waiters.fetch_sub(1, Ordering::AcqRel);
        if previous <= 1 {
            // A cleared-then-recreated entry under the same name is left alone.
            self.entries
                .remove_if(resource, |_, current| Arc::ptr_eq(current, entry));
        }
    }

    /// Wake every local waiter of `resource`
    ///
    /// No-op when nobody in this process is waiting for it.
    pub fn notify(&self, resource: &str) {
        if let Some(entry) = self.entries.get(resource) {
            debug!(
                resource,
                waiters = entry.waiters.load(Ordering::Acquire),
                "Waking local waiters"
            );
            entry.signal.notify_waiters();
        }
    }

    /// Wake all waiters and drop every entry
    ///
    /// Outstanding registrations stay valid; their waiters fall back to
    /// polling until they exit.
    pub fn clear(&self) {
        let _guard = self.lock_mutations();
        for entry in &self.entries {
            entry.signal.notify_waiters();
        }
        self.entries.clear();
    }

    /// Number of resources with at least one local waiter
    pub fn waiting_resources(&self) -> usize {
        self.entries.len()
    }

    /// Number of local waiters registered for `resource`
    pub fn waiter_count(&self, resource: &str) -> usize {
        self.entries
            .get(resource)
            .map_or(0, |e| e.waiters.load(Ordering::Acquire))
    }
}

/// Guard for one registered waiter
///
/// Dropping the guard unregisters the waiter, including when the future
/// holding it is dropped mid-wait.
pub struct WaitRegistration {
    coordinator: Arc<WaitCoordinator>,
    resource: String,
    entry: Arc<WaitEntry>,
}

impl WaitRegistration {
    /// Signal fired when the resource may have become free
    pub fn signal(&self) -> &Notify {
        &self.entry.signal
    }

    /// Resource this registration waits on
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Debug for WaitRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitRegistration")
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl Drop for WaitRegistration {
    fn drop(&mut self) {
        self.coordinator.unregister(&self.resource, &self.entry);
    }
}

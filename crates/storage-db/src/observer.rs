//! # Data Observers
//!
//! Callbacks the store fires after a mutation commits, so the UI
//! collaborator can refresh the affected views.
//!
//! ```text
//!   create / update / delete / clear ──► on_data_changed(collection)
//!   restore_from_backup / clear_all_data ──► on_reload()
//! ```
//!
//! Observers run on the caller's task, after the transaction is committed,
//! and must not block.

use storage_core::Collection;
use tracing::debug;

/// Receives store change notifications.
pub trait DataObserver: Send + Sync {
    /// A committed operation changed `collection`.
    fn on_data_changed(&self, collection: Collection);

    /// Every collection was replaced; views should reload from scratch.
    fn on_reload(&self);
}

/// Observer that ignores everything (for tests and the CLI).
pub struct NoOpObserver;

impl DataObserver for NoOpObserver {
    fn on_data_changed(&self, _collection: Collection) {}
    fn on_reload(&self) {}
}

/// Observer that logs every notification at debug level.
pub struct TracingObserver;

impl DataObserver for TracingObserver {
    fn on_data_changed(&self, collection: Collection) {
        debug!(%collection, "Data changed");
    }

    fn on_reload(&self) {
        debug!("Data reloaded");
    }
}

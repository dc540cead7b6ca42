//! # Repository Module
//!
//! Store access for the collections.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.store()          CollectionStore    untyped JSON records           │
//! │  db.records::<R>()   RecordStore<R>     same operations, serde types   │
//! │  db.sales()          SaleRepository     settlement, history            │
//! │  db.settings()       SettingsRepository named blobs                    │
//! │  db.snapshots()      SnapshotService    export, import, restore        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository except settings goes through [`collection`], which owns
//! the SQL and the change notifications.

pub mod collection;
pub mod record;
pub mod sale;
pub mod settings;
pub mod snapshot;

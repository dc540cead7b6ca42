//! # storage-db: Persistence Layer for Storage
//!
//! Local persistence for the inventory: named JSON collections in SQLite,
//! schema versioning, settlement of sales and snapshot import/export.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storage Data Flow                                │
//! │                                                                         │
//! │  App command / alert engine                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   storage-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (schema.rs) │  │   │
//! │  │   │               │    │ CollectionStore│    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ RecordStore<R> │    │ v1: core     │  │   │
//! │  │   │ DataObserver  │    │ SaleRepository │    │ v2: users,   │  │   │
//! │  │   │               │    │ Settings       │    │     settings │  │   │
//! │  │   │               │    │ Snapshots      │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/storage.db                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storage_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/storage.db")).await?;
//!
//! let products = db.records::<Product>().all().await?;
//! let backup = db.snapshots().export_snapshot().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod observer;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use observer::{DataObserver, NoOpObserver, TracingObserver};
pub use pool::{Database, DbConfig};
pub use schema::SCHEMA_VERSION;

pub use repository::collection::{CollectionStore, CollectionTransaction};
pub use repository::record::RecordStore;
pub use repository::sale::{SaleRepository, Settlement};
pub use repository::settings::SettingsRepository;
pub use repository::snapshot::{parse_snapshot, ImportReport, Snapshot, SnapshotService};

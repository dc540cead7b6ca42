//! # Snapshots
//!
//! Export, import, backup and restore of the full store as one portable
//! JSON document.
//!
//! ## Wire Format
//! ```text
//! {
//!   "warehouse": [ {...}, ... ],     products
//!   "suppliers": [ ... ],
//!   "sales":     [ ... ],
//!   "documents": [ ... ],
//!   "users":     [ ... ],            optional
//!   "activity":  [ ... ],            optional
//!   "exportDate": "2024-05-01T10:00:00Z",
//!   "version": 2
//! }
//! ```
//!
//! ## Import vs Restore
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────────────┐
//! │ import_snapshot              │ restore_from_backup                      │
//! ├──────────────────────────────┼──────────────────────────────────────────┤
//! │ any subset of collections    │ warehouse, suppliers, sales, documents   │
//! │                              │ required                                 │
//! │ absent collections untouched │ every collection cleared                 │
//! │ one transaction per          │ one transaction for everything           │
//! │ collection                   │                                          │
//! │ on_data_changed(collection)  │ on_reload()                              │
//! └──────────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Both validate the whole document before the first write: every record
//! must decode as its collection's record type, so whatever is imported can
//! be read back. A malformed document is `InvalidSnapshot` and nothing is
//! written.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{info, warn};

use super::collection::{parse_id, CollectionStore};
use crate::error::{DbError, DbResult};
use crate::schema::SCHEMA_VERSION;
use storage_core::types::{ActivityLogEntry, Document, Product, Record, Sale, Supplier, User};
use storage_core::Collection;

/// Collections a backup must contain to be restorable.
pub const REQUIRED_FOR_RESTORE: [Collection; 4] = [
    Collection::Products,
    Collection::Suppliers,
    Collection::Sales,
    Collection::Documents,
];

// =============================================================================
// Snapshot Document
// =============================================================================

/// The portable export/backup document.
///
/// Each collection is `None` when absent from the document, which is
/// different from present and empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, alias = "products", skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppliers: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Vec<Value>>,

    /// RFC 3339 time of export. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,

    /// Schema version of the exporting store. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl Snapshot {
    pub fn collection(&self, collection: Collection) -> Option<&Vec<Value>> {
        match collection {
            Collection::Products => self.warehouse.as_ref(),
            Collection::Suppliers => self.suppliers.as_ref(),
            Collection::Sales => self.sales.as_ref(),
            Collection::Documents => self.documents.as_ref(),
            Collection::Users => self.users.as_ref(),
            Collection::Activity => self.activity.as_ref(),
        }
    }

    pub fn set_collection(&mut self, collection: Collection, records: Vec<Value>) {
        let slot = match collection {
            Collection::Products => &mut self.warehouse,
            Collection::Suppliers => &mut self.suppliers,
            Collection::Sales => &mut self.sales,
            Collection::Documents => &mut self.documents,
            Collection::Users => &mut self.users,
            Collection::Activity => &mut self.activity,
        };
        *slot = Some(records);
    }

    /// Collections present in the document, in store order.
    pub fn present(&self) -> impl Iterator<Item = (Collection, &Vec<Value>)> + '_ {
        Collection::ALL
            .into_iter()
            .filter_map(|c| self.collection(c).map(|records| (c, records)))
    }

    /// Total number of records across present collections.
    pub fn record_count(&self) -> usize {
        self.present().map(|(_, records)| records.len()).sum()
    }

    /// Pretty-printed JSON text for a file.
    pub fn to_json_pretty(&self) -> DbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parses snapshot text. Any syntax or shape error is `InvalidSnapshot`.
pub fn parse_snapshot(text: &str) -> DbResult<Snapshot> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| DbError::invalid_snapshot(format!("not valid JSON: {e}")))?;

    if !value.is_object() {
        return Err(DbError::invalid_snapshot("top level must be a JSON object"));
    }

    serde_json::from_value(value).map_err(|e| DbError::invalid_snapshot(e.to_string()))
}

/// Checks every record of one collection before anything is written.
///
/// ## Rules
/// - Each record is a JSON object
/// - An `id`, when present and not null, is a positive integer
/// - Ids are unique within the collection
/// - The body decodes as the collection's record type
fn validate_records(collection: Collection, records: &[Value]) -> DbResult<()> {
    let mut seen = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let Some(map) = record.as_object() else {
            return Err(DbError::invalid_snapshot(format!(
                "{collection}[{index}] is not an object"
            )));
        };

        match map.get("id") {
            None | Some(Value::Null) => {}
            Some(raw) => {
                let id = parse_id(raw).ok_or_else(|| {
                    DbError::invalid_snapshot(format!(
                        "{collection}[{index}] has invalid id {raw}"
                    ))
                })?;
                if !seen.insert(id) {
                    return Err(DbError::invalid_snapshot(format!(
                        "{collection} contains id {id} more than once"
                    )));
                }
            }
        }

        let decoded = match collection {
            Collection::Products => decodes_as::<Product>(map),
            Collection::Suppliers => decodes_as::<Supplier>(map),
            Collection::Sales => decodes_as::<Sale>(map),
            Collection::Documents => decodes_as::<Document>(map),
            Collection::Users => decodes_as::<User>(map),
            Collection::Activity => decodes_as::<ActivityLogEntry>(map),
        };
        decoded.map_err(|reason| {
            DbError::invalid_snapshot(format!("{collection}[{index}] is not a valid record: {reason}"))
        })?;
    }
    Ok(())
}

/// Decodes the body the way a typed read will, with the id left out (the
/// store supplies it on read).
fn decodes_as<R: Record>(map: &Map<String, Value>) -> Result<(), serde_json::Error> {
    let mut body = map.clone();
    body.remove("id");
    serde_json::from_value::<R>(Value::Object(body)).map(drop)
}

fn validate_snapshot(snapshot: &Snapshot) -> DbResult<()> {
    for (collection, records) in snapshot.present() {
        validate_records(collection, records)?;
    }
    Ok(())
}

// =============================================================================
// Snapshot Service
// =============================================================================

/// Result of an import or restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Collections whose contents were replaced.
    pub imported: Vec<Collection>,
    /// Number of records written.
    pub records: usize,
}

/// Export, import, backup and restore over a [`CollectionStore`].
#[derive(Clone)]
pub struct SnapshotService {
    store: CollectionStore,
}

impl SnapshotService {
    pub fn new(store: CollectionStore) -> Self {
        SnapshotService { store }
    }

    /// Reads every collection in full.
    ///
    /// All collections are read inside one transaction, so the snapshot is
    /// consistent even while other commands write.
    pub async fn export_snapshot(&self) -> DbResult<Snapshot> {
        let mut tx = self.store.transaction().await?;
        let mut snapshot = Snapshot {
            export_date: Some(Utc::now().to_rfc3339()),
            version: Some(SCHEMA_VERSION),
            ..Snapshot::default()
        };

        for collection in Collection::ALL {
            snapshot.set_collection(collection, tx.read_all(collection).await?);
        }
        tx.rollback().await?;

        info!(records = snapshot.record_count(), "Snapshot exported");
        Ok(snapshot)
    }

    /// Replaces each collection present in `snapshot` with its records.
    ///
    /// ## Returns
    /// * `Ok(report)` - every present collection was replaced
    /// * `Err(DbError::InvalidSnapshot)` - malformed document, nothing written
    /// * `Err(DbError::PartialImport)` - some collections failed and were
    ///   rolled back individually; the others were replaced
    pub async fn import_snapshot(&self, snapshot: &Snapshot) -> DbResult<ImportReport> {
        validate_snapshot(snapshot)?;
        if snapshot.present().next().is_none() {
            return Err(DbError::invalid_snapshot("document contains no collections"));
        }

        let mut report = ImportReport {
            imported: Vec::new(),
            records: 0,
        };
        let mut failed = Vec::new();
        let mut cause = None;

        for (collection, records) in snapshot.present() {
            match self.replace_collection(collection, records).await {
                Ok(()) => {
                    report.imported.push(collection);
                    report.records += records.len();
                }
                Err(e) => {
                    warn!(%collection, error = %e, "Collection import failed, rolled back");
                    failed.push(collection);
                    cause.get_or_insert_with(|| e.to_string());
                }
            }
        }

        if !failed.is_empty() {
            return Err(DbError::PartialImport {
                failed,
                imported: report.imported,
                cause: cause.unwrap_or_default(),
            });
        }

        info!(
            collections = report.imported.len(),
            records = report.records,
            "Snapshot imported"
        );
        Ok(report)
    }

    async fn replace_collection(&self, collection: Collection, records: &[Value]) -> DbResult<()> {
        let mut tx = self.store.transaction().await?;
        tx.clear(collection).await?;
        for record in records {
            tx.create(collection, record.clone()).await?;
        }
        tx.commit().await
    }

    /// Replaces the whole store with a backup, atomically.
    ///
    /// ## Returns
    /// * `Ok(report)` - every collection cleared, the backup written
    /// * `Err(DbError::InvalidSnapshot)` - a required collection is missing
    ///   or a record is malformed; nothing written
    pub async fn restore_from_backup(&self, snapshot: &Snapshot) -> DbResult<ImportReport> {
        let missing: Vec<&str> = REQUIRED_FOR_RESTORE
            .iter()
            .filter(|c| snapshot.collection(**c).is_none())
            .map(|c| c.key())
            .collect();
        if !missing.is_empty() {
            return Err(DbError::invalid_snapshot(format!(
                "backup is missing {}",
                missing.join(", ")
            )));
        }
        validate_snapshot(snapshot)?;

        let mut tx = self.store.transaction().await?;
        for collection in Collection::ALL {
            tx.clear(collection).await?;
        }

        let mut report = ImportReport {
            imported: Vec::new(),
            records: 0,
        };
        for (collection, records) in snapshot.present() {
            for record in records {
                tx.create(collection, record.clone()).await?;
            }
            report.imported.push(collection);
            report.records += records.len();
        }

        tx.commit_silently().await?;
        self.store.observer().on_reload();

        info!(records = report.records, "Backup restored");
        Ok(report)
    }

    /// Empties every collection in one transaction. Settings are kept.
    pub async fn clear_all_data(&self) -> DbResult<()> {
        let mut tx = self.store.transaction().await?;
        for collection in Collection::ALL {
            tx.clear(collection).await?;
        }
        tx.commit_silently().await?;
        self.store.observer().on_reload();

        info!("All data cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Collection Store
//!
//! Generic CRUD over the named collections. Every collection is a table of
//! `(id INTEGER PRIMARY KEY AUTOINCREMENT, data TEXT)` where `data` is the
//! record as a JSON object without its `id`.
//!
//! ## Record Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller sees                         Table row                          │
//! │  ───────────                         ─────────                          │
//! │  {"id": 7, "name": "Pen", ...}  ◄──► id = 7 │ data = {"name":"Pen",...} │
//! │                                                                         │
//! │  create: id taken from the record if present (import), else assigned   │
//! │  read:   id injected back into the object                              │
//! │  update: put semantics, replaces the body or inserts it under `id`     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//! Each store method is one statement and commits on its own. For work that
//! spans several collections, [`CollectionStore::transaction`] hands out a
//! [`CollectionTransaction`] with the same operations that commits or rolls
//! back as a unit. Observers are notified only after a commit.

use serde_json::Value;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::observer::DataObserver;
use storage_core::Collection;

// =============================================================================
// Record Codec
// =============================================================================

/// A valid record id is a positive integer.
pub(crate) fn parse_id(value: &Value) -> Option<i64> {
    value.as_i64().filter(|id| *id > 0)
}

/// Splits a record into its id (if any) and the JSON body stored in `data`.
pub(crate) fn split_record(collection: Collection, record: Value) -> DbResult<(Option<i64>, String)> {
    let Value::Object(mut map) = record else {
        return Err(DbError::InvalidRecord {
            collection,
            reason: "record must be a JSON object".to_string(),
        });
    };

    let id = match map.remove("id") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(parse_id(&raw).ok_or_else(|| DbError::InvalidRecord {
            collection,
            reason: format!("id must be a positive integer, got {raw}"),
        })?),
    };

    Ok((id, serde_json::to_string(&Value::Object(map))?))
}

/// Rebuilds the caller-facing record from a table row.
pub(crate) fn join_record(collection: Collection, id: i64, data: &str) -> DbResult<Value> {
    let mut value: Value = serde_json::from_str(data)?;
    match value.as_object_mut() {
        Some(map) => {
            map.insert("id".to_string(), Value::from(id));
            Ok(value)
        }
        None => Err(DbError::InvalidRecord {
            collection,
            reason: format!("stored body of id {id} is not an object"),
        }),
    }
}

// =============================================================================
// Statements
// =============================================================================
// Table names come from `Collection::key()`, never from input.

pub(crate) async fn insert(conn: &mut SqliteConnection, collection: Collection, record: Value) -> DbResult<i64> {
    let (id, data) = split_record(collection, record)?;
    let table = collection.key();

    let id = match id {
        Some(id) => {
            sqlx::query(&format!("INSERT INTO {table} (id, data) VALUES (?, ?)"))
                .bind(id)
                .bind(&data)
                .execute(&mut *conn)
                .await?;
            id
        }
        None => sqlx::query(&format!("INSERT INTO {table} (data) VALUES (?)"))
            .bind(&data)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid(),
    };

    debug!(%collection, id, "Record inserted");
    Ok(id)
}

pub(crate) async fn fetch_all(conn: &mut SqliteConnection, collection: Collection) -> DbResult<Vec<Value>> {
    let rows: Vec<(i64, String)> =
        sqlx::query_as(&format!("SELECT id, data FROM {} ORDER BY id", collection.key()))
            .fetch_all(&mut *conn)
            .await?;

    rows.iter()
        .map(|(id, data)| join_record(collection, *id, data))
        .collect()
}

pub(crate) async fn fetch_by_id(conn: &mut SqliteConnection, collection: Collection, id: i64) -> DbResult<Option<Value>> {
    let row: Option<(i64, String)> =
        sqlx::query_as(&format!("SELECT id, data FROM {} WHERE id = ?", collection.key()))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    row.map(|(id, data)| join_record(collection, id, &data))
        .transpose()
}

/// Put semantics: the body under `id` is replaced, or inserted if absent.
/// An `id` inside `record` is ignored in favour of the argument.
pub(crate) async fn put(conn: &mut SqliteConnection, collection: Collection, id: i64, record: Value) -> DbResult<()> {
    if id <= 0 {
        return Err(DbError::InvalidRecord {
            collection,
            reason: format!("id must be a positive integer, got {id}"),
        });
    }
    let (_, data) = split_record(collection, record)?;

    sqlx::query(&format!(
        "INSERT INTO {} (id, data) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        collection.key()
    ))
    .bind(id)
    .bind(&data)
    .execute(&mut *conn)
    .await?;

    debug!(%collection, id, "Record stored");
    Ok(())
}

/// Deleting an id that does not exist succeeds.
pub(crate) async fn delete(conn: &mut SqliteConnection, collection: Collection, id: i64) -> DbResult<()> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", collection.key()))
        .bind(id)
        .execute(&mut *conn)
        .await?;

    debug!(%collection, id, removed = result.rows_affected(), "Record deleted");
    Ok(())
}

pub(crate) async fn clear(conn: &mut SqliteConnection, collection: Collection) -> DbResult<()> {
    let result = sqlx::query(&format!("DELETE FROM {}", collection.key()))
        .execute(&mut *conn)
        .await?;

    debug!(%collection, removed = result.rows_affected(), "Collection cleared");
    Ok(())
}

pub(crate) async fn count(conn: &mut SqliteConnection, collection: Collection) -> DbResult<u64> {
    let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", collection.key()))
        .fetch_one(&mut *conn)
        .await?;
    Ok(n as u64)
}

// =============================================================================
// Collection Store
// =============================================================================

/// Store for untyped (JSON) records across every collection.
///
/// ## Example
/// ```rust,ignore
/// let store = db.store();
/// let id = store.create(Collection::Products, json!({"name": "Pen", "quantity": 3})).await?;
/// let pen = store.read_by_id(Collection::Products, id).await?;
/// ```
#[derive(Clone)]
pub struct CollectionStore {
    pool: SqlitePool,
    observer: Arc<dyn DataObserver>,
}

impl CollectionStore {
    pub fn new(pool: SqlitePool, observer: Arc<dyn DataObserver>) -> Self {
        CollectionStore { pool, observer }
    }

    /// Inserts a record and returns its id.
    ///
    /// A positive integer `id` in the record is kept; reusing an existing
    /// id fails with [`DbError::UniqueViolation`].
    pub async fn create(&self, collection: Collection, record: Value) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        let id = insert(&mut conn, collection, record).await?;
        self.observer.on_data_changed(collection);
        Ok(id)
    }

    /// Every record, ordered by id.
    pub async fn read_all(&self, collection: Collection) -> DbResult<Vec<Value>> {
        let mut conn = self.pool.acquire().await?;
        fetch_all(&mut conn, collection).await
    }

    pub async fn read_by_id(&self, collection: Collection, id: i64) -> DbResult<Option<Value>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, collection, id).await
    }

    /// Replaces the record under `id`, inserting it if absent.
    pub async fn update(&self, collection: Collection, id: i64, record: Value) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        put(&mut conn, collection, id, record).await?;
        self.observer.on_data_changed(collection);
        Ok(())
    }

    /// Removes the record under `id`. Missing ids are not an error.
    pub async fn delete(&self, collection: Collection, id: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        delete(&mut conn, collection, id).await?;
        self.observer.on_data_changed(collection);
        Ok(())
    }

    /// Removes every record of `collection`. Ids are not reused afterwards.
    pub async fn clear(&self, collection: Collection) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        clear(&mut conn, collection).await?;
        self.observer.on_data_changed(collection);
        Ok(())
    }

    pub async fn count(&self, collection: Collection) -> DbResult<u64> {
        let mut conn = self.pool.acquire().await?;
        count(&mut conn, collection).await
    }

    /// Starts a transaction spanning any number of collections.
    pub async fn transaction(&self) -> DbResult<CollectionTransaction> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(CollectionTransaction {
            tx,
            observer: Arc::clone(&self.observer),
            changed: Vec::new(),
        })
    }

    pub(crate) fn observer(&self) -> &Arc<dyn DataObserver> {
        &self.observer
    }
}

// =============================================================================
// Collection Transaction
// =============================================================================

/// A multi-collection transaction.
///
/// Dropping it without [`commit`](Self::commit) rolls everything back.
pub struct CollectionTransaction {
    tx: Transaction<'static, Sqlite>,
    observer: Arc<dyn DataObserver>,
    changed: Vec<Collection>,
}

impl CollectionTransaction {
    fn touch(&mut self, collection: Collection) {
        if !self.changed.contains(&collection) {
            self.changed.push(collection);
        }
    }

    pub async fn create(&mut self, collection: Collection, record: Value) -> DbResult<i64> {
        let id = insert(&mut self.tx, collection, record).await?;
        self.touch(collection);
        Ok(id)
    }

    pub async fn read_all(&mut self, collection: Collection) -> DbResult<Vec<Value>> {
        fetch_all(&mut self.tx, collection).await
    }

    pub async fn read_by_id(&mut self, collection: Collection, id: i64) -> DbResult<Option<Value>> {
        fetch_by_id(&mut self.tx, collection, id).await
    }

    pub async fn update(&mut self, collection: Collection, id: i64, record: Value) -> DbResult<()> {
        put(&mut self.tx, collection, id, record).await?;
        self.touch(collection);
        Ok(())
    }

    pub async fn delete(&mut self, collection: Collection, id: i64) -> DbResult<()> {
        delete(&mut self.tx, collection, id).await?;
        self.touch(collection);
        Ok(())
    }

    pub async fn clear(&mut self, collection: Collection) -> DbResult<()> {
        clear(&mut self.tx, collection).await?;
        self.touch(collection);
        Ok(())
    }

    pub async fn count(&mut self, collection: Collection) -> DbResult<u64> {
        count(&mut self.tx, collection).await
    }

    /// Commits, then tells the observer about every collection touched.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        for collection in self.changed {
            self.observer.on_data_changed(collection);
        }
        Ok(())
    }

    /// Commits without notifying per collection (the caller signals a reload).
    pub(crate) async fn commit_silently(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        changed: Mutex<Vec<Collection>>,
    }

    impl DataObserver for RecordingObserver {
        fn on_data_changed(&self, collection: Collection) {
            self.changed.lock().unwrap().push(collection);
        }
        fn on_reload(&self) {}
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_split_record_rejects_bad_ids() {
        assert!(split_record(Collection::Products, json!({"id": 0})).is_err());
        assert!(split_record(Collection::Products, json!({"id": "3"})).is_err());
        assert!(split_record(Collection::Products, json!([1, 2])).is_err());

        let (id, body) = split_record(Collection::Products, json!({"id": 3, "name": "Pen"})).unwrap();
        assert_eq!(id, Some(3));
        assert_eq!(body, r#"{"name":"Pen"}"#);
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let store = test_db().await.store();

        let id = store
            .create(Collection::Products, json!({"name": "Pen", "quantity": 3}))
            .await
            .unwrap();
        let pen = store.read_by_id(Collection::Products, id).await.unwrap().unwrap();
        assert_eq!(pen, json!({"id": id, "name": "Pen", "quantity": 3}));

        store
            .update(Collection::Products, id, json!({"name": "Pen", "quantity": 1}))
            .await
            .unwrap();
        let pen = store.read_by_id(Collection::Products, id).await.unwrap().unwrap();
        assert_eq!(pen["quantity"], 1);

        store.delete(Collection::Products, id).await.unwrap();
        assert!(store.read_by_id(Collection::Products, id).await.unwrap().is_none());

        // Deleting again is fine
        store.delete(Collection::Products, id).await.unwrap();
    }

    #[tokio::test]
    async fn test_explicit_ids_are_kept_and_reads_are_ordered() {
        let store = test_db().await.store();

        store.create(Collection::Suppliers, json!({"id": 10, "name": "B"})).await.unwrap();
        store.create(Collection::Suppliers, json!({"id": 2, "name": "A"})).await.unwrap();
        let next = store.create(Collection::Suppliers, json!({"name": "C"})).await.unwrap();
        assert_eq!(next, 11);

        let ids: Vec<i64> = store
            .read_all(Collection::Suppliers)
            .await
            .unwrap()
            .iter()
            .map(|v| v["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 10, 11]);

        let dup = store.create(Collection::Suppliers, json!({"id": 2})).await;
        assert!(matches!(dup, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_update_inserts_when_absent() {
        let store = test_db().await.store();
        store.update(Collection::Documents, 5, json!({"title": "T"})).await.unwrap();
        assert_eq!(store.count(Collection::Documents).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_does_not_reuse_ids() {
        let store = test_db().await.store();
        let first = store.create(Collection::Sales, json!({})).await.unwrap();
        store.clear(Collection::Sales).await.unwrap();
        assert_eq!(store.count(Collection::Sales).await.unwrap(), 0);

        let second = store.create(Collection::Sales, json!({})).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_drop() {
        let store = test_db().await.store();
        store.create(Collection::Products, json!({"name": "Keep"})).await.unwrap();

        {
            let mut tx = store.transaction().await.unwrap();
            tx.clear(Collection::Products).await.unwrap();
            tx.create(Collection::Sales, json!({"x": 1})).await.unwrap();
            // dropped without commit
        }

        assert_eq!(store.count(Collection::Products).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Sales).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_observer_fires_after_commit_only() {
        let observer = Arc::new(RecordingObserver::default());
        let db = test_db().await.with_observer(observer.clone());
        let store = db.store();

        store.create(Collection::Products, json!({"name": "Pen"})).await.unwrap();
        assert_eq!(*observer.changed.lock().unwrap(), vec![Collection::Products]);

        let mut tx = store.transaction().await.unwrap();
        tx.create(Collection::Sales, json!({})).await.unwrap();
        tx.create(Collection::Sales, json!({})).await.unwrap();
        assert_eq!(observer.changed.lock().unwrap().len(), 1);
        tx.commit().await.unwrap();

        assert_eq!(
            *observer.changed.lock().unwrap(),
            vec![Collection::Products, Collection::Sales]
        );
    }
}

//! # Typed Records
//!
//! [`RecordStore<R>`] wraps the untyped collection store for one record
//! type, converting through `serde_json::Value` at the boundary.

use serde_json::Value;
use std::marker::PhantomData;

use super::collection::{CollectionStore, CollectionTransaction};
use crate::error::{DbError, DbResult};
use storage_core::types::Record;

/// Serializes a record for the store.
pub fn encode<R: Record>(record: &R) -> DbResult<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Decodes a stored record, reporting the collection on failure.
pub fn decode<R: Record>(value: Value) -> DbResult<R> {
    serde_json::from_value(value).map_err(|e| DbError::InvalidRecord {
        collection: R::COLLECTION,
        reason: e.to_string(),
    })
}

/// Store for one record type.
///
/// ## Example
/// ```rust,ignore
/// let products = db.records::<Product>();
/// let pen = products.create(&Product::new("Pen", cost, price, 10)).await?;
/// assert!(pen.id.is_some());
/// ```
#[derive(Clone)]
pub struct RecordStore<R: Record> {
    store: CollectionStore,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    pub fn new(store: CollectionStore) -> Self {
        RecordStore {
            store,
            _marker: PhantomData,
        }
    }

    /// Inserts `record` and returns it with its assigned id.
    pub async fn create(&self, record: &R) -> DbResult<R> {
        let id = self.store.create(R::COLLECTION, encode(record)?).await?;
        let mut stored = record.clone();
        stored.set_id(id);
        Ok(stored)
    }

    /// Every record, ordered by id.
    ///
    /// Fails with `InvalidRecord` if any stored body does not decode.
    pub async fn all(&self) -> DbResult<Vec<R>> {
        self.store
            .read_all(R::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<R>> {
        self.store
            .read_by_id(R::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Like [`get`](Self::get) but a missing record is `NotFound`.
    pub async fn require(&self, id: i64) -> DbResult<R> {
        self.get(id)
            .await?
            .ok_or_else(|| DbError::not_found(R::COLLECTION.to_string(), id))
    }

    /// Stores `record` under `id` and returns it with that id set.
    pub async fn update(&self, id: i64, record: &R) -> DbResult<R> {
        self.store.update(R::COLLECTION, id, encode(record)?).await?;
        let mut stored = record.clone();
        stored.set_id(id);
        Ok(stored)
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        self.store.delete(R::COLLECTION, id).await
    }

    pub async fn clear(&self) -> DbResult<()> {
        self.store.clear(R::COLLECTION).await
    }

    pub async fn count(&self) -> DbResult<u64> {
        self.store.count(R::COLLECTION).await
    }
}

// ===== Typed access inside a transaction =====

impl CollectionTransaction {
    pub async fn create_record<R: Record>(&mut self, record: &R) -> DbResult<R> {
        let id = self.create(R::COLLECTION, encode(record)?).await?;
        let mut stored = record.clone();
        stored.set_id(id);
        Ok(stored)
    }

    pub async fn get_record<R: Record>(&mut self, id: i64) -> DbResult<Option<R>> {
        self.read_by_id(R::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn update_record<R: Record>(&mut self, id: i64, record: &R) -> DbResult<()> {
        self.update(R::COLLECTION, id, encode(record)?).await
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
    use storage_core::{Collection, Money, Product};

    #[tokio::test]
    async fn test_typed_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.records::<Product>();

        let pen = products
            .create(&Product::new("Pen", Money::from_cents(50), Money::from_cents(120), 10))
            .await
            .unwrap();
        let id = pen.id.unwrap();

        let loaded = products.require(id).await.unwrap();
        assert_eq!(loaded, pen);
        assert_eq!(products.count().await.unwrap(), 1);

        products.delete(id).await.unwrap();
        assert!(matches!(products.require(id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_undecodable_record_is_reported() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.store()
            .create(Collection::Products, json!({"name": "Broken"}))
            .await
            .unwrap();

        let result = db.records::<Product>().all().await;
        assert!(matches!(
            result,
            Err(DbError::InvalidRecord { collection: Collection::Products, .. })
        ));
    }
}

//! # Sale Repository
//!
//! Settlement of a checkout and read access to the sales history.
//!
//! ## Settlement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       settle(sale)                                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   for each item:                                                        │
//! │     load live product ──── missing? ──► NotFound, ROLLBACK             │
//! │     take_stock(quantity) ─ short?   ──► StockConflict, ROLLBACK        │
//! │     write product back                                                  │
//! │   insert sale                                                           │
//! │  COMMIT ──► on_data_changed(Products), on_data_changed(Sales)          │
//! │                                                                         │
//! │  A failure on the last item rolls back every earlier decrement.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};

use super::collection::CollectionStore;
use super::record::RecordStore;
use crate::error::{DbError, DbResult};
use storage_core::cart::take_stock;
use storage_core::filter::newest_sales_first;
use storage_core::{Collection, CoreError, Product, Sale};

/// Outcome of a committed settlement.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// The stored sale, with its id.
    pub sale: Sale,
    /// Products after their stock was decremented.
    pub products: Vec<Product>,
}

/// Repository for sale database operations.
#[derive(Clone)]
pub struct SaleRepository {
    store: CollectionStore,
}

impl SaleRepository {
    pub fn new(store: CollectionStore) -> Self {
        SaleRepository { store }
    }

    /// Decrements stock for every item and records the sale, atomically.
    ///
    /// ## Returns
    /// * `Ok(Settlement)` - committed
    /// * `Err(DbError::NotFound)` - a product was deleted since it was added
    /// * `Err(DbError::StockConflict)` - live stock no longer covers an item
    ///
    /// On error nothing is written.
    pub async fn settle(&self, sale: Sale) -> DbResult<Settlement> {
        if sale.items.is_empty() {
            return Err(DbError::InvalidRecord {
                collection: Collection::Sales,
                reason: "sale has no items".to_string(),
            });
        }

        let mut tx = self.store.transaction().await?;
        let mut products: Vec<Product> = Vec::with_capacity(sale.items.len());
        let now = Utc::now();

        for item in &sale.items {
            let mut product: Product = tx
                .get_record(item.product_id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", item.product_id))?;

            take_stock(&mut product, item.quantity).map_err(|e| match e {
                CoreError::InsufficientStock {
                    product_id,
                    name,
                    available,
                    requested,
                } => DbError::StockConflict {
                    product_id,
                    name,
                    available,
                    requested,
                },
                other => DbError::Internal(other.to_string()),
            })?;
            product.updated_at = Some(now);

            tx.update_record(item.product_id, &product).await?;
            debug!(
                product_id = item.product_id,
                remaining = product.quantity,
                "Stock decremented"
            );
            products.push(product);
        }

        let sale = tx.create_record(&sale).await?;
        tx.commit().await?;

        info!(
            sale_id = sale.id.unwrap_or_default(),
            items = sale.items.len(),
            total = %sale.total_amount,
            "Sale settled"
        );

        Ok(Settlement { sale, products })
    }

    pub async fn get(&self, id: i64) -> DbResult<Option<Sale>> {
        self.records().get(id).await
    }

    /// Every sale, newest first.
    pub async fn history(&self) -> DbResult<Vec<Sale>> {
        let mut sales = self.records().all().await?;
        newest_sales_first(&mut sales);
        Ok(sales)
    }

    fn records(&self) -> RecordStore<Sale> {
        RecordStore::new(self.store.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

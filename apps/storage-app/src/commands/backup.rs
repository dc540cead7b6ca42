//! # Backup Commands
//!
//! Export, import, backup and restore of the whole store, plus clear-all.
//!
//! ## After a Bulk Write
//! ```text
//! import / restore / clear-all
//!      │
//!      ├── products replaced? ──► clear cart (lines may point at gone ids)
//!      │
//!      └── alert re-check
//! ```
//!
//! A document that fails validation writes nothing, so neither step runs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::ApiResult;
use crate::context::AppContext;
use storage_core::Collection;
use storage_db::{parse_snapshot, DbError, ImportReport, Snapshot};

/// Current contents of every collection.
pub async fn export_data(ctx: &AppContext) -> ApiResult<Snapshot> {
    Ok(ctx.db().snapshots().export_snapshot().await?)
}

/// Export document as pretty JSON.
pub async fn export_json(ctx: &AppContext) -> ApiResult<String> {
    Ok(export_data(ctx).await?.to_json_pretty()?)
}

/// Writes the export document to `path`. Returns the record count.
pub async fn export_to_file(ctx: &AppContext, path: &Path) -> ApiResult<usize> {
    let snapshot = export_data(ctx).await?;
    std::fs::write(path, snapshot.to_json_pretty()?)?;
    info!(path = %path.display(), records = snapshot.record_count(), "Export written");
    Ok(snapshot.record_count())
}

/// `storage_backup_2024-05-01.json`
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("storage_backup_{}.json", at.format("%Y-%m-%d"))
}

/// Writes a dated backup into `dir` and returns its path.
pub async fn create_backup(ctx: &AppContext, dir: &Path) -> ApiResult<PathBuf> {
    let path = dir.join(backup_file_name(Utc::now()));
    export_to_file(ctx, &path).await?;
    Ok(path)
}

/// Imports an export document. Only the collections it contains change.
pub async fn import_json(ctx: &AppContext, text: &str) -> ApiResult<ImportReport> {
    let snapshot = parse_snapshot(text)?;
    let result = ctx.db().snapshots().import_snapshot(&snapshot).await;

    let imported = match &result {
        Ok(report) => report.imported.clone(),
        Err(DbError::PartialImport { imported, .. }) => imported.clone(),
        Err(_) => Vec::new(),
    };
    if !imported.is_empty() {
        after_bulk_write(ctx, imported.contains(&Collection::Products)).await;
    }

    Ok(result?)
}

pub async fn import_from_file(ctx: &AppContext, path: &Path) -> ApiResult<ImportReport> {
    let text = std::fs::read_to_string(path)?;
    import_json(ctx, &text).await
}

/// Replaces the whole store with a backup document.
pub async fn restore_json(ctx: &AppContext, text: &str) -> ApiResult<ImportReport> {
    let snapshot = parse_snapshot(text)?;
    let report = ctx.db().snapshots().restore_from_backup(&snapshot).await?;
    after_bulk_write(ctx, true).await;
    Ok(report)
}

pub async fn restore_from_file(ctx: &AppContext, path: &Path) -> ApiResult<ImportReport> {
    let text = std::fs::read_to_string(path)?;
    restore_json(ctx, &text).await
}

/// Empties every collection. Settings and the notification log are kept.
pub async fn clear_all_data(ctx: &AppContext) -> ApiResult<()> {
    ctx.db().snapshots().clear_all_data().await?;
    after_bulk_write(ctx, true).await;
    Ok(())
}

async fn after_bulk_write(ctx: &AppContext, products_replaced: bool) {
    if products_replaced {
        ctx.cart().with_cart_mut(|cart| cart.clear());
    }
    ctx.recheck_alerts().await;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::alerts::check_alerts;
    use crate::commands::cart::{add_to_cart, get_cart};
    use crate::commands::product::list_products;
    use crate::commands::sale::complete_sale;
    use crate::error::ErrorCode;
    use crate::test_support::{seed_product, test_context};
    use serde_json::json;
    use storage_core::filter::ProductFilter;
    use storage_core::{PaymentMethod, Product};

    #[tokio::test]
    async fn test_export_then_import_is_lossless() {
        let source = test_context().await;
        let pen = seed_product(&source, "Pen", 7).await;
        seed_product(&source, "Pad", 1).await;
        add_to_cart(&source, pen.id.unwrap()).await.unwrap();
        complete_sale(&source, "Anna", PaymentMethod::Cash).await.unwrap();

        let text = export_json(&source).await.unwrap();

        let target = test_context().await;
        let report = import_json(&target, &text).await.unwrap();
        assert_eq!(report.imported.len(), Collection::ALL.len());

        let before = export_data(&source).await.unwrap();
        let after = export_data(&target).await.unwrap();
        for collection in Collection::ALL {
            assert_eq!(before.collection(collection), after.collection(collection));
        }
        assert_eq!(target.engine().status().await.low_stock_count, 1);
    }

    #[tokio::test]
    async fn test_import_leaves_absent_collections() {
        let ctx = test_context().await;
        seed_product(&ctx, "Pen", 9).await;

        let text = json!({ "suppliers": [{ "id": 1, "type": "company", "name": "Acme" }] }).to_string();
        let report = import_json(&ctx, &text).await.unwrap();
        assert_eq!(report.imported, vec![Collection::Suppliers]);
        assert_eq!(ctx.db().records::<Product>().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_product_import_is_rejected() {
        let ctx = test_context().await;
        seed_product(&ctx, "Pen", 9).await;

        let err = import_json(&ctx, r#"{"warehouse": [{"id": 1, "name": "Pen"}]}"#)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let products = list_products(&ctx, &ProductFilter::default()).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 9);
        check_alerts(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_restore_writes_nothing() {
        let ctx = test_context().await;
        let pen = seed_product(&ctx, "Pen", 9).await;
        add_to_cart(&ctx, pen.id.unwrap()).await.unwrap();

        let missing_sales = json!({ "warehouse": [], "suppliers": [], "documents": [] }).to_string();
        let err = restore_json(&ctx, &missing_sales).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("sales"));

        let err = restore_json(&ctx, "not json").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(ctx.db().records::<Product>().count().await.unwrap(), 1);
        assert_eq!(get_cart(&ctx).lines.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_replaces_and_clears_cart() {
        let ctx = test_context().await;
        let pen = seed_product(&ctx, "Pen", 9).await;
        add_to_cart(&ctx, pen.id.unwrap()).await.unwrap();

        let backup = json!({
            "warehouse": [{ "id": 5, "name": "Ink", "purchasePrice": 1, "salePrice": 2, "quantity": 0 }],
            "suppliers": [],
            "sales": [],
            "documents": []
        })
        .to_string();
        let report = restore_json(&ctx, &backup).await.unwrap();
        assert_eq!(report.records, 1);

        let products = ctx.db().records::<Product>().all().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, Some(5));
        assert!(get_cart(&ctx).lines.is_empty());
        assert_eq!(ctx.engine().status().await.out_of_stock_count, 1);
    }

    #[tokio::test]
    async fn test_file_round_trip_and_clear_all() {
        let ctx = test_context().await;
        seed_product(&ctx, "Pen", 9).await;

        let dir = tempfile::tempdir().unwrap();
        let path = create_backup(&ctx, dir.path()).await.unwrap();
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("storage_backup_")));

        clear_all_data(&ctx).await.unwrap();
        assert_eq!(ctx.db().records::<Product>().count().await.unwrap(), 0);

        restore_from_file(&ctx, &path).await.unwrap();
        assert_eq!(ctx.db().records::<Product>().count().await.unwrap(), 1);
    }
}

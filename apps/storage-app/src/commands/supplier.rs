//! # Supplier Commands

use chrono::Utc;
use tracing::info;

use super::ApiResult;
use crate::context::AppContext;
use storage_core::filter::SupplierFilter;
use storage_core::validation::validate_supplier;
use storage_core::Supplier;

pub async fn list_suppliers(ctx: &AppContext, filter: &SupplierFilter) -> ApiResult<Vec<Supplier>> {
    let suppliers = ctx.db().records::<Supplier>().all().await?;
    Ok(filter.apply(suppliers))
}

pub async fn get_supplier(ctx: &AppContext, id: i64) -> ApiResult<Supplier> {
    Ok(ctx.db().records::<Supplier>().require(id).await?)
}

/// Stores a new supplier. Any id on `supplier` is ignored.
pub async fn create_supplier(ctx: &AppContext, mut supplier: Supplier) -> ApiResult<Supplier> {
    validate_supplier(&supplier)?;
    let now = Utc::now();
    supplier.id = None;
    supplier.created_at = Some(now);
    supplier.updated_at = Some(now);

    let supplier = ctx.db().records::<Supplier>().create(&supplier).await?;
    info!(id = supplier.id, name = %supplier.display_name(), "Supplier created");
    Ok(supplier)
}

/// Replaces an existing supplier, keeping its creation time.
pub async fn update_supplier(ctx: &AppContext, id: i64, mut supplier: Supplier) -> ApiResult<Supplier> {
    validate_supplier(&supplier)?;
    let records = ctx.db().records::<Supplier>();
    let existing = records.require(id).await?;

    supplier.id = Some(id);
    supplier.created_at = existing.created_at;
    supplier.updated_at = Some(Utc::now());

    let supplier = records.update(id, &supplier).await?;
    info!(id, "Supplier updated");
    Ok(supplier)
}

pub async fn delete_supplier(ctx: &AppContext, id: i64) -> ApiResult<()> {
    ctx.db().records::<Supplier>().delete(id).await?;
    info!(id, "Supplier deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

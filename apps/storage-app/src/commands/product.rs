//! # Product Commands
//!
//! Warehouse list and product CRUD.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Write Flow                                   │
//! │                                                                         │
//! │  ProductInput ──► validate_product ──► store ──► on_data_changed        │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                          alert re-check (stock may      │
//! │                                          have crossed a band)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::ApiResult;
use crate::context::AppContext;
use storage_core::filter::ProductFilter;
use storage_core::validation::validate_product;
use storage_core::{Money, Product};

/// Editable product fields, as sent by the product form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub purchase_price: Money,
    pub sale_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub supplier: Option<String>,
}

impl ProductInput {
    fn apply_to(self, product: &mut Product) {
        product.name = self.name.trim().to_string();
        product.purchase_price = self.purchase_price;
        product.sale_price = self.sale_price;
        product.quantity = self.quantity;
        product.supplier = self.supplier.filter(|s| !s.trim().is_empty());
    }
}

/// Lists products matching `filter`, ordered by id.
pub async fn list_products(ctx: &AppContext, filter: &ProductFilter) -> ApiResult<Vec<Product>> {
    let products = ctx.db().records::<Product>().all().await?;
    Ok(filter.apply(products))
}

pub async fn get_product(ctx: &AppContext, id: i64) -> ApiResult<Product> {
    Ok(ctx.db().records::<Product>().require(id).await?)
}

/// Creates a product.
///
/// ## Returns
/// The stored product with its id.
pub async fn create_product(ctx: &AppContext, input: ProductInput) -> ApiResult<Product> {
    let now = Utc::now();
    let mut product = Product::new("", Money::zero(), Money::zero(), 0);
    input.apply_to(&mut product);
    product.created_at = Some(now);
    product.updated_at = Some(now);
    validate_product(&product)?;

    let product = ctx.db().records::<Product>().create(&product).await?;
    info!(id = product.id, name = %product.name, "Product created");

    ctx.recheck_alerts().await;
    Ok(product)
}

/// Replaces the editable fields of an existing product.
pub async fn update_product(ctx: &AppContext, id: i64, input: ProductInput) -> ApiResult<Product> {
    let records = ctx.db().records::<Product>();
    let mut product = records.require(id).await?;
    input.apply_to(&mut product);
    product.updated_at = Some(Utc::now());
    validate_product(&product)?;

    let product = records.update(id, &product).await?;
    info!(id, quantity = product.quantity, "Product updated");

    ctx.recheck_alerts().await;
    Ok(product)
}

pub async fn delete_product(ctx: &AppContext, id: i64) -> ApiResult<()> {
    ctx.db().records::<Product>().delete(id).await?;
    ctx.cart().with_cart_mut(|cart| cart.remove_line(id));
    info!(id, "Product deleted");

    ctx.recheck_alerts().await;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_context;
    use storage_core::stock::StockFilter;

    fn input(name: &str, quantity: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            purchase_price: Money::from_cents(100),
            sale_price: Money::from_cents(150),
            quantity,
            supplier: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_filter() {
        let ctx = test_context().await;
        create_product(&ctx, input("Blue pen", 10)).await.unwrap();
        create_product(&ctx, input("Red pen", 2)).await.unwrap();
        create_product(&ctx, input("Notebook", 0)).await.unwrap();

        let pens = ProductFilter {
            query: Some("PEN".into()),
            ..Default::default()
        };
        assert_eq!(list_products(&ctx, &pens).await.unwrap().len(), 2);

        let low = ProductFilter {
            stock: StockFilter::LowStock,
            ..Default::default()
        };
        let names: Vec<_> = list_products(&ctx, &low)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Red pen"]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let ctx = test_context().await;
        let err = create_product(&ctx, input("  ", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_product(&ctx, input("Pen", -1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(ctx.db().records::<Product>().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_writes_refresh_alerts() {
        let ctx = test_context().await;
        let product = create_product(&ctx, input("Pen", 3)).await.unwrap();
        assert_eq!(ctx.engine().status().await.low_stock_count, 1);

        update_product(&ctx, product.id.unwrap(), input("Pen", 0))
            .await
            .unwrap();
        let status = ctx.engine().status().await;
        assert_eq!(status.low_stock_count, 0);
        assert_eq!(status.out_of_stock_count, 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let ctx = test_context().await;
        let err = update_product(&ctx, 42, input("Pen", 1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}

//! # Cart Commands
//!
//! Cart manipulation. Each command returns the full cart so the UI can
//! redraw in one go.
//!
//! ## Add Flow
//! ```text
//! add_to_cart(product_id)
//!      │
//!      ▼
//! load current product ── missing? ──► NOT_FOUND
//!      │
//!      ▼
//! cart.add_line(&product)
//!      ├── stock 0        ──► OUT_OF_STOCK
//!      ├── line at max    ──► INSUFFICIENT_STOCK
//!      └── ok             ──► CartResponse
//! ```

use tracing::debug;

use super::ApiResult;
use crate::context::AppContext;
use crate::error::ApiError;
use crate::state::CartResponse;
use storage_core::Product;

pub fn get_cart(ctx: &AppContext) -> CartResponse {
    ctx.cart().snapshot()
}

/// Adds one unit of a product.
pub async fn add_to_cart(ctx: &AppContext, product_id: i64) -> ApiResult<CartResponse> {
    let product = ctx
        .db()
        .records::<Product>()
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    let response = ctx.cart().with_cart_mut(|cart| {
        cart.add_line(&product)?;
        Ok::<_, ApiError>(CartResponse::from(&*cart))
    })?;

    debug!(product_id, lines = response.lines.len(), "Added to cart");
    Ok(response)
}

/// Sets the quantity of a line already in the cart.
pub fn set_cart_quantity(ctx: &AppContext, product_id: i64, quantity: i64) -> ApiResult<CartResponse> {
    ctx.cart().with_cart_mut(|cart| {
        cart.set_line_quantity(product_id, quantity)?;
        Ok::<_, ApiError>(CartResponse::from(&*cart))
    })
}

pub fn remove_from_cart(ctx: &AppContext, product_id: i64) -> CartResponse {
    ctx.cart().with_cart_mut(|cart| {
        cart.remove_line(product_id);
        CartResponse::from(&*cart)
    })
}

pub fn clear_cart(ctx: &AppContext) -> CartResponse {
    ctx.cart().with_cart_mut(|cart| {
        cart.clear();
        CartResponse::from(&*cart)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{seed_product, test_context};
    use storage_core::Money;

    #[tokio::test]
    async fn test_stock_three_scenario() {
        let ctx = test_context().await;
        let pen = seed_product(&ctx, "Pen", 3).await;
        let id = pen.id.unwrap();

        for _ in 0..3 {
            add_to_cart(&ctx, id).await.unwrap();
        }
        let err = add_to_cart(&ctx, id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let cart = get_cart(&ctx);
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.totals.total_amount, Money::from_cents(750));
    }

    #[tokio::test]
    async fn test_add_rejects_missing_and_empty_products() {
        let ctx = test_context().await;
        let empty = seed_product(&ctx, "Ghost", 0).await;

        assert_eq!(add_to_cart(&ctx, 99).await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(
            add_to_cart(&ctx, empty.id.unwrap()).await.unwrap_err().code,
            ErrorCode::OutOfStock
        );
        assert!(get_cart(&ctx).lines.is_empty());
    }

    #[tokio::test]
    async fn test_quantity_bounds() {
        let ctx = test_context().await;
        let pen = seed_product(&ctx, "Pen", 4).await;
        let id = pen.id.unwrap();
        add_to_cart(&ctx, id).await.unwrap();

        assert_eq!(set_cart_quantity(&ctx, id, 4).unwrap().totals.total_quantity, 4);
        for bad in [0, -1, 5] {
            let err = set_cart_quantity(&ctx, id, bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidQuantity);
        }
        assert_eq!(get_cart(&ctx).lines[0].quantity, 4);

        assert_eq!(
            set_cart_quantity(&ctx, 77, 1).unwrap_err().code,
            ErrorCode::CartError
        );
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let ctx = test_context().await;
        let a = seed_product(&ctx, "A", 5).await;
        let b = seed_product(&ctx, "B", 5).await;
        add_to_cart(&ctx, a.id.unwrap()).await.unwrap();
        add_to_cart(&ctx, b.id.unwrap()).await.unwrap();

        assert_eq!(remove_from_cart(&ctx, a.id.unwrap()).lines.len(), 1);
        assert_eq!(remove_from_cart(&ctx, 12345).lines.len(), 1);
        assert!(clear_cart(&ctx).lines.is_empty());
    }
}

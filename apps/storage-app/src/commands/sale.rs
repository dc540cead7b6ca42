//! # Sale Commands
//!
//! Checkout, sales history and receipts.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    complete_sale()                                      │
//! │                                                                         │
//! │  cart.to_sale() ── empty? ──► EMPTY_CART (nothing written)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sales().settle(sale)    one transaction over products + sales          │
//! │       ├── short stock  ──► INSUFFICIENT_STOCK (cart kept)               │
//! │       ├── product gone ──► NOT_FOUND (cart kept)                        │
//! │       ▼                                                                 │
//! │  clear cart ──► raise "Sale completed" ──► alert re-check               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CompletedSale { sale, receipt }                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::ApiResult;
use crate::context::AppContext;
use crate::error::ApiError;
use storage_core::receipt::{receipt_file_name, render_receipt};
use storage_core::{PaymentMethod, Sale};

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSale {
    pub sale: Sale,
    /// Receipt text, ready to print or save.
    pub receipt: String,
}

/// Settles the cart into a sale.
///
/// ## Arguments
/// * `customer_name` - blank is stored as "Not specified"
/// * `payment_method` - cash, card or transfer
///
/// ## Returns
/// The stored sale and its receipt. The cart is empty afterwards. On any
/// error the cart and the store are unchanged.
pub async fn complete_sale(
    ctx: &AppContext,
    customer_name: &str,
    payment_method: PaymentMethod,
) -> ApiResult<CompletedSale> {
    let sale = ctx
        .cart()
        .with_cart(|cart| cart.to_sale(customer_name, payment_method, Utc::now()))?;

    let settlement = ctx.db().sales().settle(sale).await?;
    let sale = settlement.sale;

    ctx.cart().with_cart_mut(|cart| cart.clear());

    info!(
        sale_id = sale.id,
        customer = %sale.customer_name,
        payment = ?sale.payment_method,
        total = %sale.total_amount,
        "Sale completed"
    );

    if let Err(e) = ctx.engine().raise_sale(&sale).await {
        warn!(error = %e, "Sale notification failed");
    }
    ctx.recheck_alerts().await;

    let receipt = render_receipt(&sale, ctx.currency_symbol());
    Ok(CompletedSale { sale, receipt })
}

/// Every sale, newest first.
pub async fn sales_history(ctx: &AppContext) -> ApiResult<Vec<Sale>> {
    Ok(ctx.db().sales().history().await?)
}

pub async fn get_sale(ctx: &AppContext, id: i64) -> ApiResult<Sale> {
    ctx.db()
        .sales()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

/// Receipt text for an existing sale (reprint).
pub async fn receipt_text(ctx: &AppContext, sale_id: i64) -> ApiResult<String> {
    let sale = get_sale(ctx, sale_id).await?;
    Ok(render_receipt(&sale, ctx.currency_symbol()))
}

/// Writes the receipt of `sale_id` into `dir` and returns the file path.
pub async fn save_receipt(ctx: &AppContext, sale_id: i64, dir: &Path) -> ApiResult<PathBuf> {
    let sale = get_sale(ctx, sale_id).await?;
    let path = dir.join(receipt_file_name(&sale));
    std::fs::write(&path, render_receipt(&sale, ctx.currency_symbol()))?;
    info!(sale_id, path = %path.display(), "Receipt saved");
    Ok(path)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, get_cart, set_cart_quantity};
    use crate::error::ErrorCode;
    use crate::test_support::{seed_product, test_context};
    use storage_core::{Collection, Money, NotificationCategory, Product};

    #[tokio::test]
    async fn test_empty_cart_checkout_writes_nothing() {
        let ctx = test_context().await;
        let err = complete_sale(&ctx, "Anna", PaymentMethod::Cash).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(ctx.db().store().count(Collection::Sales).await.unwrap(), 0);
        assert!(ctx.engine().notifications(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_stock_three_checkout() {
        let ctx = test_context().await;
        let pen = seed_product(&ctx, "Pen", 3).await;
        let id = pen.id.unwrap();

        add_to_cart(&ctx, id).await.unwrap();
        set_cart_quantity(&ctx, id, 3).unwrap();

        let done = complete_sale(&ctx, "  ", PaymentMethod::Card).await.unwrap();
        assert_eq!(done.sale.customer_name, "Not specified");
        assert_eq!(done.sale.total_amount, Money::from_cents(750));
        assert!(done.receipt.contains("Pen x3 = 7.50 ₽"));
        assert!(done.receipt.contains("TOTAL: 7.50 ₽"));

        let stored = ctx.db().records::<Product>().require(id).await.unwrap();
        assert_eq!(stored.quantity, 0);
        assert!(get_cart(&ctx).lines.is_empty());

        // Sale notification plus the out-of-stock alert from the re-check
        assert_eq!(
            ctx.engine().notifications(Some(NotificationCategory::Success)).await.len(),
            1
        );
        assert_eq!(ctx.engine().status().await.out_of_stock_count, 1);
    }

    #[tokio::test]
    async fn test_failed_settlement_keeps_cart() {
        let ctx = test_context().await;
        let pen = seed_product(&ctx, "Pen", 2).await;
        let id = pen.id.unwrap();

        add_to_cart(&ctx, id).await.unwrap();
        set_cart_quantity(&ctx, id, 2).unwrap();

        let mut sold_elsewhere = pen.clone();
        sold_elsewhere.quantity = 1;
        ctx.db().records::<Product>().update(id, &sold_elsewhere).await.unwrap();

        let err = complete_sale(&ctx, "Anna", PaymentMethod::Cash).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(get_cart(&ctx).lines[0].quantity, 2);
        assert_eq!(ctx.db().records::<Product>().require(id).await.unwrap().quantity, 1);
        assert!(sales_history(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_receipt_reprint_and_save() {
        let ctx = test_context().await;
        let pad = seed_product(&ctx, "Pad", 10).await;
        add_to_cart(&ctx, pad.id.unwrap()).await.unwrap();
        let done = complete_sale(&ctx, "Anna", PaymentMethod::Transfer).await.unwrap();
        let sale_id = done.sale.id.unwrap();

        assert_eq!(receipt_text(&ctx, sale_id).await.unwrap(), done.receipt);
        assert_eq!(receipt_text(&ctx, 999).await.unwrap_err().code, ErrorCode::NotFound);

        let dir = tempfile::tempdir().unwrap();
        let path = save_receipt(&ctx, sale_id, dir.path()).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), done.receipt);
    }
}

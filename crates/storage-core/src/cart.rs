//! # Cart
//!
//! Checkout cart aggregated against stock.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action             Operation              Precondition              │
//! │  ─────────             ─────────              ────────────              │
//! │                                                                         │
//! │  Click product ──────► add_line() ──────────► stock > 0, line < ceiling │
//! │                                                                         │
//! │  Change quantity ────► set_line_quantity() ─► 1 ≤ qty ≤ ceiling         │
//! │                                                                         │
//! │  Click remove ───────► remove_line() ───────► (none)                    │
//! │                                                                         │
//! │  Complete sale ──────► to_sale() ───────────► cart not empty            │
//! │                                                                         │
//! │  The ceiling is the product stock captured when the line was created.   │
//! │  A failed precondition leaves the cart untouched.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaymentMethod, Product, Sale, SaleItem};
use crate::DEFAULT_CUSTOMER_NAME;

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: i64,

    /// Product name when the line was created (frozen).
    pub name: String,

    /// Sale price when the line was created (frozen).
    #[ts(type = "number")]
    pub unit_price: Money,

    pub quantity: i64,

    /// Product stock when the line was created.
    pub max_quantity: i64,
}

impl CartLine {
    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The checkout cart.
///
/// ## Invariants
/// - Lines are unique by `product_id`
/// - `1 <= quantity <= max_quantity` for every line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `product`.
    ///
    /// `product` is the current stored record; the caller reports
    /// [`CoreError::ProductNotFound`] when the lookup came back empty.
    ///
    /// ## Returns
    /// - `Err(OutOfStock)` when the product has no units
    /// - `Err(InsufficientStock)` when the existing line is at its ceiling
    pub fn add_line(&mut self, product: &Product) -> CoreResult<()> {
        let product_id = product
            .id
            .ok_or_else(|| CoreError::ProductNotFound(0))?;

        if product.quantity <= 0 {
            return Err(CoreError::OutOfStock {
                product_id,
                name: product.name.clone(),
            });
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            if line.quantity >= line.max_quantity {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    name: line.name.clone(),
                    available: line.max_quantity,
                    requested: line.quantity + 1,
                });
            }
            line.quantity += 1;
            return Ok(());
        }

        self.lines.push(CartLine {
            product_id,
            name: product.name.clone(),
            unit_price: product.sale_price,
            quantity: 1,
            max_quantity: product.quantity,
        });
        Ok(())
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Returns
    /// - `Err(LineNotInCart)` when there is no line for `product_id`
    /// - `Err(InvalidQuantity)` when `quantity` is not in `1..=max_quantity`
    pub fn set_line_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(CoreError::LineNotInCart(product_id))?;

        if quantity <= 0 || quantity > line.max_quantity {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
                max: line.max_quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Removes the line for `product_id`. Returns whether a line was removed.
    pub fn remove_line(&mut self, product_id: i64) -> bool {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != initial_len
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit_price × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Builds the sale record for the current lines.
    ///
    /// A blank `customer_name` is replaced by [`DEFAULT_CUSTOMER_NAME`].
    ///
    /// ## Returns
    /// - `Err(EmptyCart)` when there are no lines
    pub fn to_sale(
        &self,
        customer_name: &str,
        payment_method: PaymentMethod,
        date: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let customer_name = match customer_name.trim() {
            "" => DEFAULT_CUSTOMER_NAME.to_string(),
            name => name.to_string(),
        };

        let items: Vec<SaleItem> = self
            .lines
            .iter()
            .map(|l| SaleItem {
                product_id: l.product_id,
                name: l.name.clone(),
                unit_price: l.unit_price,
                quantity: l.quantity,
            })
            .collect();

        let total_amount = items
            .iter()
            .try_fold(Money::zero(), |total, item| {
                item.unit_price
                    .checked_multiply_quantity(item.quantity)
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "totalAmount".to_string(),
                reason: "amount out of range".to_string(),
            })?;

        Ok(Sale {
            id: None,
            customer_name,
            payment_method,
            total_amount,
            items,
            date,
        })
    }
}

/// Takes `quantity` units out of `product`.
///
/// Used by settlement against the live record, which may have changed since
/// the line was added.
///
/// ## Returns
/// - `Err(InsufficientStock)` when fewer than `quantity` units remain; the
///   product is left unchanged
pub fn take_stock(product: &mut Product, quantity: i64) -> CoreResult<()> {
    if product.quantity < quantity {
        return Err(CoreError::InsufficientStock {
            product_id: product.id.unwrap_or_default(),
            name: product.name.clone(),
            available: product.quantity,
            requested: quantity,
        });
    }
    product.quantity -= quantity;
    Ok(())
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    #[ts(type = "number")]
    pub total_amount: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.lines.len(),
            total_quantity: cart.total_quantity(),
            total_amount: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Cart State
//!
//! Holds the checkout cart of the running app instance.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>`. Cart operations are quick and
//! synchronous, so the lock is never held across an await.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                Command                 Cart State Change     │
//! │  ─────────                ───────                 ─────────────────     │
//! │                                                                         │
//! │  Click Product ──────────► add_to_cart() ───────► add_line(product)    │
//! │                                                                         │
//! │  Change Quantity ────────► set_cart_quantity() ─► lines[i].qty = n     │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► remove_line(id)      │
//! │                                                                         │
//! │  Click Clear ────────────► clear_cart() ────────► clear()              │
//! │                                                                         │
//! │  Checkout ───────────────► complete_sale() ─────► clear() on commit    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use storage_core::{Cart, CartLine, CartTotals};

/// Cart contents returned to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

/// Shared cart state.
///
/// A poisoned lock is recovered: every cart operation either fully applies
/// or leaves the cart untouched, so the inner value is always consistent.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| CartTotals::from(cart));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_line(&product))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    pub fn snapshot(&self) -> CartResponse {
        self.with_cart(|cart| CartResponse::from(cart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_core::{Money, Product};

    fn product(id: i64, qty: i64) -> Product {
        let mut p = Product::new(format!("Product {}", id), Money::zero(), Money::from_cents(250), qty);
        p.id = Some(id);
        p
    }

    #[test]
    fn test_state_is_shared_between_clones() {
        let state = CartState::new();
        let other = state.clone();

        state.with_cart_mut(|c| c.add_line(&product(1, 3))).unwrap();
        other.with_cart_mut(|c| c.add_line(&product(1, 3))).unwrap();

        let response = state.snapshot();
        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.totals.total_quantity, 2);
        assert_eq!(response.totals.total_amount, Money::from_cents(500));
    }

    #[test]
    fn test_failed_operation_leaves_cart_untouched() {
        let state = CartState::new();
        state.with_cart_mut(|c| c.add_line(&product(1, 1))).unwrap();

        assert!(state.with_cart_mut(|c| c.add_line(&product(1, 1))).is_err());
        assert!(state.with_cart_mut(|c| c.add_line(&product(2, 0))).is_err());

        let response = state.snapshot();
        assert_eq!(response.lines.len(), 1);
        assert_eq!(response.lines[0].quantity, 1);
    }
}

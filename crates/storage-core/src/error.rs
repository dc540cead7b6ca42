//! # Error Types
//!
//! Domain-specific error types for storage-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storage-core errors (this file)                                       │
//! │  ├── CoreError        - Cart / settlement precondition failures        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storage-db errors (separate crate)                                    │
//! │  └── DbError          - Storage failures, bad snapshots                │
//! │                                                                         │
//! │  storage-alerts errors                                                 │
//! │  └── AlertError       - Alert engine / scheduler failures              │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the UI collaborator sees (serialized)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every cart operation that returns one of these leaves the cart exactly as
/// it was before the call.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product no longer exists in the products collection.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Product has zero units on hand.
    #[error("{name} is out of stock")]
    OutOfStock { product_id: i64, name: String },

    /// Not enough units to satisfy the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Stock: 3, cart line already at 3
    ///      │
    ///      ▼
    /// add_line(product)
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Pen", available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Pen in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Requested line quantity is not in `1..=max`.
    #[error("Invalid quantity {requested}: must be between 1 and {max}")]
    InvalidQuantity { requested: i64, max: i64 },

    /// Product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    LineNotInCart(i64),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the command boundary before anything reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g. malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            name: "Pen".to_string(),
            available: 3,
            requested: 4,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Pen: available 3, requested 4"
        );

        let err = CoreError::InvalidQuantity {
            requested: 0,
            max: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid quantity 0: must be between 1 and 3"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

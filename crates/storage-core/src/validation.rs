//! # Validation Module
//!
//! Input validation for records coming in through the command surface.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI collaborator                                              │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: App command (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules per record                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  └── Record must be a JSON object, id a positive integer               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Imported snapshots bypass layer 2: an export file is taken as-is.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Document, Product, Supplier, SupplierType, User};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Field Validators
// =============================================================================

fn required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn required_opt(field: &str, value: &Option<String>, max: usize) -> ValidationResult<()> {
    required(field, value.as_deref().unwrap_or_default(), max)
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative. Zero is allowed.
///
/// ```rust
/// use storage_core::money::Money;
/// use storage_core::validation::validate_price;
///
/// assert!(validate_price("salePrice", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("salePrice", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock quantity (`>= 0`).
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Loose email check: one `@` with something on both sides and a dot in the
/// domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains('@')
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }
    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - 3 to 50 characters
/// - Letters, digits, `.`, `_` and `-` only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();
    required("username", username, 50)?;
    if username.chars().count() < 3 {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: 3,
        });
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores".to_string(),
        });
    }
    Ok(())
}

/// Validates a plain-text password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < 6 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a product before it is stored.
///
/// ```rust
/// use storage_core::{Money, Product};
/// use storage_core::validation::validate_product;
///
/// let ok = Product::new("Pen", Money::from_cents(50), Money::from_cents(120), 4);
/// assert!(validate_product(&ok).is_ok());
///
/// let bad = Product::new(" ", Money::zero(), Money::zero(), 0);
/// assert!(validate_product(&bad).is_err());
/// ```
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    required("name", &product.name, MAX_NAME_LEN)?;
    validate_price("purchasePrice", product.purchase_price)?;
    validate_price("salePrice", product.sale_price)?;
    validate_stock_quantity(product.quantity)
}

/// Validates a supplier before it is stored.
///
/// ## Rules
/// - Self-employed: `lastName` and `firstName` required
/// - Individual / company: `name` required
/// - `email`, when given, must be well formed
pub fn validate_supplier(supplier: &Supplier) -> ValidationResult<()> {
    match supplier.supplier_type {
        SupplierType::SelfEmployed => {
            required_opt("lastName", &supplier.last_name, MAX_NAME_LEN)?;
            required_opt("firstName", &supplier.first_name, MAX_NAME_LEN)?;
        }
        SupplierType::Individual | SupplierType::Company => {
            required_opt("name", &supplier.name, MAX_NAME_LEN)?;
        }
    }
    if let Some(email) = supplier.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }
    Ok(())
}

pub fn validate_document(document: &Document) -> ValidationResult<()> {
    required("title", &document.title, MAX_NAME_LEN)
}

/// Validates a user record. The password is checked separately, before it
/// is hashed.
pub fn validate_user(user: &User) -> ValidationResult<()> {
    validate_username(&user.username)?;
    required("fullName", &user.full_name, MAX_NAME_LEN)?;
    validate_email(&user.email)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product() {
        let mut p = Product::new("Pen", Money::from_cents(50), Money::from_cents(120), 4);
        assert!(validate_product(&p).is_ok());

        p.quantity = -1;
        assert!(matches!(validate_product(&p), Err(ValidationError::Negative { .. })));

        p.quantity = 0;
        p.sale_price = Money::from_cents(-5);
        assert!(validate_product(&p).is_err());

        p.sale_price = Money::zero();
        p.name = "A".repeat(201);
        assert!(matches!(validate_product(&p), Err(ValidationError::TooLong { .. })));
    }

    #[test]
    fn test_validate_supplier() {
        assert!(validate_supplier(&Supplier::self_employed("Ivanov", "Ivan", None)).is_ok());
        assert!(validate_supplier(&Supplier::self_employed("", "Ivan", None)).is_err());
        assert!(validate_supplier(&Supplier::named(SupplierType::Company, "Acme")).is_ok());

        let mut s = Supplier::named(SupplierType::Company, "Acme");
        s.email = Some("nope".into());
        assert!(validate_supplier(&s).is_err());
        s.email = Some("".into());
        assert!(validate_supplier(&s).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a@@b.co").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("anna.k").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("").is_err());
    }
}

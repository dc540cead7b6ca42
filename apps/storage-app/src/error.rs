//! # API Error Type
//!
//! Unified error type for app commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Storage                                │
//! │                                                                         │
//! │  Command Function  ── Result<T, ApiError>                              │
//! │         │                                                               │
//! │         ├── CoreError        (cart rules, validation)  ──┐             │
//! │         ├── DbError          (store, snapshots)        ──┤             │
//! │         ├── AlertError       (engine, scheduler)       ──┼──► ApiError │
//! │         ├── ConfigError      (config file)             ──┤             │
//! │         └── std::io::Error   (import/export files)     ──┘             │
//! │                                                                         │
//! │  Storage internals are logged with error! and replaced by a generic    │
//! │  message; the UI only ever sees { code, message }.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storage_alerts::AlertError;
use storage_core::{CoreError, ValidationError};
use storage_db::DbError;

use crate::state::ConfigError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Pen: 1 available, 2 requested"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input validation failed, including malformed import/backup files
    ValidationError,

    /// Store operation failed
    DatabaseError,

    /// Cart operation failed
    CartError,

    InsufficientStock,

    OutOfStock,

    EmptyCart,

    InvalidQuantity,

    /// Alert engine or scheduler failed
    AlertError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InvalidSnapshot(reason) => {
                ApiError::validation(format!("Invalid file format: {}", reason))
            }
            DbError::StockConflict {
                name,
                available,
                requested,
                ..
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    name, available, requested
                ),
            ),
            DbError::PartialImport {
                failed, imported, cause,
            } => {
                tracing::error!(?failed, ?imported, "Import partially failed: {}", cause);
                let failed: Vec<&str> = failed.iter().map(|c| c.key()).collect();
                ApiError::new(
                    ErrorCode::DatabaseError,
                    format!("Import failed for: {}", failed.join(", ")),
                )
            }
            DbError::UnsupportedVersion { found, supported } => ApiError::new(
                ErrorCode::DatabaseError,
                format!(
                    "Database version {} is newer than this application supports ({})",
                    found, supported
                ),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::SchemaFailed(e) => {
                tracing::error!("Schema upgrade failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database upgrade failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Serialization(e) => {
                tracing::error!("Record serialization failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::InvalidRecord { collection, reason } => {
                tracing::error!(%collection, "Invalid stored record: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, "Stored data is corrupt")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::OutOfStock { .. } => ApiError::new(ErrorCode::OutOfStock, err.to_string()),
            CoreError::InsufficientStock {
                name,
                available,
                requested,
                ..
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    name, available, requested
                ),
            ),
            CoreError::InvalidQuantity { .. } => {
                ApiError::new(ErrorCode::InvalidQuantity, err.to_string())
            }
            CoreError::LineNotInCart(id) => ApiError::cart(format!("Product {} is not in the cart", id)),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, "Cart is empty"),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<AlertError> for ApiError {
    fn from(err: AlertError) -> Self {
        match err {
            AlertError::Database(e) => ApiError::from(e),
            AlertError::InvalidConfig(e) => ApiError::new(ErrorCode::ConfigError, e),
            other => {
                tracing::error!("Alert engine error: {}", other);
                ApiError::new(ErrorCode::AlertError, "Alert check failed")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("File operation failed: {}", err);
        ApiError::internal(format!("File operation failed: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use storage_core::Collection;

    #[test]
    fn test_error_codes_serialize_screaming() {
        let err = ApiError::new(ErrorCode::InsufficientStock, "x");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
        assert_eq!(json["message"], "x");
    }

    #[test]
    fn test_storage_internals_are_hidden() {
        let err = ApiError::from(DbError::QueryFailed("no such table: warehouse".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("warehouse"));
    }

    #[test]
    fn test_mappings() {
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::EmptyCart);
        assert_eq!(
            ApiError::from(DbError::invalid_snapshot("bad")).code,
            ErrorCode::ValidationError
        );
        let partial = ApiError::from(DbError::PartialImport {
            failed: vec![Collection::Documents],
            imported: vec![Collection::Products],
            cause: "boom".into(),
        });
        assert!(partial.message.contains("documents"));
    }
}

//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)      serde_json::Error                     │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in the app) ← Serialized for the UI collaborator            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Categories
//! - Storage failures: the engine itself failed; nothing was written
//! - Validation failures: `InvalidSnapshot`, a malformed import or backup
//!   document, rejected before any write
//! - Settlement conflicts: `StockConflict`, live stock fell short at checkout

use storage_core::Collection;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation, e.g. an imported record reusing an id.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Creating or upgrading the schema failed.
    #[error("Schema upgrade failed: {0}")]
    SchemaFailed(String),

    /// The database was written by a newer version of the application.
    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: i64, supported: i64 },

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A record or settings blob could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A stored record does not decode as its collection's type.
    #[error("Invalid record in {collection}: {reason}")]
    InvalidRecord { collection: Collection, reason: String },

    /// Import or backup document is malformed. Nothing was written.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Live stock no longer covers a cart line. The sale was rolled back.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    StockConflict {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Some collections of an import could not be written.
    ///
    /// Each failed collection was rolled back on its own; `imported` lists
    /// the ones that were replaced.
    #[error("Import failed for {failed:?}: {cause}")]
    PartialImport {
        failed: Vec<Collection>,
        imported: Vec<Collection>,
        cause: String,
    },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates an InvalidSnapshot error.
    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        DbError::InvalidSnapshot(reason.into())
    }

    /// True for errors caused by a malformed input document.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, DbError::InvalidSnapshot(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → UniqueViolation or QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

//! # Alert Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Alert Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Storage      │  │      Scheduler          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Database       │  │  ChannelError           │ │
//! │  │                 │  │                 │  │  ShuttingDown           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storage_db::DbError;
use thiserror::Error;

/// Result type alias for alert operations.
pub type AlertResult<T> = Result<T, AlertError>;

#[derive(Debug, Error)]
pub enum AlertError {
    /// Invalid engine configuration.
    #[error("Invalid alert configuration: {0}")]
    InvalidConfig(String),

    /// Reading products or persisting the log failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The scheduler task has stopped.
    #[error("Alert scheduler is shutting down")]
    ShuttingDown,

    #[error("Internal error: {0}")]
    Internal(String),
}

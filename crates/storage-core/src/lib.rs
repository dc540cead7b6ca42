//! # storage-core: Pure Business Logic for Storage
//!
//! Record types, money arithmetic, cart math and the alert rules of the
//! Storage inventory application. Nothing in here touches the database,
//! the file system or a clock it was not handed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storage Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI collaborator (tabs, forms, themes)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands / observer callbacks          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/storage-app (AppContext)                   │   │
//! │  └─────────────┬───────────────────────────────────┬───────────────┘   │
//! │                │                                   │                    │
//! │  ┌─────────────▼──────────────┐    ┌───────────────▼──────────────┐    │
//! │  │  storage-db (SQLite)       │◄───│  storage-alerts (scheduler)  │    │
//! │  └─────────────┬──────────────┘    └───────────────┬──────────────┘    │
//! │                │                                   │                    │
//! │  ┌─────────────▼───────────────────────────────────▼───────────────┐   │
//! │  │               ★ storage-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌───────┐ ┌──────┐ ┌────────┐ ┌──────────────┐   │   │
//! │  │   │  types  │ │ money │ │ cart │ │ alerts │ │ notification │   │   │
//! │  │   └─────────┘ └───────┘ └──────┘ └────────┘ └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TIMERS • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Product, Supplier, Sale, Document, User, ...) and the
//!   [`Record`] trait tying each to its collection
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Checkout cart aggregated against live stock
//! - [`stock`] - Stock level classification
//! - [`alerts`] - Stock alert scan rules
//! - [`notification`] - Capped, newest-first notification log
//! - [`filter`] - List filters used by the search boxes
//! - [`receipt`] - Plain-text receipt and document rendering
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storage_core::money::Money;
//! use storage_core::stock::{classify, StockLevel};
//!
//! let price = Money::from_cents(1099);
//! assert_eq!((price * 3).cents(), 3297);
//!
//! assert_eq!(classify(0), StockLevel::OutOfStock);
//! assert_eq!(classify(5), StockLevel::Low);
//! assert_eq!(classify(6), StockLevel::InStock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod cart;
pub mod error;
pub mod filter;
pub mod money;
pub mod notification;
pub mod receipt;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use alerts::RaisedAlerts;
pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use notification::NotificationLog;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound (inclusive) of the "low stock" band.
///
/// A product with `0 < quantity <= LOW_STOCK_THRESHOLD` is low on stock,
/// `quantity == 0` is out of stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Maximum number of entries kept in the notification log.
///
/// Inserting past this evicts the oldest entry.
pub const NOTIFICATION_LOG_CAPACITY: usize = 100;

/// Default period of the background alert check.
pub const ALERT_CHECK_INTERVAL_SECS: u64 = 30;

/// Customer name recorded on a sale when the cashier leaves it blank.
pub const DEFAULT_CUSTOMER_NAME: &str = "Not specified";

//! # Commands Module
//!
//! Every operation the UI collaborator can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Warehouse list, CRUD
//! ├── supplier.rs  ◄─── Supplier list, CRUD
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── sale.rs      ◄─── Checkout, history, receipts
//! ├── document.rs  ◄─── Documents, text rendering
//! ├── user.rs      ◄─── Users, logins, activity log
//! ├── backup.rs    ◄─── Export, import, restore, clear-all
//! ├── alerts.rs    ◄─── Alert checks, notification log, toggles
//! └── settings.rs  ◄─── Theme preference
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI collaborator                                                        │
//! │       │  commands::cart::add_to_cart(&ctx, product_id)                  │
//! │       ▼                                                                 │
//! │  Command                                                                │
//! │       │  validate input ──► store call(s) ──► alert re-check            │
//! │       ▼                                                                 │
//! │  Result<T, ApiError>      T is Serialize, ApiError is { code, message } │
//! │                                                                         │
//! │  Data-changed callbacks reach the UI through the database observer;    │
//! │  alert callbacks through the engine emitter.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod alerts;
pub mod backup;
pub mod cart;
pub mod document;
pub mod product;
pub mod sale;
pub mod settings;
pub mod supplier;
pub mod user;

use crate::error::ApiError;

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

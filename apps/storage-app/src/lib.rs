//! # Storage App Library
//!
//! The application layer of Storage: configuration, the per-instance
//! [`AppContext`] and the commands a UI collaborator (or the CLI) invokes.
//!
//! ## Module Organization
//! ```text
//! storage_app/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── context.rs      ◄─── AppContext: db + alert engine + cart + scheduler
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── TOML configuration + environment overrides
//! ├── commands/       ◄─── Products, suppliers, cart, sales, documents,
//! │                        users, backup, alerts, settings
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. init_tracing()        RUST_LOG or "info,storage=debug,sqlx=warn"   │
//! │  2. AppConfig::load()     defaults ◄ storage.toml ◄ STORAGE_* env      │
//! │  3. AppContext::new()     open db, upgrade schema, load alert engine   │
//! │  4. start_scheduler()     periodic stock scan (first run immediate)    │
//! │  5. commands::*           until shutdown()                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::ApiResult;
pub use context::AppContext;
pub use error::{ApiError, ErrorCode};
pub use state::{AppConfig, CartResponse, CartState, ConfigError};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storage_db=trace` - Show trace for the store only
/// - Default: INFO, DEBUG for the storage crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storage=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

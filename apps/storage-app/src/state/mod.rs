//! # State Module
//!
//! Per-instance state owned by [`AppContext`](crate::context::AppContext).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  Database    │  │  CartState   │  │   AppConfig      │              │
//! │  │  (SQLite     │  │  Arc<Mutex<  │  │  database        │              │
//! │  │   pool)      │  │    Cart      │  │  alerts          │              │
//! │  │              │  │  >>          │  │  store           │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Database: internal connection pool                                  │
//! │  • CartState: Arc<Mutex<T>>, never held across an await                │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::{CartResponse, CartState};
pub use config::{
    default_config_path, AlertSection, AppConfig, ConfigError, ConfigResult, DatabaseSettings,
    StoreSettings,
};

//! # storage-alerts: Alert Engine for Storage
//!
//! Stock alerts and the notification log, plus the background task that
//! checks stock on a fixed period.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storage_alerts::{scheduler, AlertEngine, EngineConfig};
//!
//! let engine = Arc::new(AlertEngine::load(db.clone(), EngineConfig::default()).await?);
//! let handle = scheduler::spawn(engine.clone(), engine.config().check_interval())?;
//!
//! // Manual trigger from the UI
//! let status = handle.check_now().await?;
//!
//! // Application exit
//! handle.stop().await?;
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - Scan, log, toggles and counters
//! - [`scheduler`] - Periodic task with manual trigger and shutdown
//! - [`emitter`] - Events for the UI collaborator
//! - [`config`] - Engine settings
//! - [`error`] - Error types

pub mod config;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod scheduler;

pub use config::EngineConfig;
pub use emitter::{AlertEmitter, NoOpEmitter, TracingEmitter};
pub use engine::AlertEngine;
pub use error::{AlertError, AlertResult};
pub use scheduler::SchedulerHandle;

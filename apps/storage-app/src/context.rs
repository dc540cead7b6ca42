//! # App Context
//!
//! One running Storage instance: database, alert engine, cart and the
//! background alert check.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       AppContext Lifecycle                              │
//! │                                                                         │
//! │  AppContext::new(config)                                                │
//! │     │  1. Open database (schema upgrade runs here)                      │
//! │     │  2. Load alert engine (settings + notification log)               │
//! │     │  3. Empty cart                                                    │
//! │     ▼                                                                   │
//! │  start_scheduler()        (only when alerts.enabled)                    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  commands::*(&ctx, ...)   (any number, any order)                       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  shutdown()               stop scheduler, close pool                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::{AppConfig, CartState};
use storage_alerts::{scheduler, AlertEmitter, AlertEngine, SchedulerHandle, TracingEmitter};
use storage_core::AlertStatus;
use storage_db::{Database, TracingObserver};

pub struct AppContext {
    config: AppConfig,
    db: Database,
    engine: Arc<AlertEngine>,
    cart: CartState,
    scheduler: Option<SchedulerHandle>,
}

impl AppContext {
    /// Opens the configured database and loads the alert engine.
    ///
    /// Observer and emitter log through `tracing`; a UI shell passes its
    /// own through [`with_database`](Self::with_database).
    pub async fn new(config: AppConfig) -> Result<Self, ApiError> {
        let db_config = config.db_config();
        if !db_config.is_in_memory() {
            if let Some(parent) = db_config.database_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::new(db_config)
            .await?
            .with_observer(Arc::new(TracingObserver));

        Self::with_database(config, db, Arc::new(TracingEmitter)).await
    }

    /// Builds a context around an already open database.
    pub async fn with_database(
        config: AppConfig,
        db: Database,
        emitter: Arc<dyn AlertEmitter>,
    ) -> Result<Self, ApiError> {
        let engine = AlertEngine::load_with_emitter(db.clone(), config.engine_config(), emitter).await?;

        info!(store = %config.store.name, "App context ready");

        Ok(AppContext {
            config,
            db,
            engine: Arc::new(engine),
            cart: CartState::new(),
            scheduler: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn engine(&self) -> &Arc<AlertEngine> {
        &self.engine
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config.store.currency_symbol
    }

    /// Starts the periodic alert check unless it is disabled or running.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start_scheduler(&mut self) -> Result<bool, ApiError> {
        if !self.config.alerts.enabled || self.scheduler.is_some() {
            return Ok(false);
        }

        let period = self.engine.config().check_interval();
        self.scheduler = Some(scheduler::spawn(self.engine.clone(), period)?);
        Ok(true)
    }

    pub fn scheduler_running(&self) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Runs an alert check now and returns the refreshed status.
    ///
    /// Goes through the scheduler task when one is running.
    pub async fn check_alerts(&self) -> Result<AlertStatus, ApiError> {
        let status = match &self.scheduler {
            Some(handle) if !handle.is_finished() => handle.check_now().await?,
            _ => self.engine.check_now().await?,
        };
        Ok(status)
    }

    /// Re-check after a write. A failure is logged, never surfaced; the
    /// write itself already succeeded.
    pub(crate) async fn recheck_alerts(&self) {
        if let Err(e) = self.check_alerts().await {
            warn!(error = %e, "Alert re-check failed");
        }
    }

    /// Stops the scheduler and closes the pool.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.scheduler.take() {
            if let Err(e) = handle.stop().await {
                warn!(error = %e, "Alert scheduler did not stop cleanly");
            }
        }
        self.db.close().await;
        info!("App context shut down");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_context;
    use storage_alerts::NoOpEmitter;
    use storage_db::DbConfig;

    #[tokio::test]
    async fn test_scheduler_lifecycle() {
        let mut ctx = test_context().await;
        assert!(!ctx.scheduler_running());

        assert!(ctx.start_scheduler().unwrap());
        assert!(!ctx.start_scheduler().unwrap());
        assert!(ctx.scheduler_running());

        let status = ctx.check_alerts().await.unwrap();
        assert!(status.last_check.is_some());

        ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_disabled_alerts_do_not_start_scheduler() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut config = AppConfig::default();
        config.alerts.enabled = false;

        let mut ctx = AppContext::with_database(config, db, Arc::new(NoOpEmitter))
            .await
            .unwrap();
        assert!(!ctx.start_scheduler().unwrap());

        // Manual checks still work
        assert!(ctx.check_alerts().await.unwrap().last_check.is_some());
        ctx.shutdown().await;
    }

    #[tokio::test]
    async fn test_new_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.database.path = Some(dir.path().join("data").join("storage.db"));

        let ctx = AppContext::new(config.clone()).await.unwrap();
        ctx.shutdown().await;

        assert!(config.database_path().exists());
    }
}

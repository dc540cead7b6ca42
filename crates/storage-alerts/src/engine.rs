//! # Alert Engine
//!
//! Owns the notification log, the alert toggles and the status counters,
//! and runs the stock check against the store.
//!
//! ## Check Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       check_now()                                       │
//! │                                                                         │
//! │  1. Load products            db.records::<Product>().all()             │
//! │  2. Scan                     alerts::scan(products, settings, raised)  │
//! │  3. Add missing alerts       raised.insert + log.push per candidate    │
//! │     └── persist              "notification-log", "raised-alerts"      │
//! │     └── emit                 on_alert_raised(notification)            │
//! │  4. Recompute status         low / out / notification count, lastCheck │
//! │     └── emit                 on_status_changed(status)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The log and raised-set locks are held from the scan through the persist,
//! so two checks running at once cannot both add the same alert. Lock order
//! is always log, then raised.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::emitter::{AlertEmitter, NoOpEmitter};
use crate::error::AlertResult;
use storage_core::alerts::{document_message, sale_message, scan, stock_counts, RaisedAlerts};
use storage_core::{
    AlertPayload, AlertSettings, AlertStatus, Document, Notification, NotificationCategory,
    NotificationLog, Product, Sale, NOTIFICATION_LOG_CAPACITY,
};
use storage_db::Database;

pub struct AlertEngine {
    db: Database,
    config: EngineConfig,
    emitter: Arc<dyn AlertEmitter>,
    log: RwLock<NotificationLog>,
    raised: RwLock<RaisedAlerts>,
    settings: RwLock<AlertSettings>,
    status: RwLock<AlertStatus>,
}

impl AlertEngine {
    /// Creates an engine with the persisted log and settings restored.
    pub async fn load(db: Database, config: EngineConfig) -> AlertResult<Self> {
        Self::load_with_emitter(db, config, Arc::new(NoOpEmitter)).await
    }

    pub async fn load_with_emitter(
        db: Database,
        config: EngineConfig,
        emitter: Arc<dyn AlertEmitter>,
    ) -> AlertResult<Self> {
        config.validate()?;

        let settings_repo = db.settings();
        let settings = settings_repo.alert_settings().await?;
        let entries = settings_repo.notification_log().await?;
        let log = NotificationLog::from_entries(entries, NOTIFICATION_LOG_CAPACITY);
        let raised = match settings_repo.raised_alerts().await? {
            Some(raised) => raised,
            None => RaisedAlerts::from_log(&log),
        };

        info!(notifications = log.len(), raised = raised.len(), "Alert engine loaded");

        let status = AlertStatus {
            notification_count: log.len(),
            ..AlertStatus::default()
        };

        Ok(AlertEngine {
            db,
            config,
            emitter,
            log: RwLock::new(log),
            raised: RwLock::new(raised),
            settings: RwLock::new(settings),
            status: RwLock::new(status),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one stock check and returns the recomputed status.
    pub async fn check_now(&self) -> AlertResult<AlertStatus> {
        let products = self.db.records::<Product>().all().await?;
        let settings = *self.settings.read().await;
        let now = Utc::now();

        let (raised, notification_count) = {
            let mut log = self.log.write().await;
            let mut raised_set = self.raised.write().await;
            let pruned = raised_set.retain_products(&products);
            let candidates = scan(&products, &settings, &raised_set);

            let mut raised = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                raised_set.insert(candidate.payload);
                let notification = log.compose(
                    candidate.title,
                    candidate.message,
                    candidate.category,
                    Some(candidate.payload),
                    now,
                );
                log.push(notification.clone());
                raised.push(notification);
            }

            if !raised.is_empty() {
                self.db.settings().save_notification_log(log.entries()).await?;
            }
            if !raised.is_empty() || pruned {
                self.db.settings().save_raised_alerts(&raised_set).await?;
            }
            (raised, log.len())
        };

        for notification in &raised {
            self.emitter.on_alert_raised(notification);
        }

        let (low_stock_count, out_of_stock_count) = stock_counts(&products);
        let status = AlertStatus {
            low_stock_count,
            out_of_stock_count,
            notification_count,
            last_check: Some(now),
        };
        *self.status.write().await = status.clone();
        self.emitter.on_status_changed(&status);

        debug!(
            raised = raised.len(),
            low_stock_count, out_of_stock_count, "Alert check complete"
        );
        Ok(status)
    }

    /// Adds a free-form notification to the log.
    pub async fn notify(
        &self,
        title: &str,
        message: &str,
        category: NotificationCategory,
    ) -> AlertResult<Notification> {
        self.push(title, message, category, None).await
    }

    async fn push(
        &self,
        title: &str,
        message: &str,
        category: NotificationCategory,
        payload: Option<AlertPayload>,
    ) -> AlertResult<Notification> {
        let (notification, count) = {
            let mut log = self.log.write().await;
            let notification = log.compose(title, message, category, payload, Utc::now());
            if let Some(evicted) = log.push(notification.clone()) {
                debug!(id = evicted.id, "Oldest notification evicted");
            }
            self.db.settings().save_notification_log(log.entries()).await?;
            (notification, log.len())
        };

        self.emitter.on_alert_raised(&notification);
        self.set_notification_count(count).await;
        Ok(notification)
    }

    /// Raises the "sale completed" notification when `newSale` is on.
    pub async fn raise_sale(&self, sale: &Sale) -> AlertResult<Option<Notification>> {
        if !self.settings.read().await.new_sale {
            return Ok(None);
        }
        let (title, message) = sale_message(sale, &self.config.currency_symbol);
        self.notify(&title, &message, NotificationCategory::Success)
            .await
            .map(Some)
    }

    /// Raises the "document created" notification when `document` is on.
    pub async fn raise_document(&self, document: &Document) -> AlertResult<Option<Notification>> {
        if !self.settings.read().await.document {
            return Ok(None);
        }
        let (title, message) = document_message(document);
        self.notify(&title, &message, NotificationCategory::Info)
            .await
            .map(Some)
    }

    /// Log entries newest first, optionally only one category.
    pub async fn notifications(&self, category: Option<NotificationCategory>) -> Vec<Notification> {
        self.log.read().await.filter(category)
    }

    /// Empties the log and forgets which alerts were raised. Alerts for
    /// products still in a band are raised again by the next check.
    pub async fn clear_notifications(&self) -> AlertResult<()> {
        {
            let mut log = self.log.write().await;
            let mut raised = self.raised.write().await;
            log.clear();
            raised.clear();
            self.db.settings().save_notification_log(log.entries()).await?;
            self.db.settings().save_raised_alerts(&raised).await?;
        }
        info!("Notification log cleared");
        self.set_notification_count(0).await;
        Ok(())
    }

    async fn set_notification_count(&self, count: usize) {
        let status = {
            let mut status = self.status.write().await;
            status.notification_count = count;
            status.clone()
        };
        self.emitter.on_status_changed(&status);
    }

    pub async fn settings(&self) -> AlertSettings {
        *self.settings.read().await
    }

    /// Stores new toggles. Turning a category off keeps its existing alerts.
    pub async fn update_settings(&self, settings: AlertSettings) -> AlertResult<()> {
        self.db.settings().save_alert_settings(&settings).await?;
        *self.settings.write().await = settings;
        info!(?settings, "Alert settings updated");
        Ok(())
    }

    pub async fn status(&self) -> AlertStatus {
        self.status.read().await.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

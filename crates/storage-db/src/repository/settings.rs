//! # Settings Repository
//!
//! Named JSON blobs in the `settings` table: alert toggles, the theme, the
//! persisted notification log and the set of raised stock alerts.
//!
//! ```text
//!   key                  value
//!   ───                  ─────
//!   alert-settings       {"lowStock":true,"outOfStock":true,...}
//!   storage-theme        "windows95"
//!   notification-log     [{"id":...,"title":...}, ...]   newest first
//!   raised-alerts        [{"kind":"lowStock","productId":3}, ...]
//! ```
//!
//! A blob that no longer decodes is logged and replaced by the default, so
//! a corrupt preference never blocks startup.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;
use storage_core::alerts::RaisedAlerts;
use storage_core::types::{AlertSettings, Notification, Theme};

pub const ALERT_SETTINGS_KEY: &str = "alert-settings";
pub const THEME_KEY: &str = "storage-theme";
pub const NOTIFICATION_LOG_KEY: &str = "notification-log";
pub const RAISED_ALERTS_KEY: &str = "raised-alerts";

/// Repository for settings blobs.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    // ===== Raw blobs =====

    pub async fn get_raw(&self, key: &str) -> DbResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    pub async fn put_raw(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = value.len(), "Setting stored");
        Ok(())
    }

    // ===== JSON blobs =====

    /// Reads and decodes `key`. Missing or undecodable blobs yield `None`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let Some(raw) = self.get_raw(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring undecodable setting");
                Ok(None)
            }
        }
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw).await
    }

    // ===== Typed settings =====

    pub async fn alert_settings(&self) -> DbResult<AlertSettings> {
        Ok(self.get_json(ALERT_SETTINGS_KEY).await?.unwrap_or_default())
    }

    pub async fn save_alert_settings(&self, settings: &AlertSettings) -> DbResult<()> {
        self.put_json(ALERT_SETTINGS_KEY, settings).await
    }

    pub async fn theme(&self) -> DbResult<Theme> {
        Ok(self.get_json(THEME_KEY).await?.unwrap_or_default())
    }

    pub async fn save_theme(&self, theme: Theme) -> DbResult<()> {
        self.put_json(THEME_KEY, &theme).await
    }

    /// The persisted notification log, as stored (newest first).
    pub async fn notification_log(&self) -> DbResult<Vec<Notification>> {
        Ok(self.get_json(NOTIFICATION_LOG_KEY).await?.unwrap_or_default())
    }

    pub async fn save_notification_log(&self, entries: &[Notification]) -> DbResult<()> {
        self.put_json(NOTIFICATION_LOG_KEY, entries).await
    }

    /// The persisted raised-alert set. `None` when it was never stored.
    pub async fn raised_alerts(&self) -> DbResult<Option<RaisedAlerts>> {
        self.get_json(RAISED_ALERTS_KEY).await
    }

    pub async fn save_raised_alerts(&self, raised: &RaisedAlerts) -> DbResult<()> {
        self.put_json(RAISED_ALERTS_KEY, raised).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use storage_core::types::{AlertKind, AlertPayload, NotificationCategory};

    async fn repo() -> SettingsRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().settings()
    }

    #[tokio::test]
    async fn test_defaults_when_missing() {
        let settings = repo().await;
        assert_eq!(settings.alert_settings().await.unwrap(), AlertSettings::default());
        assert_eq!(settings.theme().await.unwrap(), Theme::Windows95);
        assert!(settings.notification_log().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let settings = repo().await;

        let toggles = AlertSettings {
            low_stock: false,
            ..AlertSettings::default()
        };
        settings.save_alert_settings(&toggles).await.unwrap();
        settings.save_theme(Theme::Modern).await.unwrap();

        assert_eq!(settings.alert_settings().await.unwrap(), toggles);
        assert_eq!(settings.theme().await.unwrap(), Theme::Modern);
        assert_eq!(settings.get_raw(THEME_KEY).await.unwrap().as_deref(), Some("\"modern\""));
    }

    #[tokio::test]
    async fn test_notification_log_round_trip() {
        let settings = repo().await;
        let entry = Notification {
            id: 42,
            title: "Low stock".into(),
            message: "Pen: only 2 left in stock".into(),
            category: NotificationCategory::Warning,
            timestamp: Utc::now(),
            payload: None,
        };
        settings.save_notification_log(&[entry.clone()]).await.unwrap();
        assert_eq!(settings.notification_log().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_raised_alerts_round_trip() {
        let settings = repo().await;
        assert!(settings.raised_alerts().await.unwrap().is_none());

        let mut raised = RaisedAlerts::default();
        raised.insert(AlertPayload {
            kind: AlertKind::LowStock,
            product_id: 3,
        });
        settings.save_raised_alerts(&raised).await.unwrap();

        assert_eq!(settings.raised_alerts().await.unwrap(), Some(raised));
        assert_eq!(
            settings.get_raw(RAISED_ALERTS_KEY).await.unwrap().as_deref(),
            Some(r#"[{"kind":"lowStock","productId":3}]"#)
        );
    }

    #[tokio::test]
    async fn test_corrupt_blob_falls_back_to_default() {
        let settings = repo().await;
        settings.put_raw(ALERT_SETTINGS_KEY, "{not json").await.unwrap();
        assert_eq!(settings.alert_settings().await.unwrap(), AlertSettings::default());
    }
}

//! # Alert Commands
//!
//! Manual alert checks, the notification log and the category toggles.

use tracing::info;

use super::ApiResult;
use crate::context::AppContext;
use storage_core::{AlertSettings, AlertStatus, Notification, NotificationCategory};

/// Runs a stock scan now.
pub async fn check_alerts(ctx: &AppContext) -> ApiResult<AlertStatus> {
    ctx.check_alerts().await
}

pub async fn alert_status(ctx: &AppContext) -> AlertStatus {
    ctx.engine().status().await
}

/// Notification log, newest first. `None` returns every category.
pub async fn get_notifications(
    ctx: &AppContext,
    category: Option<NotificationCategory>,
) -> Vec<Notification> {
    ctx.engine().notifications(category).await
}

pub async fn clear_notifications(ctx: &AppContext) -> ApiResult<()> {
    Ok(ctx.engine().clear_notifications().await?)
}

/// Adds a free-form notification, e.g. after a manual stock count.
pub async fn add_notification(
    ctx: &AppContext,
    title: &str,
    message: &str,
    category: NotificationCategory,
) -> ApiResult<Notification> {
    Ok(ctx.engine().notify(title, message, category).await?)
}

pub async fn get_alert_settings(ctx: &AppContext) -> AlertSettings {
    ctx.engine().settings().await
}

/// Stores the toggles and re-checks, so a category switched on alerts at
/// once.
pub async fn update_alert_settings(ctx: &AppContext, settings: AlertSettings) -> ApiResult<AlertStatus> {
    ctx.engine().update_settings(settings).await?;
    info!(?settings, "Alert toggles changed");
    ctx.check_alerts().await
}

// =============================================================================
// Unit Tests
// =============================================================================

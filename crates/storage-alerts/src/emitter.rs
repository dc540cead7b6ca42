//! # Alert Emitters
//!
//! How the engine tells the UI collaborator about new notifications and
//! updated counters.

use storage_core::{AlertStatus, Notification};
use tracing::{debug, info};

/// Receives alert engine events.
pub trait AlertEmitter: Send + Sync {
    /// A notification was added to the log.
    fn on_alert_raised(&self, notification: &Notification);

    /// The aggregate counters were recomputed.
    fn on_status_changed(&self, status: &AlertStatus);
}

/// No-op event emitter for testing.
pub struct NoOpEmitter;

impl AlertEmitter for NoOpEmitter {
    fn on_alert_raised(&self, _notification: &Notification) {}
    fn on_status_changed(&self, _status: &AlertStatus) {}
}

/// Logs every event; used by the CLI.
pub struct TracingEmitter;

impl AlertEmitter for TracingEmitter {
    fn on_alert_raised(&self, notification: &Notification) {
        info!(
            id = notification.id,
            category = %notification.category,
            title = %notification.title,
            "{}",
            notification.message
        );
    }

    fn on_status_changed(&self, status: &AlertStatus) {
        debug!(
            low_stock = status.low_stock_count,
            out_of_stock = status.out_of_stock_count,
            notifications = status.notification_count,
            "Alert status updated"
        );
    }
}

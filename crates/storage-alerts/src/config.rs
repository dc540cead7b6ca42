//! # Engine Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AlertError, AlertResult};
use storage_core::ALERT_CHECK_INTERVAL_SECS;

/// Alert engine settings, filled from the app configuration.
///
/// ## Example
/// ```rust
/// use storage_alerts::EngineConfig;
///
/// let config = EngineConfig::default().check_interval_secs(10);
/// assert!(config.validate().is_ok());
/// assert!(EngineConfig::default().check_interval_secs(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Period of the background check.
    /// Default: 30 seconds
    pub check_interval_secs: u64,

    /// Whether the background check runs at all. Manual checks always work.
    pub enabled: bool,

    /// Symbol appended to amounts in sale notifications.
    pub currency_symbol: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            check_interval_secs: ALERT_CHECK_INTERVAL_SECS,
            enabled: true,
            currency_symbol: "₽".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn check_interval_secs(mut self, secs: u64) -> Self {
        self.check_interval_secs = secs;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn validate(&self) -> AlertResult<()> {
        if self.check_interval_secs == 0 {
            return Err(AlertError::InvalidConfig(
                "check_interval_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

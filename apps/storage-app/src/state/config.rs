//! # Application Configuration
//!
//! TOML configuration for the Storage app.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STORAGE_*`)
//! 2. Config file (`storage.toml`)
//! 3. Defaults (this file)
//!
//! ## Example storage.toml
//! ```toml
//! [database]
//! path = "/var/lib/storage/storage.db"
//! max_connections = 5
//!
//! [alerts]
//! check_interval_secs = 30
//! enabled = true
//!
//! [store]
//! name = "Storage"
//! currency_symbol = "₽"
//! ```
//!
//! Configuration is read-only after startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use storage_alerts::EngineConfig;
use storage_core::ALERT_CHECK_INTERVAL_SECS;
use storage_db::DbConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Default: platform data dir / storage.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

/// `[alerts]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSection {
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Runs the background check. Manual checks work either way.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_check_interval() -> u64 {
    ALERT_CHECK_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

impl Default for AlertSection {
    fn default() -> Self {
        AlertSection {
            check_interval_secs: default_check_interval(),
            enabled: true,
        }
    }
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Shown in receipt headers and logs
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Storage".to_string()
}

fn default_currency_symbol() -> String {
    "₽".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Complete app configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub alerts: AlertSection,

    #[serde(default)]
    pub store: StoreSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storage.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(default_config_path)
            .ok_or(ConfigError::NoPath)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.alerts.check_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "alerts.check_interval_secs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STORAGE_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("STORAGE_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(secs) = lookup("STORAGE_ALERT_INTERVAL_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.alerts.check_interval_secs = s,
                Err(_) => warn!(value = %secs, "Invalid STORAGE_ALERT_INTERVAL_SECS"),
            }
        }

        if let Some(enabled) = lookup("STORAGE_ALERTS_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.alerts.enabled = true,
                "0" | "false" | "no" | "off" => self.alerts.enabled = false,
                _ => warn!(value = %enabled, "Invalid STORAGE_ALERTS_ENABLED"),
            }
        }

        if let Some(name) = lookup("STORAGE_STORE_NAME") {
            self.store.name = name;
        }
    }

    // =========================================================================
    // Derived Settings
    // =========================================================================

    /// Database file, falling back to the platform data directory.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(default_database_path)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .check_interval_secs(self.alerts.check_interval_secs)
            .enabled(self.alerts.enabled)
            .currency_symbol(self.store.currency_symbol.clone())
    }
}

/// Returns the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "storage", "storage")
        .map(|dirs| dirs.config_dir().join("storage.toml"))
}

/// Platform data dir / storage.db, or ./storage.db when no home is known.
fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "storage", "storage")
        .map(|dirs| dirs.data_dir().join("storage.db"))
        .unwrap_or_else(|| Path::new(".").join("storage.db"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.alerts.check_interval_secs, 30);
        assert!(config.alerts.enabled);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.store.currency_symbol, "₽");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.alerts.check_interval_secs = 0;
        assert!(config.validate().is_err());

        config.alerts.check_interval_secs = 10;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("[alerts]\nenabled = false\n").unwrap();
        assert!(!config.alerts.enabled);
        assert_eq!(config.alerts.check_interval_secs, 30);
        assert_eq!(config.store.name, "Storage");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("STORAGE_DB_PATH", "/tmp/override.db"),
            ("STORAGE_ALERT_INTERVAL_SECS", "7"),
            ("STORAGE_ALERTS_ENABLED", "off"),
            ("STORAGE_STORE_NAME", "Corner Shop"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_path(), PathBuf::from("/tmp/override.db"));
        assert_eq!(config.alerts.check_interval_secs, 7);
        assert!(!config.alerts.enabled);
        assert_eq!(config.store.name, "Corner Shop");
    }

    #[test]
    fn test_bad_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| {
            (key == "STORAGE_ALERT_INTERVAL_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.alerts.check_interval_secs, 30);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.toml");

        let mut config = AppConfig::default();
        config.alerts.check_interval_secs = 12;
        config.store.name = "Depot".into();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[alerts]"));

        let loaded: AppConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        std::fs::write(&path, "[alerts]\ncheck_interval_secs = \"often\"\n").unwrap();

        assert!(matches!(
            AppConfig::load(Some(path.clone())),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            AppConfig::load_or_default(Some(path)).alerts.check_interval_secs,
            30
        );
    }

    #[test]
    fn test_engine_config_follows_sections() {
        let mut config = AppConfig::default();
        config.alerts.check_interval_secs = 5;
        config.store.currency_symbol = "$".into();

        let engine = config.engine_config();
        assert_eq!(engine.check_interval_secs, 5);
        assert_eq!(engine.currency_symbol, "$");
    }
}

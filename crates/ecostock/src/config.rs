//! Configuration management for ecostock.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "ecostock";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "inventory.db";

/// Longest trailing window for rotation figures, in days.
const MAX_ROTATION_WINDOW_DAYS: i64 = 3650;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ECOSTOCK_`, sections separated by `__`)
/// 2. TOML config file at `~/.config/ecostock/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// REST server configuration.
    pub server: ServerConfig,
    /// Stock and expiration alert thresholds.
    pub alerts: AlertConfig,
    /// Report configuration.
    pub reports: ReportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// When unset the inventory lives in memory and resets on restart.
    pub database_path: Option<PathBuf>,
    /// Load the sample catalog into an empty store.
    pub seed_sample_data: bool,
}

/// REST server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the API listens on.
    pub listen: SocketAddr,
}

/// Alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Stock at or below this is low when a product has no minimum of its own.
    pub low_stock_threshold: i64,
    /// Entries expiring within this many days are "expiring soon".
    pub expiry_warning_days: i64,
    /// Days remaining at or below which an expiry is critical.
    pub critical_days: i64,
    /// Days remaining at or below which an expiry is a warning.
    pub warning_days: i64,
}

/// Report configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Trailing window, in days, used to measure product rotation.
    pub rotation_window_days: i64,
    /// Number of months shown in a product's rotation evolution.
    pub evolution_months: u32,
    /// Default number of rows in the top products report.
    pub top_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_sample_data: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            expiry_warning_days: 30,
            critical_days: 5,
            warning_days: 15,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rotation_window_days: 30,
            evolution_months: 6,
            top_limit: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `ECOSTOCK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ECOSTOCK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Suggested location for a file-backed database.
    #[must_use]
    pub fn default_database_path() -> PathBuf {
        Self::default_data_dir().join(DATABASE_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let alerts = &self.alerts;

        if alerts.low_stock_threshold < 0 {
            return Err(Error::ConfigValidation {
                message: "low_stock_threshold cannot be negative".to_string(),
            });
        }

        if alerts.critical_days < 0 {
            return Err(Error::ConfigValidation {
                message: "critical_days cannot be negative".to_string(),
            });
        }

        if alerts.critical_days > alerts.warning_days {
            return Err(Error::ConfigValidation {
                message: format!(
                    "critical_days ({}) cannot be greater than warning_days ({})",
                    alerts.critical_days, alerts.warning_days
                ),
            });
        }

        if alerts.warning_days > alerts.expiry_warning_days {
            return Err(Error::ConfigValidation {
                message: format!(
                    "warning_days ({}) cannot be greater than expiry_warning_days ({})",
                    alerts.warning_days, alerts.expiry_warning_days
                ),
            });
        }

        if !(1..=MAX_ROTATION_WINDOW_DAYS).contains(&self.reports.rotation_window_days) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "rotation_window_days must be between 1 and {MAX_ROTATION_WINDOW_DAYS}, got {}",
                    self.reports.rotation_window_days
                ),
            });
        }

        if !(1..=24).contains(&self.reports.evolution_months) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "evolution_months must be between 1 and 24, got {}",
                    self.reports.evolution_months
                ),
            });
        }

        if self.reports.top_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "top_limit must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Describe where inventory data lives.
    #[must_use]
    pub fn database_location(&self) -> String {
        self.storage
            .database_path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.storage.seed_sample_data);
        assert_eq!(config.server.listen.port(), 8080);
    }

    #[test]
    fn test_default_alert_config() {
        let alerts = AlertConfig::default();

        assert_eq!(alerts.low_stock_threshold, 10);
        assert_eq!(alerts.expiry_warning_days, 30);
        assert_eq!(alerts.critical_days, 5);
        assert_eq!(alerts.warning_days, 15);
    }

    #[test]
    fn test_default_report_config() {
        let reports = ReportConfig::default();

        assert_eq!(reports.rotation_window_days, 30);
        assert_eq!(reports.evolution_months, 6);
        assert_eq!(reports.top_limit, 10);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_negative_threshold() {
        let mut config = Config::default();
        config.alerts.low_stock_threshold = -1;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("low_stock_threshold"));
    }

    #[test]
    fn test_validate_critical_after_warning() {
        let mut config = Config::default();
        config.alerts.critical_days = 20;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("critical_days"));
    }

    #[test]
    fn test_validate_warning_after_expiry_window() {
        let mut config = Config::default();
        config.alerts.warning_days = 45;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("expiry_warning_days"));
    }

    #[test]
    fn test_validate_zero_rotation_window() {
        let mut config = Config::default();
        config.reports.rotation_window_days = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("rotation_window_days"));
    }

    #[test]
    fn test_validate_evolution_months_bounds() {
        let mut config = Config::default();
        config.reports.evolution_months = 0;
        assert!(config.validate().is_err());

        config.reports.evolution_months = 25;
        assert!(config.validate().is_err());

        config.reports.evolution_months = 12;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rotation_window_bounds() {
        let mut config = Config::default();
        config.reports.rotation_window_days = 0;
        assert!(config.validate().is_err());

        config.reports.rotation_window_days = i64::MAX;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("rotation_window_days"));

        config.reports.rotation_window_days = 3650;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_top_limit() {
        let mut config = Config::default();
        config.reports.top_limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("top_limit"));
    }

    #[test]
    fn test_database_location() {
        let mut config = Config::default();
        assert_eq!(config.database_location(), ":memory:");

        config.storage.database_path = Some(PathBuf::from("/srv/ecostock/inventory.db"));
        assert_eq!(config.database_location(), "/srv/ecostock/inventory.db");
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("ecostock"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_database_path() {
        let path = Config::default_database_path();
        assert!(path.to_string_lossy().contains("inventory.db"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[alerts]\nlow_stock_threshold = 4\n\n[server]\nlisten = \"0.0.0.0:9000\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.alerts.low_stock_threshold, 4);
        assert_eq!(config.alerts.expiry_warning_days, 30);
        assert_eq!(config.server.listen.port(), 9000);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[reports]\ntop_limit = 0\n").unwrap();

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_alert_config_deserialize() {
        let json = r#"{"low_stock_threshold": 3, "warning_days": 10}"#;
        let alerts: AlertConfig = serde_json::from_str(json).unwrap();
        assert_eq!(alerts.low_stock_threshold, 3);
        assert_eq!(alerts.warning_days, 10);
        assert_eq!(alerts.critical_days, 5);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}

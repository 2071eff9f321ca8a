use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::analytics::query::TOP_TRANSACTIONS_LIMIT;
use crate::errors::{AnalyticsError, Result};
use crate::format::LocaleConfig;
use crate::period::ViewMode;
use crate::utils::paths::{ensure_dir, write_atomic, PathResolver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub default_view: ViewMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_path: Option<PathBuf>,
    #[serde(default = "default_top_transactions")]
    pub top_transactions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-ES".into(),
            currency: "EUR".into(),
            default_view: ViewMode::Month,
            ledger_path: None,
            top_transactions: TOP_TRANSACTIONS_LIMIT,
        }
    }
}

impl Config {
    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }
}

fn default_top_transactions() -> usize {
    TOP_TRANSACTIONS_LIMIT
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the stored configuration, or the defaults when none was saved yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            AnalyticsError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.locale_config().decimal_separator, ',');
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let temp = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            locale: "en-US".into(),
            currency: "USD".into(),
            default_view: ViewMode::Year,
            ledger_path: Some(temp.path().join("ledger.json")),
            top_transactions: 5,
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"locale":"es-MX","currency":"MXN"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.default_view, ViewMode::Month);
        assert_eq!(config.top_transactions, 10);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let temp = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "[]").unwrap();
        assert!(matches!(manager.load(), Err(AnalyticsError::Config(_))));
    }
}

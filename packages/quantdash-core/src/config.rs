//! Dashboard configuration.
//!
//! Loaded in layers: built-in defaults, then a TOML file, then environment
//! overrides. The result is passed explicitly to whatever needs it; nothing
//! here is global.

use crate::analysis::AnalysisOptions;
use crate::data::ProviderConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at the config file.
pub const CONFIG_ENV: &str = "QUANTDASH_CONFIG";

/// Portfolio inputs pre-filled by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortfolioDefaults {
    /// Comma-separated tickers
    pub tickers: String,
    /// Comma-separated weights
    pub weights: String,
    /// Indices shown in the market overview
    pub market_indices: Vec<String>,
}

impl Default for PortfolioDefaults {
    fn default() -> Self {
        Self {
            tickers: "AAPL,MSFT,GOOGL".to_string(),
            weights: "0.4,0.3,0.3".to_string(),
            market_indices: vec!["SPY".to_string(), "QQQ".to_string(), "DIA".to_string()],
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub provider: ProviderConfig,
    pub analysis: AnalysisOptions,
    pub portfolio: PortfolioDefaults,
}

impl DashboardConfig {
    /// Load from the default location and apply environment overrides.
    ///
    /// Default path: `~/.quantdash/config.toml`
    /// Can be overridden with the `QUANTDASH_CONFIG` environment variable.
    /// A missing file is not an error.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&Self::default_path())?;
        config.apply_overrides(|key| env::var(key).ok());
        config.analysis.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".quantdash/config.toml"))
            .unwrap_or_else(|| PathBuf::from("quantdash.toml"))
    }

    /// Load from a specific TOML file, falling back to defaults if it does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`.
    ///
    /// | Key | Field |
    /// |-----|-------|
    /// | `QUANTDASH_PROVIDER` | `provider.provider` |
    /// | `QUANTDASH_DATA_DIR` | `provider.data_dir` |
    /// | `QUANTDASH_API_KEY`, else `FMP_API_KEY` | `provider.api_key` |
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = non_empty("QUANTDASH_PROVIDER") {
            self.provider.provider = provider;
        }
        if let Some(dir) = non_empty("QUANTDASH_DATA_DIR") {
            self.provider.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = non_empty("QUANTDASH_API_KEY").or_else(|| non_empty("FMP_API_KEY")) {
            self.provider.api_key = Some(key);
        }
    }

    /// Write the config as TOML, creating the parent directory if needed.
    ///
    /// The API key is never written.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("cannot serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = DashboardConfig::load_from_path(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.analysis.ma_windows, vec![20, 50]);
        assert_eq!(config.portfolio.market_indices, vec!["SPY", "QQQ", "DIA"]);
    }

    #[test]
    fn test_partial_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[provider]
provider = "polygon"
data_dir = "/tmp/prices"

[analysis]
ma_windows = [5, 10, 200]
rsi_period = 21
"#,
        )
        .unwrap();

        let config = DashboardConfig::load_from_path(&path).unwrap();

        assert_eq!(config.provider.provider, "polygon");
        assert_eq!(config.provider.data_dir, PathBuf::from("/tmp/prices"));
        assert_eq!(config.analysis.ma_windows, vec![5, 10, 200]);
        assert_eq!(config.analysis.rsi_period, 21);
        // Unspecified fields keep their defaults
        assert_eq!(config.analysis.bollinger_window, 20);
        assert_eq!(config.portfolio.weights, "0.4,0.3,0.3");
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "analysis = [").unwrap();

        assert!(matches!(
            DashboardConfig::load_from_path(&path),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("QUANTDASH_PROVIDER", "snapshot"),
            ("QUANTDASH_DATA_DIR", "/data/prices"),
            ("FMP_API_KEY", "fmp-key"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider.provider, "snapshot");
        assert_eq!(config.provider.data_dir, PathBuf::from("/data/prices"));
        assert_eq!(config.provider.api_key.as_deref(), Some("fmp-key"));
    }

    #[test]
    fn test_quantdash_key_wins_and_blank_is_ignored() {
        let vars: HashMap<&str, &str> = [
            ("QUANTDASH_API_KEY", "own-key"),
            ("FMP_API_KEY", "fmp-key"),
            ("QUANTDASH_PROVIDER", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider.api_key.as_deref(), Some("own-key"));
        assert_eq!(config.provider.provider, "fmp");
    }

    #[test]
    fn test_save_round_trip_without_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = DashboardConfig::default();
        config.provider.api_key = Some("secret".to_string());
        config.analysis.ma_windows = vec![10];
        config.save_to_path(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("secret"));

        let reloaded = DashboardConfig::load_from_path(&path).unwrap();
        assert_eq!(reloaded.analysis.ma_windows, vec![10]);
        assert_eq!(reloaded.provider.api_key, None);
    }
}

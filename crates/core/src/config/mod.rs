//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (VIEWTALLY_*)
//! 2. TOML config file (if VIEWTALLY_CONFIG_FILE set)
//! 3. Built-in defaults

use std::num::NonZeroU64;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

const DEFAULT_FLUSH_THRESHOLD: NonZeroU64 = match NonZeroU64::new(10) {
    Some(t) => t,
    None => unreachable!(),
};

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (VIEWTALLY_*)
/// 2. TOML config file (if VIEWTALLY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite article database.
    ///
    /// Set via VIEWTALLY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Persist a view count whenever it reaches a multiple of this value.
    ///
    /// Set via VIEWTALLY_FLUSH_THRESHOLD environment variable. Zero is
    /// rejected at load time.
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: NonZeroU64,

    /// Keep in-flight view counts in memory.
    ///
    /// When false every increment is written to the database.
    /// Set via VIEWTALLY_CACHE_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Maximum number of articles with a cached view count.
    ///
    /// Set via VIEWTALLY_CACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,

    /// Drop cached counts not touched for this many seconds.
    ///
    /// Set via VIEWTALLY_CACHE_IDLE_SECS environment variable.
    #[serde(default)]
    pub cache_idle_secs: Option<u64>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./viewtally.sqlite")
}

fn default_flush_threshold() -> NonZeroU64 {
    DEFAULT_FLUSH_THRESHOLD
}

fn default_true() -> bool {
    true
}

fn default_cache_max_entries() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            flush_threshold: default_flush_threshold(),
            cache_enabled: true,
            cache_max_entries: default_cache_max_entries(),
            cache_idle_secs: None,
        }
    }
}

impl AppConfig {
    /// Idle expiry for cached counts, if configured.
    pub fn cache_idle(&self) -> Option<Duration> {
        self.cache_idle_secs.map(Duration::from_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `VIEWTALLY_`
    /// 2. TOML file from `VIEWTALLY_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("VIEWTALLY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("VIEWTALLY_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::extract(&figment)
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./viewtally.sqlite"));
        assert_eq!(config.flush_threshold.get(), 10);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_max_entries, 10_000);
        assert!(config.cache_idle_secs.is_none());
    }

    #[test]
    fn test_cache_idle_duration() {
        let config = AppConfig { cache_idle_secs: Some(90), ..Default::default() };
        assert_eq!(config.cache_idle(), Some(Duration::from_secs(90)));
        assert_eq!(AppConfig::default().cache_idle(), None);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(
            "flush_threshold = 25\ncache_enabled = false\ncache_idle_secs = 600",
        ));

        let config = AppConfig::extract(&figment).unwrap();
        assert_eq!(config.flush_threshold.get(), 25);
        assert!(!config.cache_enabled);
        assert_eq!(config.cache_idle_secs, Some(600));
        assert_eq!(config.cache_max_entries, 10_000);
    }

    #[test]
    fn test_zero_threshold_rejected_at_load() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string("flush_threshold = 0"));

        let result = AppConfig::extract(&figment);
        assert!(matches!(result, Err(ConfigError::LoadFailed(_))));
    }
}

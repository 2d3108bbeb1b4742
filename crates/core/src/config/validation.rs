//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Largest accepted flush threshold.
pub const MAX_FLUSH_THRESHOLD: u64 = 1_000_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `db_path` is empty
    /// - `flush_threshold` exceeds 1,000,000
    /// - `cache_max_entries` is 0 while the cache is enabled
    /// - `cache_idle_secs` is set to 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "db_path".into(), reason: "must not be empty".into() });
        }

        if self.flush_threshold.get() > MAX_FLUSH_THRESHOLD {
            return Err(ConfigError::Invalid {
                field: "flush_threshold".into(),
                reason: format!("must not exceed {MAX_FLUSH_THRESHOLD}"),
            });
        }

        if self.cache_enabled && self.cache_max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_entries".into(),
                reason: "must be greater than 0 when the cache is enabled".into(),
            });
        }

        if self.cache_idle_secs == Some(0) {
            return Err(ConfigError::Invalid { field: "cache_idle_secs".into(), reason: "must be greater than 0".into() });
        }

        if !self.cache_enabled {
            tracing::warn!(
                flush_threshold = self.flush_threshold.get(),
                "view cache disabled; every increment is written to the database \
                 and flush_threshold has no effect"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU64;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_db_path() {
        let config = AppConfig { db_path: PathBuf::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "db_path"));
    }

    #[test]
    fn test_validate_threshold_bounds() {
        let config = AppConfig { flush_threshold: NonZeroU64::MIN, ..Default::default() };
        assert!(config.validate().is_ok());

        let config =
            AppConfig { flush_threshold: NonZeroU64::new(MAX_FLUSH_THRESHOLD).unwrap(), ..Default::default() };
        assert!(config.validate().is_ok());

        let config =
            AppConfig { flush_threshold: NonZeroU64::new(MAX_FLUSH_THRESHOLD + 1).unwrap(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "flush_threshold"));
    }

    #[test]
    fn test_validate_zero_capacity() {
        let config = AppConfig { cache_max_entries: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_entries"));

        let config = AppConfig { cache_max_entries: 0, cache_enabled: false, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_idle() {
        let config = AppConfig { cache_idle_secs: Some(0), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_idle_secs"));
    }
}

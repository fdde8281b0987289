//! Application configuration.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config`, or `grantstore.toml` in the working directory)
//! 3. Environment variables, e.g. `GRANTSTORE__REDIS__URL=redis://cache:6379`

use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use grantstore_core::StorageConfig;
use grantstore_redis::RedisConfig;

/// Default configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "grantstore.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "GRANTSTORE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Validates all sections.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.storage.validate().context("invalid [storage] section")?;

        if self.redis.pool_size == 0 {
            anyhow::bail!("redis.pool_size must be > 0");
        }
        let scheme_ok = ["redis://", "rediss://", "unix://", "redis+unix://"]
            .iter()
            .any(|scheme| self.redis.url.starts_with(scheme));
        if !scheme_ok {
            anyhow::bail!("redis.url must start with redis://, rediss:// or unix://");
        }

        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            anyhow::bail!("logging.level must be one of {valid_levels:?}");
        }
        Ok(())
    }
}

/// Loads and validates configuration.
///
/// A missing file is not an error: `path` falls back to defaults plus
/// environment overrides, same as when no file exists at the default path.
///
/// # Errors
///
/// Returns an error if a source cannot be parsed or the merged
/// configuration is invalid.
pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();
    let file = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
    if file.exists() {
        builder = builder.add_source(File::from(file));
    } else if path.is_some() {
        tracing::warn!(path = %file.display(), "Config file not found, using defaults");
    }

    // Environment variable overrides, e.g., GRANTSTORE__STORAGE__MAX_CHAIN_DEPTH=4
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__"),
    );

    let merged: AppConfig = builder
        .build()
        .context("config build error")?
        .try_deserialize()
        .context("config deserialize error")?;
    merged.validate()?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.logging.level, "warn");
        assert_eq!(cfg.redis.url, "redis://localhost:6379");
        assert_eq!(cfg.storage.max_chain_depth, 16);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_rejects_non_redis_url() {
        let mut cfg = AppConfig::default();
        cfg.redis.url = "http://localhost:6379".into();
        assert!(cfg.validate().is_err());
    }
}

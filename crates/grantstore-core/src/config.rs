//! Storage behaviour configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::expiry::{DEFAULT_TOKEN_LIFETIME, ExpirationPolicy};

/// Tunables for the entity stores.
///
/// # Example (TOML)
///
/// ```toml
/// [storage]
/// token_lifetime = "7d"
/// max_chain_depth = 16
/// atomic_token_writes = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Lifetime of access token and refresh mapping records.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// Maximum number of predecessors resolved when loading an access
    /// token. Bounds load latency and stops corrupted self-referencing
    /// chains. `0` skips previous-token resolution entirely.
    pub max_chain_depth: usize,

    /// Submit the access token and refresh mapping writes as one
    /// transaction instead of a plain pipeline.
    pub atomic_token_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            max_chain_depth: 16,
            atomic_token_writes: false,
        }
    }
}

impl StorageConfig {
    /// Expiry policy derived from this configuration.
    #[must_use]
    pub fn expiration_policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::new(self.token_lifetime)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the token lifetime is shorter
    /// than one second (the store's expiry resolution).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_lifetime.as_secs() == 0 {
            return Err(ConfigError::InvalidValue(
                "token_lifetime must be at least 1s".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StorageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.token_lifetime, Duration::from_secs(604_800));
        assert_eq!(config.max_chain_depth, 16);
        assert!(!config.atomic_token_writes);
    }

    #[test]
    fn test_sub_second_lifetime_fails_validation() {
        let config = StorageConfig {
            token_lifetime: Duration::from_millis(500),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("token_lifetime"));
    }

    #[test]
    fn test_humantime_lifetime_parses() {
        let config: StorageConfig =
            serde_json::from_str(r#"{"token_lifetime":"1day","max_chain_depth":4}"#).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(86_400));
        assert_eq!(config.max_chain_depth, 4);
        assert!(!config.atomic_token_writes);
    }
}

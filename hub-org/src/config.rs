//! Organization manager configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for [`OrganizationManager`](crate::OrganizationManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Upper bound for each storage, authorizer and email call, in seconds.
    pub call_timeout_secs: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 10,
        }
    }
}

impl ManagerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HUB_ORG_CALL_TIMEOUT_SECS`: Per-call timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            call_timeout_secs: std::env::var("HUB_ORG_CALL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.call_timeout_secs),
        }
    }

    /// Get the per-call timeout as a Duration.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HUB_ORG_CALL_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.call_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ManagerConfig {
            call_timeout_secs: 0,
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("HUB_ORG_CALL_TIMEOUT_SECS"));
    }
}

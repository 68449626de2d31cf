//! Email transport configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development against a mail catcher.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for the transactional email API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Base URL of the email API (e.g., "https://mail.example.com").
    pub api_url: String,

    /// API key sent as a bearer token.
    pub api_key: Option<String>,

    /// Sender address.
    pub from_address: String,

    /// Sender display name.
    pub from_name: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8025".to_string(),
            api_key: None,
            from_address: "hub@localhost".to_string(),
            from_name: "Hub".to_string(),
            timeout_secs: 10,
        }
    }
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EMAIL_API_URL`: Email API URL (default: http://localhost:8025)
    /// - `EMAIL_API_KEY`: Email API key
    /// - `EMAIL_FROM_ADDRESS`: Sender address (default: hub@localhost)
    /// - `EMAIL_FROM_NAME`: Sender display name (default: Hub)
    /// - `EMAIL_TIMEOUT_SECS`: Request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            api_url: std::env::var("EMAIL_API_URL").unwrap_or(default.api_url),
            api_key: std::env::var("EMAIL_API_KEY").ok(),
            from_address: std::env::var("EMAIL_FROM_ADDRESS").unwrap_or(default.from_address),
            from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or(default.from_name),
            timeout_secs: std::env::var("EMAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a full URL by appending a path to the API URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.api_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Validate that the configuration can be used in production.
    ///
    /// The API URL must be absolute and an API key must be configured.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        match reqwest::Url::parse(&self.api_url) {
            Ok(url) if url.has_host() => {}
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "EMAIL_API_URL".to_string(),
                    message: format!("not an absolute URL: {}", self.api_url),
                })
            }
        }
        if self.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("EMAIL_API_KEY".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "EMAIL_TIMEOUT_SECS".to_string(),
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
        let config = EmailConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_url_joining() {
        let mut config = EmailConfig::default();
        config.api_url = "https://mail.example.com/".to_string();

        assert_eq!(config.url("/v1/send"), "https://mail.example.com/v1/send");
        assert_eq!(config.url("v1/send"), "https://mail.example.com/v1/send");
    }

    #[test]
    fn test_validate_for_production() {
        let mut config = EmailConfig::default();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        config.api_key = Some("key".to_string());
        assert!(config.validate_for_production().is_ok());

        config.api_url = "/relative".to_string();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}

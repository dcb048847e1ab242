//! Error types for the webhook forwarder
//!
//! Note that a failed delivery is *not* an `Error`: the dispatcher reports it
//! as a [`crate::dispatch::DeliveryResult`] value so the triggering event can
//! never be aborted by webhook trouble. `Error` covers construction problems
//! only (bad configuration, unbuildable HTTP client, unserializable records).

use thiserror::Error;

/// The main error type for webhook forwarder operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing secret, invalid base URL, ...)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (reading record files in the CLI)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required signing secret is absent
    #[error("DYNAMIK_WEBHOOK_SECRET environment variable not set")]
    MissingSecret,

    /// Signing secret present but unusable
    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    /// Base URL failed to parse
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// The offending URL string
        url: String,
        /// Parser message
        reason: String,
    },

    /// A numeric setting failed to parse
    #[error("Invalid value for {name}: {reason}")]
    InvalidSetting {
        /// Environment variable name
        name: &'static str,
        /// Parser message
        reason: String,
    },
}

/// Result type alias for webhook forwarder operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::Config(ConfigError::MissingSecret);
        assert!(err.to_string().contains("DYNAMIK_WEBHOOK_SECRET"));
    }

    #[test]
    fn test_invalid_base_url_display() {
        let err = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("not a url"));
        assert!(err.to_string().contains("relative URL"));
    }
}

//! Webhook forwarder configuration
//!
//! All settings are carried by an explicit [`WebhookConfig`] value injected
//! into the dispatcher at construction; there are no ambient globals. The
//! signing secret is loaded from the environment only and is never logged.
//!
//! # Environment Variables
//!
//! - `DYNAMIK_WEBHOOK_SECRET` (required): shared HMAC signing secret
//! - `DYNAMIK_WEBHOOK_BASE_URL`: backend API root (default
//!   `https://app.dynamikmood.com/api/`)
//! - `DYNAMIK_WEBHOOK_TIMEOUT_SECS`: request timeout (default 3600)
//! - `DYNAMIK_WEBHOOK_VERIFY_TLS`: set to `true` to enable certificate
//!   verification (disabled by default, matching the observed deployment)
//! - `DYNAMIK_FREEMIUM_PRODUCT_ID`: product id of the freemium bundle
//! - `DYNAMIK_CUSTOM_TEST_PRODUCT_IDS`: comma-separated pair of custom-test
//!   product ids
//! - `DYNAMIK_EMAIL_SUBJECT` / `DYNAMIK_EMAIL_BODY`: notification template
//!   overrides (`{{auth_link}}` placeholder)

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::error::{ConfigError, Result};
use crate::notify::EmailTemplate;

/// Default backend API root.
pub const DEFAULT_BASE_URL: &str = "https://app.dynamikmood.com/api/";

/// Default request timeout. The backend provisions accounts synchronously, so
/// the observed deployment waits effectively indefinitely.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Product-id-keyed business rules for offer derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferRules {
    /// Product id of the freemium tool bundle
    pub freemium_product_id: u64,

    /// The distinguished pair of product ids that map to a custom offer
    pub custom_test_product_ids: [u64; 2],
}

impl OfferRules {
    /// Check whether a product id is the freemium bundle
    pub fn is_freemium(&self, product_id: u64) -> bool {
        product_id == self.freemium_product_id
    }

    /// Check whether a product id maps to the custom-test offer shape
    pub fn is_custom_test(&self, product_id: u64) -> bool {
        self.custom_test_product_ids.contains(&product_id)
    }
}

impl Default for OfferRules {
    fn default() -> Self {
        Self {
            freemium_product_id: 4210,
            custom_test_product_ids: [4311, 4312],
        }
    }
}

/// Complete forwarder configuration, injected into the dispatcher and the
/// notification trigger at construction.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Backend API root; endpoint paths are joined onto it
    pub base_url: Url,

    /// Shared HMAC-SHA256 signing secret
    pub secret: String,

    /// HTTP request timeout
    pub timeout: Duration,

    /// Skip TLS certificate verification when true
    pub accept_invalid_certs: bool,

    /// Offer derivation rules
    pub offer_rules: OfferRules,

    /// Customer notification template
    pub email: EmailTemplate,
}

// Manual Debug so the secret can never leak into logs.
impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("base_url", &self.base_url.as_str())
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("offer_rules", &self.offer_rules)
            .finish_non_exhaustive()
    }
}

impl WebhookConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if `DYNAMIK_WEBHOOK_SECRET` is
    /// unset, or a parse error for a malformed base URL / numeric setting.
    pub fn from_env() -> Result<Self> {
        let secret =
            env::var("DYNAMIK_WEBHOOK_SECRET").map_err(|_| ConfigError::MissingSecret)?;
        if secret.trim().is_empty() {
            return Err(ConfigError::InvalidSecret("secret cannot be empty".to_string()).into());
        }
        if secret.len() < 16 {
            warn!("DYNAMIK_WEBHOOK_SECRET is shorter than 16 characters");
        }

        let base_url =
            env::var("DYNAMIK_WEBHOOK_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let timeout_secs = match env::var("DYNAMIK_WEBHOOK_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidSetting {
                    name: "DYNAMIK_WEBHOOK_TIMEOUT_SECS",
                    reason: e.to_string(),
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let verify_tls = env::var("DYNAMIK_WEBHOOK_VERIFY_TLS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if !verify_tls {
            warn!("TLS certificate verification is disabled for webhook delivery");
        }

        let mut offer_rules = OfferRules::default();
        if let Ok(raw) = env::var("DYNAMIK_FREEMIUM_PRODUCT_ID") {
            offer_rules.freemium_product_id =
                raw.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidSetting {
                        name: "DYNAMIK_FREEMIUM_PRODUCT_ID",
                        reason: e.to_string(),
                    }
                })?;
        }
        if let Ok(raw) = env::var("DYNAMIK_CUSTOM_TEST_PRODUCT_IDS") {
            offer_rules.custom_test_product_ids = parse_id_pair(&raw)?;
        }

        let mut email = EmailTemplate::default();
        if let Ok(subject) = env::var("DYNAMIK_EMAIL_SUBJECT") {
            email.subject = subject;
        }
        if let Ok(body) = env::var("DYNAMIK_EMAIL_BODY") {
            email.body = body;
        }

        Ok(Self {
            base_url,
            secret,
            timeout: Duration::from_secs(timeout_secs),
            accept_invalid_certs: !verify_tls,
            offer_rules,
            email,
        })
    }

    /// Create a test configuration (for testing only)
    pub fn test_config(base_url: &str) -> Self {
        Self {
            base_url: parse_base_url(base_url).expect("test base URL must parse"),
            secret: "test-secret-for-unit-tests-only".to_string(),
            timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
            offer_rules: OfferRules::default(),
            email: EmailTemplate::default(),
        }
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Url {
        // Base URL is normalized to end with '/', so join never replaces the
        // API root segment.
        self.base_url
            .join(path.trim_start_matches('/'))
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // A trailing slash matters to Url::join: without it the last path segment
    // would be dropped when endpoints are resolved.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| {
        ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn parse_id_pair(raw: &str) -> Result<[u64; 2]> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(ConfigError::InvalidSetting {
            name: "DYNAMIK_CUSTOM_TEST_PRODUCT_IDS",
            reason: format!("expected two comma-separated ids, got {}", parts.len()),
        }
        .into());
    }
    let first = parts[0]
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidSetting {
            name: "DYNAMIK_CUSTOM_TEST_PRODUCT_IDS",
            reason: e.to_string(),
        })?;
    let second = parts[1]
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidSetting {
            name: "DYNAMIK_CUSTOM_TEST_PRODUCT_IDS",
            reason: e.to_string(),
        })?;
    Ok([first, second])
}

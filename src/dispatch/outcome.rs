//! Delivery outcome classification
//!
//! The dispatcher returns a [`DeliveryResult`] value rather than an error: a
//! failed delivery is an expected outcome that must never abort the
//! triggering storefront event.

use serde::{Deserialize, Serialize};

/// Marker the backend puts in the order response body on success
pub const ORDER_SUCCESS_MESSAGE: &str = "Order processed successfully.";

/// Why a delivery failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network/DNS/TLS failure, non-2xx status, or an unsendable request
    Transport,
    /// The backend answered, but without the expected success marker
    UnexpectedBody,
}

/// Classified result of a single delivery attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryResult {
    /// The backend acknowledged the event; `data` is its response payload
    Success {
        /// Response `data` object (carries `authLink` for orders)
        data: serde_json::Value,
    },
    /// The delivery did not go through
    Failure {
        /// Failure classification
        kind: FailureKind,
        /// Human-readable detail, suitable for an admin notice
        detail: String,
    },
}

impl DeliveryResult {
    /// Build a failure result
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// Whether the backend acknowledged the event
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The one-time authentication link returned for processed orders
    pub fn auth_link(&self) -> Option<&str> {
        match self {
            Self::Success { data } => data.get("authLink").and_then(|v| v.as_str()),
            Self::Failure { .. } => None,
        }
    }

    /// Failure detail text, if any
    pub fn failure_detail(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { detail, .. } => Some(detail),
        }
    }
}

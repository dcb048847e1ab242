//! Signed webhook delivery client
//!
//! One synchronous (awaited) POST per event, no retry. The client is built
//! from an injected [`WebhookConfig`]; nothing here reads ambient globals.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{error, info, warn};

use crate::config::WebhookConfig;
use crate::dispatch::outcome::{DeliveryResult, FailureKind, ORDER_SUCCESS_MESSAGE};
use crate::dispatch::signature::{sign, SIGNATURE_HEADER};
use crate::error::Result;
use crate::payload::{OrderPayload, UserRegistration};

/// Endpoint path for order webhooks
pub const ORDER_ENDPOINT: &str = "webhooks/order";

/// Endpoint path for user registration webhooks
pub const USER_REGISTER_ENDPOINT: &str = "user/register";

/// HTTP client for signed webhook delivery
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookClient {
    /// Build a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Deliver an order payload to `webhooks/order`.
    ///
    /// Success iff the response body carries
    /// `message == "Order processed successfully."`; the body's `data` object
    /// (with the customer's `authLink`) becomes the success payload.
    pub async fn send_order(&self, payload: &OrderPayload) -> DeliveryResult {
        self.deliver(ORDER_ENDPOINT, payload, classify_order_body)
            .await
    }

    /// Deliver a user registration to `user/register`.
    ///
    /// Success iff the response body carries `success == true`.
    pub async fn register_user(&self, registration: &UserRegistration) -> DeliveryResult {
        self.deliver(USER_REGISTER_ENDPOINT, registration, classify_registration_body)
            .await
    }

    /// Serialize, sign, POST, classify.
    async fn deliver<T: serde::Serialize>(
        &self,
        path: &str,
        payload: &T,
        classify: fn(StatusCode, &[u8]) -> DeliveryResult,
    ) -> DeliveryResult {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                // Nothing reached the wire; report as a transport-level loss.
                error!(endpoint = path, error = %e, "Failed to encode webhook payload");
                return DeliveryResult::failure(
                    FailureKind::Transport,
                    format!("failed to encode payload: {e}"),
                );
            }
        };

        let url = self.config.endpoint(path);
        let signature = sign(&body, &self.config.secret);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!(endpoint = path, error = %e, "Webhook transport failure");
                return DeliveryResult::failure(FailureKind::Transport, e.to_string());
            }
        };

        let status = response.status();
        let raw = match response.bytes().await {
            Ok(raw) => raw,
            Err(e) => {
                error!(endpoint = path, error = %e, "Failed to read webhook response");
                return DeliveryResult::failure(FailureKind::Transport, e.to_string());
            }
        };

        let result = classify(status, &raw);
        match &result {
            DeliveryResult::Success { .. } => {
                info!(endpoint = path, "Webhook delivered and acknowledged");
            }
            DeliveryResult::Failure { kind, detail } => {
                warn!(
                    endpoint = path,
                    status = status.as_u16(),
                    kind = ?kind,
                    detail = %detail,
                    "Webhook delivery failed"
                );
            }
        }
        result
    }
}

/// Classify an order-endpoint response. Transport failures cover non-2xx
/// statuses; an acknowledged order yields the body's `data` object.
pub fn classify_order_body(status: StatusCode, body: &[u8]) -> DeliveryResult {
    classify(status, body, |parsed| {
        if parsed.get("message").and_then(|m| m.as_str()) == Some(ORDER_SUCCESS_MESSAGE) {
            Some(parsed.get("data").cloned().unwrap_or(serde_json::Value::Null))
        } else {
            None
        }
    })
}

/// Classify a registration-endpoint response (`success == true`).
pub fn classify_registration_body(status: StatusCode, body: &[u8]) -> DeliveryResult {
    classify(status, body, |parsed| {
        if parsed.get("success").and_then(|s| s.as_bool()).unwrap_or(false) {
            Some(parsed.clone())
        } else {
            None
        }
    })
}

fn classify(
    status: StatusCode,
    body: &[u8],
    accept: impl Fn(&serde_json::Value) -> Option<serde_json::Value>,
) -> DeliveryResult {
    if !status.is_success() {
        return DeliveryResult::failure(
            FailureKind::Transport,
            format!("HTTP {}: {}", status.as_u16(), snippet(body)),
        );
    }
    let parsed: serde_json::Value = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(_) => {
            return DeliveryResult::failure(FailureKind::UnexpectedBody, snippet(body));
        }
    };
    match accept(&parsed) {
        Some(data) => DeliveryResult::Success { data },
        None => DeliveryResult::failure(FailureKind::UnexpectedBody, parsed.to_string()),
    }
}

/// Bounded, lossy preview of a response body for notices and logs.
fn snippet(raw: &[u8]) -> String {
    const MAX: usize = 256;
    let text = String::from_utf8_lossy(raw);
    if text.len() > MAX {
        let mut cut = MAX;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &text[..cut])
    } else {
        text.into_owned()
    }
}

//! End-to-end pipeline tests against a local simulated backend
//!
//! Each test spins up a small axum server standing in for the Dynamik Up
//! API, runs the pipeline, and checks the classified outcome, the customer
//! notification, and the admin notice board.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use dynamik_webhook::config::WebhookConfig;
use dynamik_webhook::dispatch::{verify, FailureKind, SIGNATURE_HEADER};
use dynamik_webhook::model::order::{META_CIVILITY, META_DURATION_TIER};
use dynamik_webhook::model::{Billing, LineItem, Order, OrderStatus, User};
use dynamik_webhook::notify::Mailer;
use dynamik_webhook::offer::TIER_YEAR_IN_TWELVE;
use dynamik_webhook::pipeline::{EventPipeline, OrderSource, UserSource};
use dynamik_webhook::DeliveryResult;

// =============================================================================
// Test doubles
// =============================================================================

#[derive(Clone, Default)]
struct MemorySource {
    orders: HashMap<u64, Order>,
    users: HashMap<u64, User>,
}

#[async_trait]
impl OrderSource for MemorySource {
    async fn fetch_order(&self, order_id: u64) -> anyhow::Result<Order> {
        self.orders
            .get(&order_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("order {order_id} not found"))
    }
}

#[async_trait]
impl UserSource for MemorySource {
    async fn fetch_user(&self, user_id: u64) -> anyhow::Result<User> {
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("user {user_id} not found"))
    }
}

/// Mailer that records every send
#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((
            to.to_string(),
            subject.to_string(),
            html_body.to_string(),
        ));
        Ok(())
    }
}

/// Request captured by the simulated backend
#[derive(Clone, Debug)]
struct CapturedRequest {
    signature: String,
    body: Vec<u8>,
}

type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

async fn spawn_backend(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn capture_route(
    path: &str,
    captured: Captured,
    response: serde_json::Value,
) -> Router {
    Router::new().route(
        path,
        post(move |headers: HeaderMap, body: Bytes| {
            let captured = captured.clone();
            let response = response.clone();
            async move {
                let signature = headers
                    .get(SIGNATURE_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                captured.lock().unwrap().push(CapturedRequest {
                    signature,
                    body: body.to_vec(),
                });
                Json(response)
            }
        }),
    )
}

// =============================================================================
// Fixtures
// =============================================================================

fn sample_order() -> Order {
    Order {
        id: 77,
        status: OrderStatus::Completed,
        customer_id: 7,
        billing: Billing {
            first_name: "Claire".to_string(),
            last_name: "Dupont".to_string(),
            company: "ACME".to_string(),
            address_1: "1 rue de la Paix".to_string(),
            email: "billing@x.test".to_string(),
            phone: "+33 1 02 03 04 05".to_string(),
        },
        meta: HashMap::from([(META_CIVILITY.to_string(), "Mme".to_string())]),
        items: vec![LineItem {
            product_id: 300,
            name: "Pack Dynamik".to_string(),
            quantity: 1,
            total: 149.90,
            meta: HashMap::from([(
                META_DURATION_TIER.to_string(),
                TIER_YEAR_IN_TWELVE.to_string(),
            )]),
            categories: vec![],
        }],
    }
}

fn sample_user() -> User {
    User {
        id: 7,
        username: "cdupont".to_string(),
        display_name: "Claire Dupont".to_string(),
        first_name: "Claire".to_string(),
        last_name: "Dupont".to_string(),
        email: "claire@x.test".to_string(),
        ..Default::default()
    }
}

fn source() -> MemorySource {
    MemorySource {
        orders: HashMap::from([(77, sample_order())]),
        users: HashMap::from([(7, sample_user())]),
    }
}

fn pipeline_for(
    addr: SocketAddr,
    mailer: RecordingMailer,
) -> EventPipeline<MemorySource, MemorySource, RecordingMailer> {
    let config = WebhookConfig::test_config(&format!("http://{addr}/api/"));
    EventPipeline::new(&config, source(), source(), mailer).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn order_success_triggers_exactly_one_notification() {
    let captured: Captured = Arc::default();
    let app = capture_route(
        "/api/webhooks/order",
        captured.clone(),
        json!({
            "message": "Order processed successfully.",
            "data": { "authLink": "https://x/y" }
        }),
    );
    let addr = spawn_backend(app).await;

    let mailer = RecordingMailer::default();
    let pipeline = pipeline_for(addr, mailer.clone());

    let result = pipeline.handle_order_completed(77).await;
    assert!(result.is_success());
    assert_eq!(result.auth_link(), Some("https://x/y"));

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "exactly one notification must be sent");
    let (to, _subject, body) = &sent[0];
    assert_eq!(to, "claire@x.test");
    assert!(body.contains("https://x/y"));

    assert_eq!(
        pipeline.notices().take_success().as_deref(),
        Some("Order data sent successfully!")
    );
    assert_eq!(pipeline.notices().take_error(), None);
}

#[tokio::test]
async fn order_request_is_signed_over_exact_body() {
    let captured: Captured = Arc::default();
    let app = capture_route(
        "/api/webhooks/order",
        captured.clone(),
        json!({
            "message": "Order processed successfully.",
            "data": { "authLink": "https://x/y" }
        }),
    );
    let addr = spawn_backend(app).await;

    let pipeline = pipeline_for(addr, RecordingMailer::default());
    pipeline.handle_order_completed(77).await;

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(verify(
        &request.body,
        &request.signature,
        "test-secret-for-unit-tests-only"
    ));

    // the wire document carries the assembled contract
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["firstname"], "Claire");
    assert_eq!(body["email"], "claire@x.test");
    assert_eq!(body["offer_subscription"]["validity"], 12);
    assert!(body.get("custom_offer").is_none());
}

#[tokio::test]
async fn transport_error_sends_no_notification() {
    // bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mailer = RecordingMailer::default();
    let pipeline = pipeline_for(addr, mailer.clone());

    let result = pipeline.handle_order_completed(77).await;
    match &result {
        DeliveryResult::Failure { kind, .. } => assert_eq!(*kind, FailureKind::Transport),
        DeliveryResult::Success { .. } => panic!("expected transport failure"),
    }

    assert!(mailer.sent.lock().unwrap().is_empty());

    let notice = pipeline.notices().take_error();
    assert!(notice.is_some(), "failure text must be captured for display");
    assert_eq!(pipeline.notices().take_success(), None);
}

#[tokio::test]
async fn unexpected_body_is_a_failure() {
    let captured: Captured = Arc::default();
    let app = capture_route(
        "/api/webhooks/order",
        captured.clone(),
        json!({ "message": "Order queued." }),
    );
    let addr = spawn_backend(app).await;

    let mailer = RecordingMailer::default();
    let pipeline = pipeline_for(addr, mailer.clone());

    let result = pipeline.handle_order_completed(77).await;
    match &result {
        DeliveryResult::Failure { kind, detail } => {
            assert_eq!(*kind, FailureKind::UnexpectedBody);
            assert!(detail.contains("Order queued."));
        }
        DeliveryResult::Success { .. } => panic!("expected failure"),
    }

    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn user_registration_classified_on_success_flag() {
    let captured: Captured = Arc::default();
    let app = capture_route(
        "/api/user/register",
        captured.clone(),
        json!({ "success": true }),
    );
    let addr = spawn_backend(app).await;

    let pipeline = pipeline_for(addr, RecordingMailer::default());
    let result = pipeline.handle_user_registered(7).await;
    assert!(result.is_success());

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["username"], "cdupont");
    assert_eq!(body["firstName"], "Claire");
    assert!(verify(
        &requests[0].body,
        &requests[0].signature,
        "test-secret-for-unit-tests-only"
    ));

    assert_eq!(
        pipeline.notices().take_success().as_deref(),
        Some("User data sent successfully!")
    );
}

#[tokio::test]
async fn guest_checkout_resolves_from_billing_only() {
    let captured: Captured = Arc::default();
    let app = capture_route(
        "/api/webhooks/order",
        captured.clone(),
        json!({
            "message": "Order processed successfully.",
            "data": { "authLink": "https://x/y" }
        }),
    );
    let addr = spawn_backend(app).await;

    // order's customer has no user record
    let mut orders = source();
    orders.users.clear();

    let mailer = RecordingMailer::default();
    let config = WebhookConfig::test_config(&format!("http://{addr}/api/"));
    let pipeline =
        EventPipeline::new(&config, orders.clone(), orders, mailer.clone()).unwrap();

    let result = pipeline.handle_order_completed(77).await;
    assert!(result.is_success());

    let requests = captured.lock().unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["firstname"], "Claire");
    // account email absent: falls back to the billing address
    assert_eq!(body["email"], "billing@x.test");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "billing@x.test");
}

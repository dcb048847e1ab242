//! Event orchestration
//!
//! Wires the full sequence behind the two storefront triggers:
//!
//! ```text
//! user registered  ──▶ fetch user  ──▶ UserRegistration ──▶ dispatch
//! order completed  ──▶ fetch order ──▶ resolve + build  ──▶ dispatch ──▶ notify
//!                        + user           (assemble)
//! ```
//!
//! Each invocation runs inline and awaited, independent of any other; the
//! notice board is the only shared state and is last-write-wins. Nothing in
//! here returns an `Err` or panics for a failed delivery: the triggering
//! storefront action (e.g. checkout completion) must never be aborted by
//! webhook trouble.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::WebhookConfig;
use crate::dispatch::outcome::FailureKind;
use crate::dispatch::{DeliveryResult, NoticeBoard, WebhookClient};
use crate::error::Result;
use crate::model::{Order, User};
use crate::notify::{Mailer, Notifier};
use crate::payload::{OrderPayload, UserRegistration};

/// Admin notice text for an acknowledged order
pub const ORDER_SENT_NOTICE: &str = "Order data sent successfully!";

/// Admin notice text for an acknowledged registration
pub const USER_SENT_NOTICE: &str = "User data sent successfully!";

/// Read access to order records (the e-commerce data layer)
#[async_trait]
pub trait OrderSource: Send + Sync + 'static {
    /// Fetch the full order record for an order id
    async fn fetch_order(&self, order_id: u64) -> anyhow::Result<Order>;
}

/// Read access to user records (the CMS data layer)
#[async_trait]
pub trait UserSource: Send + Sync + 'static {
    /// Fetch the full user record for a user id
    async fn fetch_user(&self, user_id: u64) -> anyhow::Result<User>;
}

/// Runs the resolve → build → assemble → dispatch → notify sequence for each
/// triggering event.
pub struct EventPipeline<O, U, M: Mailer> {
    orders: O,
    users: U,
    client: WebhookClient,
    notifier: Notifier<M>,
    notices: Arc<NoticeBoard>,
    config: WebhookConfig,
}

impl<O: OrderSource, U: UserSource, M: Mailer> EventPipeline<O, U, M> {
    /// Build a pipeline from an injected configuration and collaborators.
    pub fn new(config: &WebhookConfig, orders: O, users: U, mailer: M) -> Result<Self> {
        Ok(Self {
            orders,
            users,
            client: WebhookClient::new(config)?,
            notifier: Notifier::new(config.email.clone(), mailer),
            notices: Arc::new(NoticeBoard::new()),
            config: config.clone(),
        })
    }

    /// The last-delivery-outcome signal for an admin surface to render.
    pub fn notices(&self) -> Arc<NoticeBoard> {
        Arc::clone(&self.notices)
    }

    /// Handle a "user created" event.
    pub async fn handle_user_registered(&self, user_id: u64) -> DeliveryResult {
        let user = match self.users.fetch_user(user_id).await {
            Ok(user) => user,
            Err(e) => return self.record_fetch_failure("user", user_id, e),
        };

        info!(user_id, "Forwarding user registration");
        let registration = UserRegistration::from_user(&user);
        let result = self.client.register_user(&registration).await;
        self.notices.post_result(&result, USER_SENT_NOTICE);
        result
    }

    /// Handle an "order reached completed/processing status" event.
    ///
    /// On an acknowledged delivery carrying an authentication link, the
    /// customer notification email is sent; its failure never changes the
    /// returned result.
    pub async fn handle_order_completed(&self, order_id: u64) -> DeliveryResult {
        let order = match self.orders.fetch_order(order_id).await {
            Ok(order) => order,
            Err(e) => return self.record_fetch_failure("order", order_id, e),
        };

        // Guest checkouts have no account; the resolver falls back to the
        // billing block for every field.
        let user = match self.users.fetch_user(order.customer_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    order_id,
                    customer_id = order.customer_id,
                    error = %e,
                    "No user record for order customer, resolving from billing only"
                );
                User::default()
            }
        };

        info!(order_id, customer_id = order.customer_id, "Forwarding order");
        let payload = OrderPayload::assemble(&order, &user, &self.config.offer_rules);
        let result = self.client.send_order(&payload).await;
        self.notices.post_result(&result, ORDER_SENT_NOTICE);

        if let Some(auth_url) = result.auth_link() {
            self.notifier.notify(&payload.email, auth_url).await;
        }

        result
    }

    fn record_fetch_failure(
        &self,
        entity: &str,
        id: u64,
        error: anyhow::Error,
    ) -> DeliveryResult {
        warn!(entity, id, error = %error, "Record fetch failed, nothing dispatched");
        let result = DeliveryResult::failure(
            FailureKind::Transport,
            format!("failed to load {entity} {id}: {error}"),
        );
        self.notices.post_result(&result, "");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::LoggingMailer;

    struct EmptySource;

    #[async_trait]
    impl OrderSource for EmptySource {
        async fn fetch_order(&self, order_id: u64) -> anyhow::Result<Order> {
            anyhow::bail!("no order {order_id}")
        }
    }

    #[async_trait]
    impl UserSource for EmptySource {
        async fn fetch_user(&self, user_id: u64) -> anyhow::Result<User> {
            anyhow::bail!("no user {user_id}")
        }
    }

    #[tokio::test]
    async fn test_missing_order_fails_without_dispatch() {
        let config = WebhookConfig::test_config("https://unreachable.invalid/api");
        let pipeline =
            EventPipeline::new(&config, EmptySource, EmptySource, LoggingMailer).unwrap();

        let result = pipeline.handle_order_completed(404).await;
        assert!(!result.is_success());
        assert!(result.failure_detail().unwrap().contains("order 404"));

        // the failure is surfaced on the notice board
        let notice = pipeline.notices().take_error().unwrap();
        assert!(notice.contains("order 404"));
    }

    #[tokio::test]
    async fn test_missing_user_fails_registration() {
        let config = WebhookConfig::test_config("https://unreachable.invalid/api");
        let pipeline =
            EventPipeline::new(&config, EmptySource, EmptySource, LoggingMailer).unwrap();

        let result = pipeline.handle_user_registered(9).await;
        assert!(!result.is_success());
        assert!(result.failure_detail().unwrap().contains("user 9"));
    }
}

//! Dynamik Webhook - E-commerce Event Forwarding for the Dynamik Up Backend
//!
//! This crate listens for e-commerce lifecycle events (user registration,
//! order completion), reshapes the CMS records into the Dynamik Up JSON
//! contract, and delivers them as signed HTTP webhooks.
//!
//! # Architecture
//!
//! ```text
//! CMS Event ──▶ EventPipeline ──▶ Field Resolver + Offer Builder
//!                    │                        │
//!                    ▼                        ▼
//!             ┌────────────┐         ┌────────────────┐
//!             │  Dispatch  │◀────────│    Payload     │
//!             │  (signed   │         │   Assembler    │
//!             │   POST)    │         └────────────────┘
//!             └─────┬──────┘
//!                   │ success + authLink
//!                   ▼
//!         Notification Trigger (customer email)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dynamik_webhook::config::WebhookConfig;
//! use dynamik_webhook::dispatch::WebhookClient;
//! use dynamik_webhook::payload::OrderPayload;
//!
//! # async fn run(order: dynamik_webhook::model::Order, user: dynamik_webhook::model::User) -> anyhow::Result<()> {
//! let config = WebhookConfig::from_env()?;
//! let payload = OrderPayload::assemble(&order, &user, &config.offer_rules);
//! let client = WebhookClient::new(&config)?;
//! let result = client.send_order(&payload).await;
//! println!("delivered: {}", result.is_success());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod notify;
pub mod offer;
pub mod payload;
pub mod pipeline;
pub mod resolver;

// Re-exports for convenience
pub use config::{OfferRules, WebhookConfig};
pub use dispatch::{DeliveryResult, NoticeBoard, WebhookClient};
pub use error::{Error, Result};
pub use payload::{OrderPayload, UserRegistration};
pub use pipeline::EventPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

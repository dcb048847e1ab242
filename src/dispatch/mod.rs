//! Webhook Dispatcher
//!
//! Signs the outbound document (HMAC-SHA256, hex-encoded), issues a single
//! POST to the backend, and classifies the response:
//!
//! ```text
//! Payload -> canonical JSON -> sign -> POST -> classify
//!                                        |
//!                  transport error ------+------ unexpected body
//!                        |               |               |
//!                        v               v               v
//!                 Failure(Transport)  Success{data}  Failure(UnexpectedBody)
//! ```
//!
//! Delivery is best-effort: one attempt, no retry, no queueing. Every outcome
//! is logged and can be posted to a [`NoticeBoard`] for an admin surface to
//! render as a one-shot notice.

pub mod client;
pub mod notice;
pub mod outcome;
pub mod signature;

pub use client::{WebhookClient, ORDER_ENDPOINT, USER_REGISTER_ENDPOINT};
pub use notice::{NoticeBoard, NOTICE_TTL};
pub use outcome::{DeliveryResult, FailureKind, ORDER_SUCCESS_MESSAGE};
pub use signature::{sign, verify, SIGNATURE_HEADER};

//! Domain records fetched from the CMS data layer
//!
//! Everything here is ephemeral: records are fetched and reshaped per webhook
//! invocation, never persisted by this crate.

pub mod order;
pub mod user;

pub use order::{Billing, LineItem, Order, OrderStatus};
pub use user::User;

//! Order, billing, and line item records
//!
//! Shapes mirror what the e-commerce data layer returns for a completed
//! order. Metadata travels as a flat string map; the well-known keys are the
//! `META_*` constants below.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Order metadata key for the customer's civility (Mr/Mrs/...)
pub const META_CIVILITY: &str = "_billing_civility";

/// Order metadata key for the customer's birth date
pub const META_BIRTH: &str = "_billing_birth";

/// Order metadata key for the customer's preferred language
pub const META_LANGUAGE: &str = "_billing_language";

/// Line item metadata key for the duration-tier variation attribute
pub const META_DURATION_TIER: &str = "pa_duree";

/// Line item metadata key for the purchased test count
pub const META_NUMBER_OF_TEST: &str = "number_of_test";

/// Line item metadata key for the purchased consultant count
pub const META_NUMBER_OF_CONSULTANTS: &str = "number_of_consultants";

/// Category name marking a white-label product
pub const WHITE_LABEL_CATEGORY: &str = "Marque Blanche";

/// Order lifecycle status as reported by the e-commerce layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Payment received, fulfilment pending
    Processing,
    /// Order fulfilled
    Completed,
    /// Any status this forwarder does not react to
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Whether this status qualifies the order for forwarding
    pub fn triggers_forwarding(&self) -> bool {
        matches!(self, Self::Processing | Self::Completed)
    }
}

/// Billing block of an order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Billing {
    /// Customer first name as entered at checkout
    #[serde(default)]
    pub first_name: String,
    /// Customer last name as entered at checkout
    #[serde(default)]
    pub last_name: String,
    /// Billing company/organization
    #[serde(default)]
    pub company: String,
    /// First billing address line
    #[serde(default)]
    pub address_1: String,
    /// Billing email
    #[serde(default)]
    pub email: String,
    /// Billing phone
    #[serde(default)]
    pub phone: String,
}

/// A single line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identifier
    pub product_id: u64,
    /// Display name of the purchased product/variation
    #[serde(default)]
    pub name: String,
    /// Purchased quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Line total
    #[serde(default)]
    pub total: f64,
    /// Arbitrary item metadata (duration tier, test/consultant counts, ...)
    #[serde(default)]
    pub meta: HashMap<String, String>,
    /// Category names of the product
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// Look up a metadata value, treating blank entries as absent.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Metadata value parsed as an integer, if present and well-formed.
    pub fn meta_u32(&self, key: &str) -> Option<u32> {
        self.meta(key).and_then(|v| v.parse().ok())
    }

    /// Whether the product carries the white-label category tag.
    pub fn is_white_label(&self) -> bool {
        self.categories.iter().any(|c| c == WHITE_LABEL_CATEGORY)
    }
}

/// Full order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: u64,
    /// Lifecycle status
    #[serde(default = "default_status")]
    pub status: OrderStatus,
    /// Identifier of the purchasing customer
    #[serde(default)]
    pub customer_id: u64,
    /// Billing block
    #[serde(default)]
    pub billing: Billing,
    /// Order-level metadata
    #[serde(default)]
    pub meta: HashMap<String, String>,
    /// Line items; the first one drives offer derivation
    #[serde(default)]
    pub items: Vec<LineItem>,
}

fn default_status() -> OrderStatus {
    OrderStatus::Other
}

impl Order {
    /// Look up an order metadata value, treating blank entries as absent.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// The line item that drives offer derivation. One order maps to one
    /// offer descriptor: only the first item is ever consulted.
    pub fn first_item(&self) -> Option<&LineItem> {
        self.items.first()
    }
}

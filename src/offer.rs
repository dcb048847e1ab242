//! Offer Builder
//!
//! Derives a subscription or custom-offer descriptor from a single line item,
//! keyed by product id:
//!
//! - **Freemium bundle**: 12-month validity, one consultant, never
//!   white-label; the test count comes from the duration-tier variation.
//! - **Custom test products**: alternate descriptor shape with a fixed test
//!   name and count.
//! - **Standard products**: validity from the duration tier, test and
//!   consultant counts from item metadata, white-label from the product's
//!   category tags.
//!
//! Descriptors are derived, never persisted. For a fixed issuance date the
//! derivation is idempotent.

use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::OfferRules;
use crate::model::order::{META_DURATION_TIER, META_NUMBER_OF_CONSULTANTS, META_NUMBER_OF_TEST};
use crate::model::LineItem;

/// Duration tier granting ten tools on the freemium bundle
pub const TIER_PACK_10: &str = "pack-de-10-outils";

/// Duration tier granting one hundred tools on the freemium bundle
pub const TIER_PACK_100: &str = "pack-de-100-outils";

/// Duration tier of the free two-tool freemium variation
pub const TIER_FREE_2: &str = "2-outils-gratuits";

/// Duration tier selecting a one-year subscription paid monthly
pub const TIER_YEAR_IN_TWELVE: &str = "1-an-payable-en-12-mois";

/// Fixed test name attached to custom-test offers
pub const CUSTOM_TEST_NAME: &str = "avatars";

/// Fixed test count attached to custom-test offers
pub const CUSTOM_TEST_COUNT: u32 = 5;

/// Test count applied when a freemium duration tier matches none of the known
/// values. The source system left this case undefined; we settle on 1.
pub const FREEMIUM_TIER_FALLBACK_TESTS: u32 = 1;

/// Subscription offer descriptor sent as `offer_subscription`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDescriptor {
    /// Order the offer was derived from
    pub order_id: u64,
    /// Product/variation display name
    pub name: String,
    /// Whether the offer is resold under a third-party brand
    pub is_white_mark: bool,
    /// Number of tests granted
    pub number_of_test: u32,
    /// Number of consultant seats granted (at least 1)
    pub number_of_consultants: u32,
    /// Product identifier
    pub product_id: u64,
    /// Purchased quantity
    pub quantity: u32,
    /// Line total
    pub price: f64,
    /// Months the offer remains active from issuance
    pub validity: u32,
    /// Issuance date + validity months, `YYYY-MM-DD`
    pub expire_at: String,
}

/// Alternate descriptor shape sent as `custom_offer` for the two custom-test
/// products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomOfferDescriptor {
    /// Order the offer was derived from
    pub order_id: u64,
    /// Product/variation display name
    pub name: String,
    /// Fixed test name (always `"avatars"`)
    pub name_of_test: String,
    /// Fixed test count
    pub number_of_test: u32,
    /// Product identifier
    pub product_id: u64,
    /// Purchased quantity
    pub quantity: u32,
    /// Line total
    pub price: f64,
    /// Months the offer remains active from issuance
    pub validity: u32,
    /// Issuance date + validity months, `YYYY-MM-DD`
    pub expire_at: String,
}

/// The derived offer, one of the two mutually exclusive wire shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Offer {
    /// Standard or freemium subscription
    Subscription(OfferDescriptor),
    /// Custom-test offer
    Custom(CustomOfferDescriptor),
}

/// Derive the offer for a line item, issued today.
pub fn build_offer(order_id: u64, item: &LineItem, rules: &OfferRules) -> Offer {
    build_offer_at(order_id, item, rules, Utc::now().date_naive())
}

/// Derive the offer for a line item with an explicit issuance date.
pub fn build_offer_at(
    order_id: u64,
    item: &LineItem,
    rules: &OfferRules,
    today: NaiveDate,
) -> Offer {
    if rules.is_custom_test(item.product_id) {
        let validity = standard_validity(item);
        return Offer::Custom(CustomOfferDescriptor {
            order_id,
            name: item.name.clone(),
            name_of_test: CUSTOM_TEST_NAME.to_string(),
            number_of_test: CUSTOM_TEST_COUNT,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.total,
            validity,
            expire_at: format_expiry(today, validity),
        });
    }

    let descriptor = if rules.is_freemium(item.product_id) {
        freemium_descriptor(order_id, item, today)
    } else {
        standard_descriptor(order_id, item, today)
    };
    Offer::Subscription(descriptor)
}

/// Freemium bundle: fixed 12-month validity, one consultant, never
/// white-label; test count selected by the duration tier.
fn freemium_descriptor(order_id: u64, item: &LineItem, today: NaiveDate) -> OfferDescriptor {
    let validity = 12;
    let number_of_test = match item.meta(META_DURATION_TIER) {
        Some(TIER_PACK_10) => 10,
        Some(TIER_PACK_100) => 100,
        Some(TIER_FREE_2) => 0,
        tier => {
            warn!(
                order_id,
                product_id = item.product_id,
                tier = tier.unwrap_or("<none>"),
                fallback = FREEMIUM_TIER_FALLBACK_TESTS,
                "Unrecognized freemium duration tier, applying fallback test count"
            );
            FREEMIUM_TIER_FALLBACK_TESTS
        }
    };

    OfferDescriptor {
        order_id,
        name: item.name.clone(),
        is_white_mark: false,
        number_of_test,
        number_of_consultants: 1,
        product_id: item.product_id,
        quantity: item.quantity,
        price: item.total,
        validity,
        expire_at: format_expiry(today, validity),
    }
}

fn standard_descriptor(order_id: u64, item: &LineItem, today: NaiveDate) -> OfferDescriptor {
    let validity = standard_validity(item);
    OfferDescriptor {
        order_id,
        name: item.name.clone(),
        is_white_mark: item.is_white_label(),
        number_of_test: item.meta_u32(META_NUMBER_OF_TEST).unwrap_or(1),
        number_of_consultants: item.meta_u32(META_NUMBER_OF_CONSULTANTS).unwrap_or(1).max(1),
        product_id: item.product_id,
        quantity: item.quantity,
        price: item.total,
        validity,
        expire_at: format_expiry(today, validity),
    }
}

/// 12 months for the year-paid-monthly tier, 1 month otherwise.
fn standard_validity(item: &LineItem) -> u32 {
    if item.meta(META_DURATION_TIER) == Some(TIER_YEAR_IN_TWELVE) {
        12
    } else {
        1
    }
}

/// `today + validity` months, `YYYY-MM-DD`.
fn format_expiry(today: NaiveDate, validity: u32) -> String {
    // checked_add_months only fails near chrono's year limit (~262143), which
    // a real issuance date cannot reach.
    let expires = today
        .checked_add_months(Months::new(validity))
        .unwrap_or(today);
    expires.format("%Y-%m-%d").to_string()
}

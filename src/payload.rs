//! Payload Assembler
//!
//! Pure transformation from CMS records to the outbound JSON documents. The
//! order payload combines the field resolver's customer fields, an `admin`
//! sub-object resolved profile-first, and exactly one of `offer_subscription`
//! or `custom_offer` derived from the first line item. No network or logging
//! side effects.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::OfferRules;
use crate::model::order::META_BIRTH;
use crate::model::{Order, User};
use crate::offer::{build_offer_at, CustomOfferDescriptor, Offer, OfferDescriptor};
use crate::resolver::FieldResolver;

/// The account-administrator sub-object of the order payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminContact {
    /// Administrator first name
    pub firstname: String,
    /// Administrator last name
    pub lastname: String,
    /// Administrator civility
    pub civility: String,
    /// Administrator email
    pub email: String,
}

/// Outbound document for `POST webhooks/order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Customer first name
    pub firstname: String,
    /// Customer last name
    pub lastname: String,
    /// Customer civility
    pub civility: String,
    /// Billing address line
    pub address: String,
    /// Customer birth date
    pub birth: String,
    /// Customer email
    pub email: String,
    /// Customer organization
    pub organization: String,
    /// Customer language
    pub language: String,
    /// Customer job function
    pub function: String,
    /// Customer phone
    pub phone: String,
    /// Account administrator contact
    pub admin: AdminContact,
    /// Subscription offer (standard and freemium products)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_subscription: Option<OfferDescriptor>,
    /// Custom-test offer (the two distinguished product ids)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_offer: Option<CustomOfferDescriptor>,
}

impl OrderPayload {
    /// Assemble the outbound document, issuing offers today.
    pub fn assemble(order: &Order, user: &User, rules: &OfferRules) -> Self {
        Self::assemble_at(order, user, rules, Utc::now().date_naive())
    }

    /// Assemble with an explicit offer issuance date.
    pub fn assemble_at(
        order: &Order,
        user: &User,
        rules: &OfferRules,
        today: NaiveDate,
    ) -> Self {
        let resolver = FieldResolver::new(order, user);

        let mut payload = Self {
            firstname: resolver.firstname(),
            lastname: resolver.lastname(),
            civility: resolver.civility(),
            address: order.billing.address_1.trim().to_string(),
            birth: order.meta(META_BIRTH).unwrap_or_default().to_string(),
            email: resolver.email(),
            organization: resolver.organization(),
            language: resolver.language(),
            function: user.function.trim().to_string(),
            phone: resolver.phone(),
            admin: AdminContact {
                firstname: resolver.admin_firstname(),
                lastname: resolver.admin_lastname(),
                civility: resolver.civility(),
                email: resolver.email(),
            },
            offer_subscription: None,
            custom_offer: None,
        };

        // One order maps to one offer: only the first line item is consulted.
        if let Some(item) = order.first_item() {
            match build_offer_at(order.id, item, rules, today) {
                Offer::Subscription(descriptor) => payload.offer_subscription = Some(descriptor),
                Offer::Custom(descriptor) => payload.custom_offer = Some(descriptor),
            }
        }

        payload
    }
}

/// Outbound document for `POST user/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistration {
    /// CMS user identifier
    pub id: u64,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    /// Profile first name
    #[serde(rename = "firstName")]
    pub first_name: String,
    /// Profile last name
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Account email
    pub email: String,
}

impl UserRegistration {
    /// Build the registration document from a user record.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.display_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

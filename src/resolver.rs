//! Field Resolver
//!
//! Resolves each outbound field from an `(Order, User)` pair using an ordered
//! fallback chain: order billing/metadata first for checkout-entered fields,
//! user profile first for account-owned fields. A field with no value in any
//! source resolves to the empty string; resolution never fails.

use crate::model::order::{META_CIVILITY, META_LANGUAGE};
use crate::model::{Order, User};

/// Fallback language when neither the order nor the user carries one
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Borrowing view over an order/user pair with one accessor per outbound
/// field. Deterministic and side-effect free.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    order: &'a Order,
    user: &'a User,
}

impl<'a> FieldResolver<'a> {
    /// Create a resolver over the given records
    pub fn new(order: &'a Order, user: &'a User) -> Self {
        Self { order, user }
    }

    /// firstname: order billing → user profile
    pub fn firstname(&self) -> String {
        first_non_empty(&[&self.order.billing.first_name, &self.user.first_name])
    }

    /// lastname: order billing → user profile
    pub fn lastname(&self) -> String {
        first_non_empty(&[&self.order.billing.last_name, &self.user.last_name])
    }

    /// civility: order metadata → user profile
    pub fn civility(&self) -> String {
        first_non_empty(&[
            self.order.meta(META_CIVILITY).unwrap_or_default(),
            &self.user.civility,
        ])
    }

    /// email: user account → order billing
    pub fn email(&self) -> String {
        first_non_empty(&[&self.user.email, &self.order.billing.email])
    }

    /// organization: order billing company → user profile
    pub fn organization(&self) -> String {
        first_non_empty(&[&self.order.billing.company, &self.user.organization])
    }

    /// language: order metadata → `"fr"`
    pub fn language(&self) -> String {
        first_non_empty(&[
            self.order.meta(META_LANGUAGE).unwrap_or_default(),
            DEFAULT_LANGUAGE,
        ])
    }

    /// phone: order billing → user profile
    pub fn phone(&self) -> String {
        first_non_empty(&[&self.order.billing.phone, &self.user.phone])
    }

    /// admin firstname: user profile → order billing
    pub fn admin_firstname(&self) -> String {
        first_non_empty(&[&self.user.first_name, &self.order.billing.first_name])
    }

    /// admin lastname: user profile → order billing
    pub fn admin_lastname(&self) -> String {
        first_non_empty(&[&self.user.last_name, &self.order.billing.last_name])
    }
}

/// First non-blank candidate, trimmed of surrounding whitespace; empty string
/// when every source is blank.
fn first_non_empty(candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Billing, Order, OrderStatus, User};
    use pretty_assertions::assert_eq;

    fn order_with_billing(billing: Billing) -> Order {
        Order {
            id: 1,
            status: OrderStatus::Completed,
            customer_id: 7,
            billing,
            meta: Default::default(),
            items: vec![],
        }
    }

    #[test]
    fn test_firstname_prefers_billing() {
        let order = order_with_billing(Billing {
            first_name: "Claire".to_string(),
            ..Default::default()
        });
        let user = User {
            id: 7,
            first_name: "Profile".to_string(),
            ..Default::default()
        };
        assert_eq!(FieldResolver::new(&order, &user).firstname(), "Claire");
    }

    #[test]
    fn test_firstname_falls_back_to_profile() {
        let order = order_with_billing(Billing::default());
        let user = User {
            id: 7,
            first_name: "Profile".to_string(),
            ..Default::default()
        };
        assert_eq!(FieldResolver::new(&order, &user).firstname(), "Profile");
    }

    #[test]
    fn test_email_prefers_account() {
        let order = order_with_billing(Billing {
            email: "billing@x.test".to_string(),
            ..Default::default()
        });
        let user = User {
            id: 7,
            email: "account@x.test".to_string(),
            ..Default::default()
        };
        let resolver = FieldResolver::new(&order, &user);
        assert_eq!(resolver.email(), "account@x.test");

        let sparse_user = User {
            id: 7,
            ..Default::default()
        };
        let resolver = FieldResolver::new(&order, &sparse_user);
        assert_eq!(resolver.email(), "billing@x.test");
    }

    #[test]
    fn test_language_defaults_to_fr() {
        let order = order_with_billing(Billing::default());
        let user = User::default();
        assert_eq!(FieldResolver::new(&order, &user).language(), "fr");
    }

    #[test]
    fn test_language_from_order_meta() {
        let mut order = order_with_billing(Billing::default());
        order
            .meta
            .insert(META_LANGUAGE.to_string(), "en".to_string());
        let user = User::default();
        assert_eq!(FieldResolver::new(&order, &user).language(), "en");
    }

    #[test]
    fn test_civility_prefers_order_meta() {
        let mut order = order_with_billing(Billing::default());
        order
            .meta
            .insert(META_CIVILITY.to_string(), "Mme".to_string());
        let user = User {
            id: 7,
            civility: "M".to_string(),
            ..Default::default()
        };
        assert_eq!(FieldResolver::new(&order, &user).civility(), "Mme");
    }

    #[test]
    fn test_admin_chain_is_profile_first() {
        let order = order_with_billing(Billing {
            first_name: "Billing".to_string(),
            last_name: "Name".to_string(),
            ..Default::default()
        });
        let user = User {
            id: 7,
            first_name: "Profile".to_string(),
            ..Default::default()
        };
        let resolver = FieldResolver::new(&order, &user);
        assert_eq!(resolver.admin_firstname(), "Profile");
        // last name absent on the profile: fall back to billing
        assert_eq!(resolver.admin_lastname(), "Name");
    }

    #[test]
    fn test_all_sources_empty_resolves_empty() {
        let order = order_with_billing(Billing::default());
        let user = User::default();
        let resolver = FieldResolver::new(&order, &user);
        assert_eq!(resolver.firstname(), "");
        assert_eq!(resolver.organization(), "");
        assert_eq!(resolver.phone(), "");
        assert_eq!(resolver.email(), "");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let order = order_with_billing(Billing {
            first_name: "   ".to_string(),
            ..Default::default()
        });
        let user = User {
            id: 7,
            first_name: "Profile".to_string(),
            ..Default::default()
        };
        assert_eq!(FieldResolver::new(&order, &user).firstname(), "Profile");
    }
}

//! User profile record

use serde::{Deserialize, Serialize};

/// A CMS user profile. Any field other than `id` may be empty; the field
/// resolver falls back to the order's billing block where it matters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: u64,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Profile first name
    #[serde(default)]
    pub first_name: String,
    /// Profile last name
    #[serde(default)]
    pub last_name: String,
    /// Account email
    #[serde(default)]
    pub email: String,
    /// Civility (Mr/Mrs/...)
    #[serde(default)]
    pub civility: String,
    /// Organization
    #[serde(default)]
    pub organization: String,
    /// Job function
    #[serde(default)]
    pub function: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
}

//! The canonical gateway user.

use serde::{Deserialize, Serialize};

/// Unified representation of an authenticated caller, independent of the
/// authentication mechanism that produced it.
///
/// A `GatewayUser` is created per request by the resolver chain and mutated
/// only by the customizer chain. Once customization completes, the role list
/// is fully normalized and prefixed and the value is treated as immutable for
/// the remainder of the request. It is never cached across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayUser {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Ordered, deduplicated role names.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Name of the identity provider that produced this user, if external.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Provider-scoped stable identifier for this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Set when the directory reports the account password close to expiry.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub password_expiry_warn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_expiry_days: Option<u32>,
}

impl GatewayUser {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Append `role` unless an equal role name is already present.
    ///
    /// Comparison is by exact string; first-seen order is preserved.
    pub fn push_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if !self.roles.iter().any(|r| *r == role) {
            self.roles.push(role);
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

//! Identity header emission policy.

use serde::{Deserialize, Serialize};

/// Flags controlling which identity-derived headers are added to a proxied
/// request.
///
/// Every field is optional: a per-service policy only overrides the fields
/// it sets, all absent fields inherit from the global default policy at
/// [`HeaderPolicy::merge`] time. Reads go through the accessor methods,
/// which apply the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPolicy {
    /// `sec-proxy` marker telling the upstream the request went through the
    /// gateway.
    pub proxy: Option<bool>,
    /// `sec-username`
    pub username: Option<bool>,
    /// `sec-roles`, `;`-delimited
    pub roles: Option<bool>,
    /// `sec-org`
    pub org: Option<bool>,
    /// `sec-email`
    pub email: Option<bool>,
    /// `sec-firstname`
    pub firstname: Option<bool>,
    /// `sec-lastname`
    pub lastname: Option<bool>,
    /// `sec-user`: Base64-encoded JSON rendering of the canonical user
    pub json_user: Option<bool>,
}

impl HeaderPolicy {
    /// Overlay `overrides` on top of `self`, field by field: a field set in
    /// `overrides` wins, an absent field keeps this policy's value.
    pub fn merge(&self, overrides: &HeaderPolicy) -> HeaderPolicy {
        HeaderPolicy {
            proxy: overrides.proxy.or(self.proxy),
            username: overrides.username.or(self.username),
            roles: overrides.roles.or(self.roles),
            org: overrides.org.or(self.org),
            email: overrides.email.or(self.email),
            firstname: overrides.firstname.or(self.firstname),
            lastname: overrides.lastname.or(self.lastname),
            json_user: overrides.json_user.or(self.json_user),
        }
    }

    pub fn proxy_enabled(&self) -> bool {
        self.proxy.unwrap_or(true)
    }

    pub fn username_enabled(&self) -> bool {
        self.username.unwrap_or(true)
    }

    pub fn roles_enabled(&self) -> bool {
        self.roles.unwrap_or(true)
    }

    pub fn org_enabled(&self) -> bool {
        self.org.unwrap_or(true)
    }

    pub fn email_enabled(&self) -> bool {
        self.email.unwrap_or(false)
    }

    pub fn firstname_enabled(&self) -> bool {
        self.firstname.unwrap_or(false)
    }

    pub fn lastname_enabled(&self) -> bool {
        self.lastname.unwrap_or(false)
    }

    pub fn json_user_enabled(&self) -> bool {
        self.json_user.unwrap_or(false)
    }
}

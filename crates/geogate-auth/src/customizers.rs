//! The identity customizer chain.
//!
//! Customizers mutate every resolved user in ascending order. The
//! roles-mapping customizer runs before the role-prefix customizer so that
//! mapped-in roles get prefixed too; the prefix customizer declares the
//! lowest possible precedence and always runs last.

use std::collections::HashMap;

use geogate_models::{Authentication, GatewayUser, ensure_role_prefix};

use crate::error::AuthError;

/// Mutates an already-resolved canonical user.
///
/// A customizer error aborts the whole chain: authorization must never see a
/// half-normalized identity.
pub trait UserCustomizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Chain position; lower runs earlier, ties keep registration order.
    fn order(&self) -> i32 {
        0
    }

    fn customize(&self, auth: &Authentication, user: GatewayUser)
    -> Result<GatewayUser, AuthError>;
}

/// Unions configured extra roles into the user for every role it already
/// holds.
///
/// Lookup is by exact role name at this point of the chain (before
/// prefixing); appended roles keep first-seen order and are deduplicated by
/// exact string.
pub struct RolesMappingCustomizer {
    mappings: HashMap<String, Vec<String>>,
}

impl RolesMappingCustomizer {
    pub fn new(mappings: HashMap<String, Vec<String>>) -> Self {
        Self { mappings }
    }
}

impl UserCustomizer for RolesMappingCustomizer {
    fn name(&self) -> &'static str {
        "roles-mapping"
    }

    fn customize(
        &self,
        _auth: &Authentication,
        mut user: GatewayUser,
    ) -> Result<GatewayUser, AuthError> {
        let held: Vec<String> = user.roles.clone();
        for role in &held {
            if let Some(extra) = self.mappings.get(role) {
                for mapped in extra {
                    user.push_role(mapped.clone());
                }
            }
        }
        Ok(user)
    }
}

/// Ensures every role carries the canonical prefix.
///
/// Idempotent: prefixing an already-prefixed role is a no-op. Runs last so
/// every role on the final user, whatever its origin, ends up prefixed.
pub struct RolePrefixCustomizer;

impl UserCustomizer for RolePrefixCustomizer {
    fn name(&self) -> &'static str {
        "role-prefix"
    }

    fn order(&self) -> i32 {
        i32::MAX
    }

    fn customize(
        &self,
        _auth: &Authentication,
        mut user: GatewayUser,
    ) -> Result<GatewayUser, AuthError> {
        let roles = std::mem::take(&mut user.roles);
        for role in roles {
            user.push_role(ensure_role_prefix(&role));
        }
        Ok(user)
    }
}

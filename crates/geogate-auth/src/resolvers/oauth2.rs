//! OAuth2 and OpenID Connect resolvers.
//!
//! Both resolvers consume an already-validated login (the wire handshake and
//! token validation happen upstream) and differ only in role handling:
//!
//! - plain OAuth2: the configured normalization flags govern the standard
//!   granted-authority list;
//! - OIDC: standard authorities are always fully normalized, the flags only
//!   govern roles extracted from non-standard claims.

use async_trait::async_trait;
use serde_json::{Map, Value};

use geogate_models::roles::{RoleNormalizationPolicy, fully_normalize};
use geogate_models::{Authentication, AuthenticationSource, GatewayUser};

use super::UserResolver;

fn claim_str(claims: &Map<String, Value>, key: &str) -> Option<String> {
    claims.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Resolver for plain OAuth2 authorization-code logins.
pub struct OAuth2UserResolver {
    policy: RoleNormalizationPolicy,
}

impl OAuth2UserResolver {
    pub fn new(policy: RoleNormalizationPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl UserResolver for OAuth2UserResolver {
    fn name(&self) -> &'static str {
        "oauth2"
    }

    fn order(&self) -> i32 {
        20
    }

    async fn resolve(&self, auth: &Authentication) -> Option<GatewayUser> {
        let AuthenticationSource::OAuth2 { provider, claims } = &auth.source else {
            return None;
        };

        let mut user = GatewayUser::new(&auth.principal);
        for authority in &auth.authorities {
            user.push_role(self.policy.apply(authority));
        }

        user.email = claim_str(claims, "email");
        user.first_name = claim_str(claims, "given_name");
        user.last_name = claim_str(claims, "family_name");
        user.provider = Some(provider.clone());
        user.provider_id = claim_str(claims, "sub").or_else(|| Some(auth.principal.clone()));

        Some(user)
    }
}

/// Resolver for OpenID Connect logins.
pub struct OidcUserResolver {
    policy: RoleNormalizationPolicy,
}

impl OidcUserResolver {
    pub fn new(policy: RoleNormalizationPolicy) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl UserResolver for OidcUserResolver {
    fn name(&self) -> &'static str {
        "oidc"
    }

    fn order(&self) -> i32 {
        10
    }

    async fn resolve(&self, auth: &Authentication) -> Option<GatewayUser> {
        let AuthenticationSource::Oidc { provider, claims } = &auth.source else {
            return None;
        };

        let username = claim_str(claims, "preferred_username")
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| auth.principal.clone());
        let mut user = GatewayUser::new(username);

        // Standard authorities first, in grant order, always fully
        // normalized; the policy flags only govern the claim-derived set.
        // With claim extraction configured and append off, the claim roles
        // replace the standard set entirely.
        if self.policy.append || !self.policy.extracts_claims() {
            for authority in &auth.authorities {
                user.push_role(fully_normalize(authority));
            }
        }
        for role in self.policy.extract_claim_roles(claims) {
            user.push_role(role);
        }

        user.email = claim_str(claims, "email");
        user.first_name = claim_str(claims, "given_name");
        user.last_name = claim_str(claims, "family_name");
        user.provider = Some(provider.clone());
        user.provider_id = claim_str(claims, "sub").or_else(|| Some(auth.principal.clone()));

        Some(user)
    }
}

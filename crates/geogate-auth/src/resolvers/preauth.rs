//! Pre-authenticated header resolver.
//!
//! An upstream SSO proxy that already authenticated the caller asserts the
//! identity through `preauth-*` request headers, flagged trustworthy by the
//! `sec-georchestra-preauthenticated` marker. The resolver trusts those
//! values directly, no lookup involved; the marker and header set must be
//! stripped before the request is forwarded so they never leak downstream.

use async_trait::async_trait;
use tracing::warn;

use geogate_models::{Authentication, AuthenticationSource, GatewayUser, roles::DEFAULT_ROLE};

use super::UserResolver;

/// Trust marker header; pre-auth headers are only honored when its value is
/// `true`.
pub const PREAUTH_HEADER_NAME: &str = "sec-georchestra-preauthenticated";

pub const PREAUTH_USERNAME: &str = "preauth-username";
pub const PREAUTH_EMAIL: &str = "preauth-email";
pub const PREAUTH_FIRSTNAME: &str = "preauth-firstname";
pub const PREAUTH_LASTNAME: &str = "preauth-lastname";
pub const PREAUTH_ORG: &str = "preauth-org";
/// `;`-delimited role list; the base authenticated-user role is always
/// implicitly included.
pub const PREAUTH_ROLES: &str = "preauth-roles";
pub const PREAUTH_PROVIDER: &str = "preauth-provider";
pub const PREAUTH_PROVIDER_ID: &str = "preauth-provider-id";

/// Every header recognized by the pre-authentication trust model, marker
/// included. All of them are removed before forwarding.
pub const PREAUTH_HEADER_NAMES: [&str; 9] = [
    PREAUTH_HEADER_NAME,
    PREAUTH_USERNAME,
    PREAUTH_EMAIL,
    PREAUTH_FIRSTNAME,
    PREAUTH_LASTNAME,
    PREAUTH_ORG,
    PREAUTH_ROLES,
    PREAUTH_PROVIDER,
    PREAUTH_PROVIDER_ID,
];

pub struct PreauthUserResolver;

#[async_trait]
impl UserResolver for PreauthUserResolver {
    fn name(&self) -> &'static str {
        "preauth"
    }

    fn order(&self) -> i32 {
        30
    }

    async fn resolve(&self, auth: &Authentication) -> Option<GatewayUser> {
        let AuthenticationSource::PreAuthenticatedHeaders(headers) = &auth.source else {
            return None;
        };

        let username = headers.get(PREAUTH_USERNAME).map(String::as_str);
        let Some(username) = username.filter(|u| !u.trim().is_empty()) else {
            warn!("pre-authenticated request without {PREAUTH_USERNAME} header");
            return None;
        };

        let mut user = GatewayUser::new(username);
        user.email = headers.get(PREAUTH_EMAIL).cloned();
        user.first_name = headers.get(PREAUTH_FIRSTNAME).cloned();
        user.last_name = headers.get(PREAUTH_LASTNAME).cloned();
        user.organization = headers.get(PREAUTH_ORG).cloned();
        user.provider = headers.get(PREAUTH_PROVIDER).cloned();
        user.provider_id = headers.get(PREAUTH_PROVIDER_ID).cloned();

        user.push_role(DEFAULT_ROLE);
        if let Some(roles) = headers.get(PREAUTH_ROLES) {
            for role in roles.split(';') {
                let role = role.trim();
                if !role.is_empty() {
                    user.push_role(role);
                }
            }
        }

        Some(user)
    }
}

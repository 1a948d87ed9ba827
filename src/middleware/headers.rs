//! Outgoing header policy stage.
//!
//! Last stage before the proxy call. Sanitizes the inbound header set (the
//! regex security filter plus the recognized pre-authentication headers,
//! so trust-boundary headers never leak downstream) and then emits the
//! identity-derived `sec-*` headers the resolved target's policy enables.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use geogate_auth::resolvers::preauth::PREAUTH_HEADER_NAMES;
use geogate_config::HeaderPolicy;
use geogate_models::GatewayUser;

use crate::middleware::RequestContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub const SEC_PROXY: &str = "sec-proxy";
pub const SEC_USERNAME: &str = "sec-username";
pub const SEC_ROLES: &str = "sec-roles";
pub const SEC_ORG: &str = "sec-org";
pub const SEC_EMAIL: &str = "sec-email";
pub const SEC_FIRSTNAME: &str = "sec-firstname";
pub const SEC_LASTNAME: &str = "sec-lastname";
/// Base64-encoded JSON rendering of the whole canonical user.
pub const SEC_USER: &str = "sec-user";

pub async fn header_policy(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();
    let policy = ctx.target().headers.clone();

    let headers = req.headers_mut();
    state.header_filter.remove_matching(headers);
    remove_preauth_headers(headers);
    apply_header_policy(headers, &policy, ctx.user.as_ref());

    Ok(next.run(req).await)
}

/// Strip every header recognized by the pre-authentication trust model,
/// marker included.
pub fn remove_preauth_headers(headers: &mut HeaderMap) {
    for name in PREAUTH_HEADER_NAMES {
        headers.remove(name);
    }
}

/// Emit the identity headers enabled by `policy`. User-derived headers are
/// only attached when a canonical user is present; the proxy marker is
/// attached unconditionally when enabled.
pub fn apply_header_policy(
    headers: &mut HeaderMap,
    policy: &HeaderPolicy,
    user: Option<&GatewayUser>,
) {
    if policy.proxy_enabled() {
        headers.insert(SEC_PROXY, HeaderValue::from_static("true"));
    }

    let Some(user) = user else {
        return;
    };

    if policy.username_enabled() {
        insert(headers, SEC_USERNAME, &user.username);
    }
    if policy.roles_enabled() {
        insert(headers, SEC_ROLES, &user.roles.join(";"));
    }
    if policy.org_enabled() {
        if let Some(org) = &user.organization {
            insert(headers, SEC_ORG, org);
        }
    }
    if policy.email_enabled() {
        if let Some(email) = &user.email {
            insert(headers, SEC_EMAIL, email);
        }
    }
    if policy.firstname_enabled() {
        if let Some(name) = &user.first_name {
            insert(headers, SEC_FIRSTNAME, name);
        }
    }
    if policy.lastname_enabled() {
        if let Some(name) = &user.last_name {
            insert(headers, SEC_LASTNAME, name);
        }
    }
    if policy.json_user_enabled() {
        if let Ok(json) = serde_json::to_string(user) {
            insert(headers, SEC_USER, &BASE64.encode(json));
        }
    }
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) {
    // values that are not valid header material are dropped, not truncated
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geogate_auth::resolvers::preauth::{PREAUTH_HEADER_NAME, PREAUTH_USERNAME};

    fn test_user() -> GatewayUser {
        let mut user = GatewayUser::new("pmartin");
        user.roles = vec!["ROLE_USER".into(), "ROLE_EDITOR".into()];
        user.organization = Some("C2C".into());
        user.email = Some("pmartin@example.com".into());
        user.first_name = Some("Pierre".into());
        user.last_name = Some("Martin".into());
        user
    }

    fn all_on() -> HeaderPolicy {
        HeaderPolicy {
            proxy: Some(true),
            username: Some(true),
            roles: Some(true),
            org: Some(true),
            email: Some(true),
            firstname: Some(true),
            lastname: Some(true),
            json_user: Some(true),
        }
    }

    #[test]
    fn test_apply_all_identity_headers() {
        let mut headers = HeaderMap::new();
        let user = test_user();
        apply_header_policy(&mut headers, &all_on(), Some(&user));

        assert_eq!(headers.get(SEC_PROXY).unwrap(), "true");
        assert_eq!(headers.get(SEC_USERNAME).unwrap(), "pmartin");
        assert_eq!(headers.get(SEC_ROLES).unwrap(), "ROLE_USER;ROLE_EDITOR");
        assert_eq!(headers.get(SEC_ORG).unwrap(), "C2C");
        assert_eq!(headers.get(SEC_EMAIL).unwrap(), "pmartin@example.com");
        assert_eq!(headers.get(SEC_FIRSTNAME).unwrap(), "Pierre");
        assert_eq!(headers.get(SEC_LASTNAME).unwrap(), "Martin");

        let encoded = headers.get(SEC_USER).unwrap().to_str().unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let round_trip: GatewayUser = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(round_trip, user);
    }

    #[test]
    fn test_disabled_flags_emit_nothing() {
        let mut headers = HeaderMap::new();
        let policy = HeaderPolicy {
            proxy: Some(false),
            username: Some(false),
            roles: Some(false),
            org: Some(false),
            ..HeaderPolicy::default()
        };
        apply_header_policy(&mut headers, &policy, Some(&test_user()));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_anonymous_request_only_gets_proxy_marker() {
        let mut headers = HeaderMap::new();
        apply_header_policy(&mut headers, &all_on(), None);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(SEC_PROXY).unwrap(), "true");
    }

    #[test]
    fn test_remove_preauth_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(PREAUTH_HEADER_NAME, HeaderValue::from_static("true"));
        headers.insert(PREAUTH_USERNAME, HeaderValue::from_static("pmartin"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        remove_preauth_headers(&mut headers);
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("content-type"));
    }
}

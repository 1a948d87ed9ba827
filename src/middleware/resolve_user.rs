//! Identity resolution stage.
//!
//! Picks up the request's authentication result — either attached as a
//! request extension by the security layer, or reconstructed from trusted
//! pre-authentication headers — and runs it through the resolver and
//! customizer chains. The canonical user (or its absence) is stored in the
//! [`RequestContext`] for every later stage; no stage resolves identity a
//! second time.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use geogate_auth::resolvers::preauth::{PREAUTH_HEADER_NAME, PREAUTH_USERNAME};
use geogate_models::{Authentication, AuthenticationSource, GatewayUser};

use crate::middleware::RequestContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn resolve_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = match req.extensions().get::<Authentication>() {
        Some(auth) => Some(auth.clone()),
        None => preauth_authentication(req.headers()),
    };

    let user = match &auth {
        Some(auth) => state
            .mapper
            .resolve(auth)
            .await
            .map_err(AppError::internal)?,
        None => None,
    };

    if let Some(user) = &user {
        debug!(username = %user.username, roles = ?user.roles, "canonical user resolved");
    }

    let mut ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();
    ctx.authentication = auth;
    ctx.user = user;
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Reconstruct a pre-authenticated [`Authentication`] from trusted upstream
/// headers, honored only when the trust marker header is `true`.
pub fn preauth_authentication(headers: &HeaderMap) -> Option<Authentication> {
    let marker = headers
        .get(PREAUTH_HEADER_NAME)
        .and_then(|v| v.to_str().ok())?;
    if !marker.eq_ignore_ascii_case("true") {
        return None;
    }

    let preauth: HashMap<String, String> = headers
        .iter()
        .filter(|(name, _)| name.as_str().starts_with("preauth-"))
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let principal = preauth.get(PREAUTH_USERNAME).cloned().unwrap_or_default();
    Some(
        Authentication::new(principal, vec![])
            .with_source(AuthenticationSource::PreAuthenticatedHeaders(preauth)),
    )
}

/// Extractor handing the resolved canonical user (if any) to handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<GatewayUser>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default();
        Ok(CurrentUser(ctx.user))
    }
}

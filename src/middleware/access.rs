//! Access control stage.
//!
//! Applies the resolved target's access rules to the request path: the
//! first matching rule decides. Anonymous rules let the request through
//! untouched; role rules require the caller to hold at least one allowed
//! role, combining the canonical user's roles with the raw granted
//! authorities. Denial is a normal outcome (401/403), never an error.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use geogate_auth::RoleAuthorizationManager;

use crate::middleware::RequestContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn access_control(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let path = req.uri().path().to_string();
    let target = ctx.target();

    let Some(rule) = target.matching_rule(&path) else {
        return Ok(next.run(req).await);
    };
    if rule.anonymous {
        return Ok(next.run(req).await);
    }

    let Some(auth) = ctx.authentication.as_ref().filter(|a| a.authenticated) else {
        return Err(AppError::unauthorized(anyhow::anyhow!(
            "authentication required"
        )));
    };

    let manager =
        RoleAuthorizationManager::has_any_role(state.mapper.clone(), &rule.allowed_roles);
    if !manager.authorize_resolved(ctx.user.as_ref(), auth) {
        debug!(
            path,
            principal = %auth.principal,
            required = ?rule.allowed_roles,
            "access denied"
        );
        return Err(AppError::forbidden(anyhow::anyhow!("access denied")));
    }

    Ok(next.run(req).await)
}

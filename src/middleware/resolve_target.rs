//! Target resolution stage.
//!
//! Computes the effective access rules and header policy for the matched
//! route's destination and stores them in the [`RequestContext`]. Runs
//! strictly after route matching; a missing matched route here is a wiring
//! defect and panics.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::middleware::RequestContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn resolve_target(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let mut ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let route = ctx.route().clone();
    let target = state.config.resolve_target(&route.target);
    debug!(route = %route.id, "resolved target config");

    ctx.target = Some(target);
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

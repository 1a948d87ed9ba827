use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::logging::logging_middleware;
use crate::middleware::access::access_control;
use crate::middleware::headers::header_policy;
use crate::middleware::resolve_target::resolve_target;
use crate::middleware::resolve_user::resolve_user;
use crate::middleware::route_match::route_match;
use crate::state::AppState;
use crate::whoami::whoami;

/// Assemble the gateway router.
///
/// The proxied tree runs the full pipeline; `/whoami` only needs identity
/// resolution. Axum runs the layer added last first, so the stages are
/// listed bottom-up here: a request traverses them in ascending
/// `*_ORDER` sequence (route match, identity, target, access control,
/// header policy, proxy).
pub fn init_router(state: AppState) -> Router {
    let pipeline = Router::new()
        .fallback(crate::proxy::proxy_handler)
        .layer(middleware::from_fn_with_state(state.clone(), header_policy))
        .layer(middleware::from_fn_with_state(state.clone(), access_control))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_target))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_user))
        .layer(middleware::from_fn_with_state(state.clone(), route_match));

    Router::new()
        .route(
            "/whoami",
            get(whoami).layer(middleware::from_fn_with_state(state.clone(), resolve_user)),
        )
        .merge(pipeline)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

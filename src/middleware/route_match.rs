//! Route matching stage.
//!
//! First stage of the pipeline: picks the route whose path prefix covers the
//! request path (longest prefix wins) and seeds the [`RequestContext`].
//! Full route-table semantics (predicates, rewrites) live outside this core;
//! prefix matching is all the identity pipeline needs to be driven end to
//! end.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use geogate_config::RouteConfig;

use crate::middleware::{MatchedRoute, RequestContext};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn route_match(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    let Some(route) = find_route(&state.config.routes, path) else {
        return Err(AppError::not_found(anyhow::anyhow!(
            "no route configured for path {path}"
        )));
    };

    debug!(route = %route.id, path, "matched route");
    let matched = MatchedRoute {
        id: route.id.clone(),
        target: route.target.clone(),
    };

    let mut ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();
    ctx.route = Some(matched);
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Longest matching path prefix wins; prefixes match on segment boundaries
/// only, so `/geo` does not cover `/geoserver`.
fn find_route<'a>(routes: &'a [RouteConfig], path: &str) -> Option<&'a RouteConfig> {
    routes
        .iter()
        .filter(|r| prefix_matches(&r.path, path))
        .max_by_key(|r| r.path.len())
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    let prefix = prefix.trim_end_matches('/');
    path == prefix || path.starts_with(&format!("{prefix}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, path: &str) -> RouteConfig {
        RouteConfig {
            id: id.into(),
            path: path.into(),
            target: format!("http://{id}:8080{path}"),
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let routes = vec![route("root", "/"), route("geoserver", "/geoserver")];
        assert_eq!(find_route(&routes, "/geoserver/web").unwrap().id, "geoserver");
        assert_eq!(find_route(&routes, "/other").unwrap().id, "root");
    }

    #[test]
    fn test_prefix_matches_on_segment_boundary() {
        let routes = vec![route("geo", "/geo")];
        assert!(find_route(&routes, "/geoserver").is_none());
        assert!(find_route(&routes, "/geo/data").is_some());
        assert!(find_route(&routes, "/geo").is_some());
    }

    #[test]
    fn test_no_match() {
        let routes = vec![route("geoserver", "/geoserver")];
        assert!(find_route(&routes, "/console").is_none());
    }
}

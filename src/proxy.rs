//! Upstream forwarding.
//!
//! The proxy call is the terminal stage of the pipeline: by the time it
//! runs, the request headers are sanitized and carry the identity headers
//! the resolved target's policy enabled.

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderName, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::middleware::RequestContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Headers that are connection-scoped and must not be forwarded either way.
const HOP_BY_HOP: [&str; 6] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "transfer-encoding",
    "upgrade",
    "host",
];

/// Pooled HTTP client for upstream calls.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
}

impl ProxyClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { client })
    }

    async fn forward(
        &self,
        url: &str,
        method: axum::http::Method,
        headers: HeaderMap,
        body: axum::body::Bytes,
    ) -> Result<Response, AppError> {
        let upstream = self
            .client
            .request(method, url)
            .headers(strip_hop_by_hop(headers))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::new(StatusCode::GATEWAY_TIMEOUT, e)
                } else {
                    AppError::bad_gateway(e)
                }
            })?;

        let status = upstream.status();
        let headers = strip_hop_by_hop(upstream.headers().clone());
        let bytes = upstream.bytes().await.map_err(AppError::bad_gateway)?;

        let mut response = Response::builder()
            .status(status)
            .body(Body::from(bytes))
            .map_err(AppError::internal)?;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Terminal pipeline handler: forwards the sanitized request to the matched
/// route's destination, preserving path and query.
pub async fn proxy_handler(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();
    let route = ctx.route().clone();

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let url = format!("{}{}", route.target.trim_end_matches('/'), path_and_query);

    debug!(route = %route.id, %url, "forwarding request upstream");

    let method = req.method().clone();
    let headers = req.headers().clone();
    let body = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(AppError::bad_request)?;

    state.proxy.forward(&url, method, headers, body).await
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in HOP_BY_HOP {
        headers.remove(HeaderName::from_static(name));
    }
    headers
}

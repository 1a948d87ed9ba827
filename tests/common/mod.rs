use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::Router;
use axum::response::Json;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use geogate::middleware::remove_headers::HeaderFilter;
use geogate::proxy::ProxyClient;
use geogate::router::init_router;
use geogate::state::AppState;
use geogate_auth::customizers::{RolePrefixCustomizer, RolesMappingCustomizer, UserCustomizer};
use geogate_auth::resolvers::{
    MockUserResolver, OAuth2UserResolver, OidcUserResolver, PreauthUserResolver, UserMapper,
    UserResolver,
};
use geogate_config::GatewayConfig;
use geogate_models::{Authentication, AuthenticationSource};

/// Build the application state the way `init_app_state` does, with the
/// mock resolver registered in front the way test wiring registers it.
#[allow(dead_code)]
pub fn test_state(config: GatewayConfig) -> AppState {
    let resolvers: Vec<Box<dyn UserResolver>> = vec![
        Box::new(MockUserResolver),
        Box::new(OidcUserResolver::new(config.oidc.roles.clone())),
        Box::new(OAuth2UserResolver::new(config.oauth2.roles.clone())),
        Box::new(PreauthUserResolver),
    ];
    let customizers: Vec<Box<dyn UserCustomizer>> = vec![
        Box::new(RolesMappingCustomizer::new(config.roles_mappings.clone())),
        Box::new(RolePrefixCustomizer),
    ];

    AppState {
        header_filter: Arc::new(HeaderFilter::new(&config.security.remove_headers).unwrap()),
        config: Arc::new(config),
        mapper: Arc::new(UserMapper::new(resolvers, customizers)),
        proxy: ProxyClient::new().unwrap(),
    }
}

#[allow(dead_code)]
pub fn test_router(config: GatewayConfig) -> Router {
    init_router(test_state(config))
}

/// An authentication the mock resolver recognizes, carrying the given raw
/// authorities.
#[allow(dead_code)]
pub fn mock_auth(principal: &str, authorities: &[&str]) -> Authentication {
    Authentication::new(
        principal,
        authorities.iter().map(|s| s.to_string()).collect(),
    )
    .with_source(AuthenticationSource::Mock)
}

/// Drive one request through the router and decode the JSON body (Null for
/// empty or non-JSON bodies).
#[allow(dead_code)]
pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Spawn an upstream that echoes the request path and headers back as JSON,
/// returning its base URL.
#[allow(dead_code)]
pub async fn spawn_echo_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(echo);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn echo(req: Request) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();
    Json(json!({
        "path": req.uri().path(),
        "headers": headers,
    }))
}

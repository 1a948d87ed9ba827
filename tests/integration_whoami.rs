mod common;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use serde_json::json;

use common::{mock_auth, send, test_router};
use geogate_config::GatewayConfig;

fn config() -> GatewayConfig {
    GatewayConfig::from_yaml(
        r#"
roles_mappings:
  ROLE_ORGADMIN: [ROLE_GN_REVIEWER]
"#,
    )
    .unwrap()
}

#[tokio::test]
async fn whoami_without_authentication_yields_null_user() {
    let router = test_router(config());
    let req = Request::builder()
        .uri("/whoami")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "GatewayUser": null }));
}

#[tokio::test]
async fn whoami_mock_authority_prefixed_but_not_normalized() {
    let router = test_router(config());
    let req = Request::builder()
        .uri("/whoami")
        .extension(mock_auth("gabe", &["GP.TEST.SAMPLE"]))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["GatewayUser"]["username"], "gabe");
    assert_eq!(
        body["GatewayUser"]["roles"],
        json!(["ROLE_GP.TEST.SAMPLE"])
    );
}

#[tokio::test]
async fn whoami_preauth_headers_resolve_identity() {
    let router = test_router(config());
    let req = Request::builder()
        .uri("/whoami")
        .header("sec-georchestra-preauthenticated", "true")
        .header("preauth-username", "pmartin")
        .header("preauth-email", "pmartin@example.com")
        .header("preauth-org", "C2C")
        .header("preauth-roles", "ROLE_MAPSTORE_ADMIN;ROLE_EDITOR")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    let user = &body["GatewayUser"];
    assert_eq!(user["username"], "pmartin");
    assert_eq!(user["email"], "pmartin@example.com");
    assert_eq!(user["organization"], "C2C");
    assert_eq!(
        user["roles"],
        json!(["ROLE_USER", "ROLE_MAPSTORE_ADMIN", "ROLE_EDITOR"])
    );
}

#[tokio::test]
async fn whoami_preauth_without_trust_marker_is_anonymous() {
    let router = test_router(config());
    let req = Request::builder()
        .uri("/whoami")
        .header("preauth-username", "pmartin")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "GatewayUser": null }));
}

#[tokio::test]
async fn whoami_roles_mappings_enrich_resolved_user() {
    let router = test_router(config());
    let req = Request::builder()
        .uri("/whoami")
        .header("sec-georchestra-preauthenticated", "true")
        .header("preauth-username", "orgadmin")
        .header("preauth-roles", "ROLE_ORGADMIN")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["GatewayUser"]["roles"],
        json!(["ROLE_USER", "ROLE_ORGADMIN", "ROLE_GN_REVIEWER"])
    );
}

#[tokio::test]
async fn whoami_oidc_claim_roles_appended_after_standard_authorities() {
    let yaml = r#"
oidc:
  roles:
    split: ","
    claim_paths: ["$.permission"]
"#;
    let router = test_router(GatewayConfig::from_yaml(yaml).unwrap());

    let claims = json!({
        "sub": "abc",
        "preferred_username": "user",
        "permission": "GP.OIDC.ROLE 1, GP.OIDC.ROLE 2"
    });
    let auth = geogate_models::Authentication::new("user", vec!["AUTHORITY_1".into()])
        .with_source(geogate_models::AuthenticationSource::Oidc {
            provider: "keycloak".into(),
            claims: claims.as_object().unwrap().clone(),
        });

    let req = Request::builder()
        .uri("/whoami")
        .extension(auth)
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["GatewayUser"]["roles"],
        json!(["ROLE_AUTHORITY_1", "ROLE_GP_OIDC_ROLE_1", "ROLE_GP_OIDC_ROLE_2"])
    );
}

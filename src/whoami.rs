//! Identity diagnostics endpoint.

use axum::Json;
use serde_json::{Value, json};

use crate::middleware::resolve_user::CurrentUser;

/// Returns the canonical user resolved for the calling request, or `null`
/// when no resolver recognized the authentication.
pub async fn whoami(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "GatewayUser": user }))
}

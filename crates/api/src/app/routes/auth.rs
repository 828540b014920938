use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/permissions", get(permissions))
        .route("/api/auth/users", get(list_users))
}

/// Credential check without Basic auth; the body carries the pair.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> Response {
    match services.access.verify_credentials(&body.username, &body.password).await {
        Ok(Some(principal)) => {
            tracing::info!(user_id = %principal.id, tenant_id = %principal.tenant_id, "login succeeded");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "message": "Login successful",
                    "user": dto::principal_to_json(&principal),
                })),
            )
                .into_response()
        }
        Ok(None) => {
            tracing::warn!("login rejected");
            errors::unauthorized()
        }
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn me(Extension(principal): Extension<PrincipalContext>) -> Response {
    (StatusCode::OK, Json(dto::principal_to_json(principal.principal()))).into_response()
}

pub async fn permissions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.access.aggregated_permissions(principal.principal()).await {
        Ok(perms) => (StatusCode::OK, Json(dto::permissions_to_json(&perms))).into_response(),
        Err(e) => errors::access_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
) -> Response {
    let mut users = match services.stores.identities.list_users(tenant.tenant_id()).await {
        Ok(u) => u,
        Err(e) => return errors::store_error_to_response(e),
    };
    users.sort_by_key(|u| u.id);
    let items = users.iter().map(dto::principal_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
}

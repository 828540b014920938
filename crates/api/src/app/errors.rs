use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use technia_auth::AuthzError;
use technia_core::DomainError;
use technia_infra::{AccessError, StoreError};

pub fn json_error(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "error": code,
            "detail": detail.into(),
        })),
    )
        .into_response()
}

/// `{"success": true, "message": ...}`
pub fn success(message: &str) -> Response {
    (
        StatusCode::OK,
        axum::Json(json!({ "success": true, "message": message })),
    )
        .into_response()
}

pub fn unauthorized() -> Response {
    let mut response = json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        AuthzError::Unauthenticated.to_string(),
    );
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
    response
}

/// Unwrap a body extracted as `Result`, so the permission check runs before
/// a malformed body is reported.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value)
        .map_err(|rejection| json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text()))
}

pub fn not_found(detail: &str) -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", detail)
}

pub fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An unexpected error occurred",
    )
}

pub fn authz_error_to_response(err: AuthzError) -> Response {
    match err {
        AuthzError::Unauthenticated => unauthorized(),
        AuthzError::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
        AuthzError::InvalidAction(_) => json_error(StatusCode::BAD_REQUEST, "invalid_action", err.to_string()),
    }
}

pub fn store_error_to_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound => not_found("not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "conflict", msg),
        StoreError::Database(_) | StoreError::Unavailable(_) => {
            tracing::error!(error = %err, "storage failure");
            internal_error()
        }
    }
}

pub fn access_error_to_response(err: AccessError) -> Response {
    match err {
        AccessError::Authz(e) => authz_error_to_response(e),
        AccessError::Store(e) => store_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", err.detail())
}

use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "healthy" })))
}

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "technia-api",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

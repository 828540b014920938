//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage backend selection and the access-control service
//! - `routes/`: HTTP routes + handlers (one file per record area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::http::{Method, header};
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: Arc<AppServices>, config: &ApiConfig) -> Router {
    let auth_state = middleware::AuthState {
        access: services.access.clone(),
    };

    // Protected routes: Basic auth resolves the principal and tenant.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.cors_allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

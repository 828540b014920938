use axum::{
    routing::{get, post},
    Router,
};

pub mod actions;
pub mod auth;
pub mod employees;
pub mod leads;
pub mod lookups;
pub mod salaries;
pub mod system;

/// Endpoints reachable without credentials.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/health", get(system::health))
}

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(auth::router())
        .nest(
            "/api/real-estate",
            Router::new()
                .merge(lookups::router())
                .merge(leads::router())
                .merge(actions::router()),
        )
        .nest(
            "/api/hr",
            Router::new()
                .merge(employees::router())
                .merge(salaries::router()),
        )
}

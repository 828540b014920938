//! API-side authorization guard.
//!
//! Handlers call [`require`] first, before any store access, so a caller
//! without the grant always sees 403 whether or not the target exists.

use axum::response::Response;

use technia_auth::{Action, FeatureKey};

use crate::app::{errors, services::AppServices};
use crate::context::PrincipalContext;

pub async fn require(
    services: &AppServices,
    principal: &PrincipalContext,
    key: FeatureKey,
    action: Action,
) -> Result<(), Response> {
    services
        .access
        .require_permission(principal.principal(), key, action)
        .await
        .map_err(errors::access_error_to_response)
}

//! Calls and meetings logged against a lead.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use technia_auth::{Action, FeatureKey};
use technia_infra::StoreError;
use technia_realestate::{LeadId, LookupKind, StatusNames};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/leads/:id/calls", get(list_calls).post(create_call))
        .route("/leads/:id/meetings", get(list_meetings).post(create_meeting))
}

pub async fn create_call(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(lead_id): Path<i64>,
    body: Result<Json<dto::CreateCallRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::ACTIONS, Action::Write).await {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services
        .stores
        .real_estate
        .insert_call(tenant.tenant_id(), LeadId::new(lead_id), principal.user_id(), body.into())
        .await
    {
        Ok(call) => (StatusCode::CREATED, Json(dto::call_to_json(&call, None))).into_response(),
        Err(StoreError::NotFound) => errors::not_found("Lead not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_calls(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(lead_id): Path<i64>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::ACTIONS, Action::Read).await {
        return resp;
    }

    let names = match status_names(&services, &tenant, LookupKind::CallStatus).await {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    match services.stores.real_estate.list_calls(tenant.tenant_id(), LeadId::new(lead_id)).await {
        Ok(calls) => {
            let items = calls
                .iter()
                .map(|c| dto::call_to_json(c, Some(names.name_of(c.status))))
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(StoreError::NotFound) => errors::not_found("Lead not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_meeting(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(lead_id): Path<i64>,
    body: Result<Json<dto::CreateMeetingRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::ACTIONS, Action::Write).await {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services
        .stores
        .real_estate
        .insert_meeting(tenant.tenant_id(), LeadId::new(lead_id), principal.user_id(), body.into())
        .await
    {
        Ok(meeting) => (StatusCode::CREATED, Json(dto::meeting_to_json(&meeting, None))).into_response(),
        Err(StoreError::NotFound) => errors::not_found("Lead not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_meetings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(lead_id): Path<i64>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::ACTIONS, Action::Read).await {
        return resp;
    }

    let names = match status_names(&services, &tenant, LookupKind::MeetingStatus).await {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    match services
        .stores
        .real_estate
        .list_meetings(tenant.tenant_id(), LeadId::new(lead_id))
        .await
    {
        Ok(meetings) => {
            let items = meetings
                .iter()
                .map(|m| dto::meeting_to_json(m, Some(names.name_of(m.status))))
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(StoreError::NotFound) => errors::not_found("Lead not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn status_names(
    services: &AppServices,
    tenant: &TenantContext,
    kind: LookupKind,
) -> Result<StatusNames, Response> {
    services
        .stores
        .real_estate
        .list_lookup(tenant.tenant_id(), kind)
        .await
        .map(|entries| entries.into_iter().collect())
        .map_err(errors::store_error_to_response)
}

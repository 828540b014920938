use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use technia_auth::{Action, FeatureKey};
use technia_realestate::LookupKind;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/lookup/stages", get(stages))
        .route("/lookup/statuses", get(statuses))
        .route("/lookup/types", get(types))
        .route("/lookup/call-statuses", get(call_statuses))
        .route("/lookup/meeting-statuses", get(meeting_statuses))
}

pub async fn stages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    list_lookup(&services, &tenant, &principal, LookupKind::LeadStage).await
}

pub async fn statuses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    list_lookup(&services, &tenant, &principal, LookupKind::LeadStatus).await
}

pub async fn types(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    list_lookup(&services, &tenant, &principal, LookupKind::LeadType).await
}

pub async fn call_statuses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    list_lookup(&services, &tenant, &principal, LookupKind::CallStatus).await
}

pub async fn meeting_statuses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    list_lookup(&services, &tenant, &principal, LookupKind::MeetingStatus).await
}

async fn list_lookup(
    services: &AppServices,
    tenant: &TenantContext,
    principal: &PrincipalContext,
    kind: LookupKind,
) -> Response {
    // Call/meeting statuses belong to the actions feature, the rest to leads.
    let key = if kind.describes_actions() {
        FeatureKey::ACTIONS
    } else {
        FeatureKey::LEADS
    };
    if let Err(resp) = crate::authz::require(services, principal, key, Action::Read).await {
        return resp;
    }

    match services.stores.real_estate.list_lookup(tenant.tenant_id(), kind).await {
        Ok(entries) => {
            let items = entries.iter().map(dto::lookup_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

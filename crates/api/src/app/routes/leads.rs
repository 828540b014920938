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
use technia_realestate::LeadId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

const LEAD_NOT_FOUND: &str = "Lead not found";

pub fn router() -> Router {
    Router::new()
        .route("/leads", get(list_leads).post(create_lead))
        .route("/leads/:id", get(get_lead).put(update_lead).delete(delete_lead))
}

pub async fn create_lead(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateLeadRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::LEADS, Action::Write).await {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let new_lead = match body.into_new_lead() {
        Ok(l) => l,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stores.real_estate.insert_lead(tenant.tenant_id(), new_lead).await {
        Ok(lead) => {
            tracing::info!(lead_id = %lead.id, tenant_id = %lead.tenant_id, "lead created");
            (StatusCode::CREATED, Json(dto::lead_to_json(&lead))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_leads(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::LEADS, Action::Read).await {
        return resp;
    }

    match services.stores.real_estate.list_leads(tenant.tenant_id()).await {
        Ok(leads) => {
            let items = leads.iter().map(dto::lead_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_lead(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::LEADS, Action::Read).await {
        return resp;
    }

    match services.stores.real_estate.get_lead(tenant.tenant_id(), LeadId::new(id)).await {
        Ok(Some(lead)) => (StatusCode::OK, Json(dto::lead_to_json(&lead))).into_response(),
        Ok(None) => errors::not_found(LEAD_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_lead(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
    body: Result<Json<dto::UpdateLeadRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::LEADS, Action::Edit).await {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let changes = match body.into_changes() {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .stores
        .real_estate
        .update_lead(tenant.tenant_id(), LeadId::new(id), changes)
        .await
    {
        Ok(lead) => (StatusCode::OK, Json(dto::lead_to_json(&lead))).into_response(),
        Err(StoreError::NotFound) => errors::not_found(LEAD_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_lead(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i64>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::LEADS, Action::Delete).await {
        return resp;
    }

    match services.stores.real_estate.delete_lead(tenant.tenant_id(), LeadId::new(id)).await {
        Ok(()) => {
            tracing::info!(lead_id = id, tenant_id = %tenant.tenant_id(), "lead deleted");
            errors::success("Lead deleted successfully")
        }
        Err(StoreError::NotFound) => errors::not_found(LEAD_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use technia_auth::{Action, FeatureKey};
use technia_hr::EmployeeId;
use technia_infra::StoreError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

pub fn router() -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateEmployeeRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::EMPLOYEES, Action::Write).await {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let new_employee = match body.into_new_employee() {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.stores.hr.insert_employee(tenant.tenant_id(), new_employee).await {
        Ok(employee) => {
            tracing::info!(employee_id = %employee.id, tenant_id = %employee.tenant_id, "employee created");
            (StatusCode::CREATED, Json(dto::employee_to_json(&employee))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::EMPLOYEES, Action::Read).await {
        return resp;
    }

    match services.stores.hr.list_employees(tenant.tenant_id()).await {
        Ok(employees) => {
            let items = employees.iter().map(dto::employee_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i32>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::EMPLOYEES, Action::Read).await {
        return resp;
    }

    match services.stores.hr.get_employee(tenant.tenant_id(), EmployeeId::new(id)).await {
        Ok(Some(employee)) => (StatusCode::OK, Json(dto::employee_to_json(&employee))).into_response(),
        Ok(None) => errors::not_found(EMPLOYEE_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i32>,
    body: Result<Json<dto::UpdateEmployeeRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::EMPLOYEES, Action::Edit).await {
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
        .hr
        .update_employee(tenant.tenant_id(), EmployeeId::new(id), changes)
        .await
    {
        Ok(employee) => (StatusCode::OK, Json(dto::employee_to_json(&employee))).into_response(),
        Err(StoreError::NotFound) => errors::not_found(EMPLOYEE_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Removes the employee together with every salary row they own.
pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<i32>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::EMPLOYEES, Action::Delete).await {
        return resp;
    }

    match services.stores.hr.delete_employee(tenant.tenant_id(), EmployeeId::new(id)).await {
        Ok(()) => {
            tracing::info!(employee_id = id, tenant_id = %tenant.tenant_id(), "employee deleted");
            errors::success("Employee and all salary records deleted successfully")
        }
        Err(StoreError::NotFound) => errors::not_found(EMPLOYEE_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

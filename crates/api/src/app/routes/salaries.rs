use std::sync::Arc;

use axum::{
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};

use technia_auth::{Action, FeatureKey};
use technia_hr::{EmployeeId, SalaryPeriod, sort_for_listing};
use technia_infra::StoreError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

const SALARY_NOT_FOUND: &str = "Salary record not found";

pub fn router() -> Router {
    Router::new()
        .route("/salaries", get(list_all_salaries))
        .route(
            "/employees/:id/salaries",
            get(list_employee_salaries).post(create_salary),
        )
        .route(
            "/employees/:id/salaries/:year/:month",
            put(update_salary).delete(delete_salary),
        )
}

pub async fn create_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(employee_id): Path<i32>,
    body: Result<Json<dto::CreateSalaryRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::SALARIES, Action::Write).await {
        return resp;
    }
    let body = match errors::json_body(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let new_salary = match body.into_new_salary() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .stores
        .hr
        .insert_salary(tenant.tenant_id(), EmployeeId::new(employee_id), new_salary)
        .await
    {
        Ok(salary) => {
            tracing::info!(employee_id, period = %salary.period, "salary recorded");
            (StatusCode::CREATED, Json(dto::salary_to_json(&salary))).into_response()
        }
        Err(StoreError::NotFound) => errors::not_found("Employee not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// One employee's salaries, newest period first.
pub async fn list_employee_salaries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(employee_id): Path<i32>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::SALARIES, Action::Read).await {
        return resp;
    }

    match services
        .stores
        .hr
        .list_employee_salaries(tenant.tenant_id(), EmployeeId::new(employee_id))
        .await
    {
        Ok(mut salaries) => {
            sort_for_listing(&mut salaries);
            let items = salaries.iter().map(dto::salary_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(StoreError::NotFound) => errors::not_found("Employee not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path((employee_id, year, month)): Path<(i32, i32, i32)>,
    body: Result<Json<dto::UpdateSalaryRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::SALARIES, Action::Edit).await {
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
        .update_salary(
            tenant.tenant_id(),
            EmployeeId::new(employee_id),
            SalaryPeriod::new(year, month),
            changes,
        )
        .await
    {
        Ok(salary) => (StatusCode::OK, Json(dto::salary_to_json(&salary))).into_response(),
        Err(StoreError::NotFound) => errors::not_found(SALARY_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_salary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path((employee_id, year, month)): Path<(i32, i32, i32)>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::SALARIES, Action::Delete).await {
        return resp;
    }

    let period = SalaryPeriod::new(year, month);
    match services
        .stores
        .hr
        .delete_salary(tenant.tenant_id(), EmployeeId::new(employee_id), period)
        .await
    {
        Ok(()) => {
            tracing::info!(employee_id, %period, "salary deleted");
            errors::success("Salary record deleted successfully")
        }
        Err(StoreError::NotFound) => errors::not_found(SALARY_NOT_FOUND),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Every salary in the tenant: year desc, month desc, employee asc.
pub async fn list_all_salaries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = crate::authz::require(&services, &principal, FeatureKey::SALARIES, Action::Read).await {
        return resp;
    }

    match services.stores.hr.list_salaries(tenant.tenant_id()).await {
        Ok(mut salaries) => {
            sort_for_listing(&mut salaries);
            let items = salaries.iter().map(dto::salary_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

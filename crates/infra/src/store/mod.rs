//! Tenant-scoped record storage.
//!
//! Every operation takes the caller's tenant and never reads or writes rows
//! outside it. Two backends share these traits: [`InMemoryStore`] for tests
//! and development, [`PostgresStore`] for deployments.

use std::sync::Arc;

use thiserror::Error;

use technia_auth::{Principal, RolePermission, UserAccount};
use technia_core::{TenantId, UserId};
use technia_hr::{Employee, EmployeeChanges, EmployeeId, NewEmployee, NewSalary, Salary, SalaryChanges, SalaryPeriod};
use technia_realestate::{
    Call, Lead, LeadChanges, LeadId, LookupEntry, LookupKind, Meeting, NewCall, NewLead, NewMeeting,
};

pub mod fixtures;
pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with that key exists in the caller's tenant.
    #[error("record not found")]
    NotFound,

    /// A uniqueness rule would be violated.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend cannot serve requests (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Users, roles and role assignments. Read-only: provisioning happens elsewhere.
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Look a user up by username across all tenants (usernames are global).
    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>>;

    async fn list_users(&self, tenant_id: &TenantId) -> StoreResult<Vec<Principal>>;

    /// Every permission row reachable through `user_id`'s role assignments,
    /// restricted to roles owned by `tenant_id`.
    async fn role_permissions(&self, tenant_id: &TenantId, user_id: UserId) -> StoreResult<Vec<RolePermission>>;
}

#[async_trait::async_trait]
pub trait RealEstateStore: Send + Sync {
    async fn list_lookup(&self, tenant_id: &TenantId, kind: LookupKind) -> StoreResult<Vec<LookupEntry>>;

    /// `Conflict` when the phone number is already used in this tenant.
    async fn insert_lead(&self, tenant_id: &TenantId, lead: NewLead) -> StoreResult<Lead>;
    async fn list_leads(&self, tenant_id: &TenantId) -> StoreResult<Vec<Lead>>;
    async fn get_lead(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<Option<Lead>>;
    async fn update_lead(&self, tenant_id: &TenantId, id: LeadId, changes: LeadChanges) -> StoreResult<Lead>;
    /// Removes the lead together with its calls and meetings.
    async fn delete_lead(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<()>;

    async fn insert_call(&self, tenant_id: &TenantId, lead_id: LeadId, assigned_to: UserId, call: NewCall) -> StoreResult<Call>;
    /// `NotFound` when the lead is not in the tenant.
    async fn list_calls(&self, tenant_id: &TenantId, lead_id: LeadId) -> StoreResult<Vec<Call>>;
    async fn insert_meeting(
        &self,
        tenant_id: &TenantId,
        lead_id: LeadId,
        assigned_to: UserId,
        meeting: NewMeeting,
    ) -> StoreResult<Meeting>;
    /// `NotFound` when the lead is not in the tenant.
    async fn list_meetings(&self, tenant_id: &TenantId, lead_id: LeadId) -> StoreResult<Vec<Meeting>>;
}

#[async_trait::async_trait]
pub trait HrStore: Send + Sync {
    async fn insert_employee(&self, tenant_id: &TenantId, employee: NewEmployee) -> StoreResult<Employee>;
    async fn list_employees(&self, tenant_id: &TenantId) -> StoreResult<Vec<Employee>>;
    async fn get_employee(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<Option<Employee>>;
    async fn update_employee(&self, tenant_id: &TenantId, id: EmployeeId, changes: EmployeeChanges) -> StoreResult<Employee>;
    /// Removes the employee together with all of their salary records.
    async fn delete_employee(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<()>;

    /// `Conflict` when a record for the same period already exists.
    async fn insert_salary(&self, tenant_id: &TenantId, employee_id: EmployeeId, salary: NewSalary) -> StoreResult<Salary>;
    /// Newest period first. `NotFound` when the employee is not in the tenant.
    async fn list_employee_salaries(&self, tenant_id: &TenantId, employee_id: EmployeeId) -> StoreResult<Vec<Salary>>;
    async fn update_salary(
        &self,
        tenant_id: &TenantId,
        employee_id: EmployeeId,
        period: SalaryPeriod,
        changes: SalaryChanges,
    ) -> StoreResult<Salary>;
    async fn delete_salary(&self, tenant_id: &TenantId, employee_id: EmployeeId, period: SalaryPeriod) -> StoreResult<()>;
    /// All salaries of the tenant: year desc, month desc, employee asc.
    async fn list_salaries(&self, tenant_id: &TenantId) -> StoreResult<Vec<Salary>>;
}

/// The three storage concerns behind shared handles.
#[derive(Clone)]
pub struct Stores {
    pub identities: Arc<dyn IdentityStore>,
    pub real_estate: Arc<dyn RealEstateStore>,
    pub hr: Arc<dyn HrStore>,
}

impl Stores {
    /// Serve every concern from one backend.
    pub fn from_backend<S>(backend: Arc<S>) -> Self
    where
        S: IdentityStore + RealEstateStore + HrStore + 'static,
    {
        Self {
            identities: backend.clone(),
            real_estate: backend.clone(),
            hr: backend,
        }
    }
}

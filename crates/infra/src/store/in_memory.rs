//! In-memory backend for tests and local development.
//!
//! One `RwLock` guards all tables; no lock is held across an `.await`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use technia_auth::{FeatureKey, Grants, Principal, Role, RoleId, RolePermission, UserAccount};
use technia_core::{TenantId, UserId};
use technia_hr::{
    Employee, EmployeeChanges, EmployeeId, NewEmployee, NewSalary, Salary, SalaryChanges, SalaryPeriod,
    sort_for_listing,
};
use technia_realestate::{
    Call, CallId, Lead, LeadChanges, LeadId, LookupEntry, LookupKind, Meeting, MeetingId, NewCall, NewLead,
    NewMeeting,
};

use super::{HrStore, IdentityStore, RealEstateStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, UserAccount>,
    roles: BTreeMap<RoleId, Role>,
    role_permissions: BTreeMap<(RoleId, FeatureKey), RolePermission>,
    assignments: BTreeSet<(UserId, RoleId)>,
    lookups: HashMap<(TenantId, LookupKind), BTreeMap<i32, String>>,

    leads: BTreeMap<(TenantId, LeadId), Lead>,
    calls: BTreeMap<CallId, Call>,
    meetings: BTreeMap<MeetingId, Meeting>,
    next_lead: i64,
    next_call: i32,
    next_meeting: i32,

    employees: BTreeMap<(TenantId, EmployeeId), Employee>,
    salaries: BTreeMap<(TenantId, EmployeeId, SalaryPeriod), Salary>,
    next_employee: i32,
}

/// All stores backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    // -------------------------
    // Provisioning (outside the request path)
    // -------------------------

    /// Add a user. Usernames are unique across all tenants.
    pub fn add_user(&self, account: UserAccount) -> StoreResult<()> {
        let mut t = self.write()?;
        let taken = t
            .users
            .values()
            .any(|u| u.principal.id == account.principal.id || u.principal.username == account.principal.username);
        if taken {
            return Err(StoreError::Conflict(format!(
                "user '{}' already exists",
                account.principal.username
            )));
        }
        t.users.insert(account.principal.id, account);
        Ok(())
    }

    pub fn add_role(&self, role: Role) -> StoreResult<()> {
        let mut t = self.write()?;
        if t.roles.contains_key(&role.id) {
            return Err(StoreError::Conflict(format!("role {} already exists", role.id)));
        }
        t.roles.insert(role.id, role);
        Ok(())
    }

    /// Set the grants of `role_id` on `key`, replacing any previous row.
    pub fn grant(&self, role_id: RoleId, key: FeatureKey, grants: Grants) -> StoreResult<()> {
        let mut t = self.write()?;
        let tenant_id = t.roles.get(&role_id).ok_or(StoreError::NotFound)?.tenant_id.clone();
        t.role_permissions.insert(
            (role_id, key),
            RolePermission {
                role_id,
                tenant_id,
                key,
                grants,
            },
        );
        Ok(())
    }

    pub fn assign_role(&self, user_id: UserId, role_id: RoleId) -> StoreResult<()> {
        let mut t = self.write()?;
        if !t.users.contains_key(&user_id) || !t.roles.contains_key(&role_id) {
            return Err(StoreError::NotFound);
        }
        t.assignments.insert((user_id, role_id));
        Ok(())
    }

    pub fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> StoreResult<()> {
        let mut t = self.write()?;
        t.assignments.remove(&(user_id, role_id));
        Ok(())
    }

    pub fn add_lookup(&self, kind: LookupKind, entry: LookupEntry) -> StoreResult<()> {
        let mut t = self.write()?;
        t.lookups
            .entry((entry.tenant_id, kind))
            .or_default()
            .insert(entry.id, entry.name);
        Ok(())
    }
}

#[async_trait::async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        let t = self.read()?;
        Ok(t.users
            .values()
            .find(|u| u.principal.username == username)
            .cloned())
    }

    async fn list_users(&self, tenant_id: &TenantId) -> StoreResult<Vec<Principal>> {
        let t = self.read()?;
        Ok(t.users
            .values()
            .filter(|u| &u.principal.tenant_id == tenant_id)
            .map(|u| u.principal.clone())
            .collect())
    }

    async fn role_permissions(&self, tenant_id: &TenantId, user_id: UserId) -> StoreResult<Vec<RolePermission>> {
        let t = self.read()?;
        let held: Vec<RoleId> = t
            .assignments
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, r)| *r)
            .filter(|r| t.roles.get(r).is_some_and(|role| &role.tenant_id == tenant_id))
            .collect();

        Ok(t.role_permissions
            .values()
            .filter(|p| held.contains(&p.role_id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl RealEstateStore for InMemoryStore {
    async fn list_lookup(&self, tenant_id: &TenantId, kind: LookupKind) -> StoreResult<Vec<LookupEntry>> {
        let t = self.read()?;
        Ok(t.lookups
            .get(&(tenant_id.clone(), kind))
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, name)| LookupEntry {
                        id: *id,
                        tenant_id: tenant_id.clone(),
                        name: name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_lead(&self, tenant_id: &TenantId, lead: NewLead) -> StoreResult<Lead> {
        let mut t = self.write()?;
        let duplicate = t
            .leads
            .values()
            .any(|l| &l.tenant_id == tenant_id && l.phone == lead.phone);
        if duplicate {
            return Err(StoreError::Conflict(
                "A lead with this phone number already exists".to_string(),
            ));
        }

        t.next_lead += 1;
        let id = LeadId::new(t.next_lead);
        let lead = lead.into_lead(id, tenant_id.clone(), Utc::now());
        t.leads.insert((tenant_id.clone(), id), lead.clone());
        Ok(lead)
    }

    async fn list_leads(&self, tenant_id: &TenantId) -> StoreResult<Vec<Lead>> {
        let t = self.read()?;
        Ok(t.leads
            .values()
            .filter(|l| &l.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get_lead(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<Option<Lead>> {
        let t = self.read()?;
        Ok(t.leads.get(&(tenant_id.clone(), id)).cloned())
    }

    async fn update_lead(&self, tenant_id: &TenantId, id: LeadId, changes: LeadChanges) -> StoreResult<Lead> {
        let mut t = self.write()?;
        let lead = t
            .leads
            .get_mut(&(tenant_id.clone(), id))
            .ok_or(StoreError::NotFound)?;
        lead.apply(changes);
        Ok(lead.clone())
    }

    async fn delete_lead(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<()> {
        let mut t = self.write()?;
        t.leads
            .remove(&(tenant_id.clone(), id))
            .ok_or(StoreError::NotFound)?;
        t.calls.retain(|_, c| !(&c.tenant_id == tenant_id && c.lead_id == id));
        t.meetings.retain(|_, m| !(&m.tenant_id == tenant_id && m.lead_id == id));
        Ok(())
    }

    async fn insert_call(&self, tenant_id: &TenantId, lead_id: LeadId, assigned_to: UserId, call: NewCall) -> StoreResult<Call> {
        let mut t = self.write()?;
        if !t.leads.contains_key(&(tenant_id.clone(), lead_id)) {
            return Err(StoreError::NotFound);
        }
        t.next_call += 1;
        let call = call.into_call(CallId(t.next_call), tenant_id.clone(), lead_id, assigned_to, Utc::now());
        t.calls.insert(call.id, call.clone());
        Ok(call)
    }

    async fn list_calls(&self, tenant_id: &TenantId, lead_id: LeadId) -> StoreResult<Vec<Call>> {
        let t = self.read()?;
        if !t.leads.contains_key(&(tenant_id.clone(), lead_id)) {
            return Err(StoreError::NotFound);
        }
        Ok(t.calls
            .values()
            .filter(|c| &c.tenant_id == tenant_id && c.lead_id == lead_id)
            .cloned()
            .collect())
    }

    async fn insert_meeting(
        &self,
        tenant_id: &TenantId,
        lead_id: LeadId,
        assigned_to: UserId,
        meeting: NewMeeting,
    ) -> StoreResult<Meeting> {
        let mut t = self.write()?;
        if !t.leads.contains_key(&(tenant_id.clone(), lead_id)) {
            return Err(StoreError::NotFound);
        }
        t.next_meeting += 1;
        let meeting = meeting.into_meeting(
            MeetingId(t.next_meeting),
            tenant_id.clone(),
            lead_id,
            assigned_to,
            Utc::now(),
        );
        t.meetings.insert(meeting.id, meeting.clone());
        Ok(meeting)
    }

    async fn list_meetings(&self, tenant_id: &TenantId, lead_id: LeadId) -> StoreResult<Vec<Meeting>> {
        let t = self.read()?;
        if !t.leads.contains_key(&(tenant_id.clone(), lead_id)) {
            return Err(StoreError::NotFound);
        }
        Ok(t.meetings
            .values()
            .filter(|m| &m.tenant_id == tenant_id && m.lead_id == lead_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl HrStore for InMemoryStore {
    async fn insert_employee(&self, tenant_id: &TenantId, employee: NewEmployee) -> StoreResult<Employee> {
        let mut t = self.write()?;
        t.next_employee += 1;
        let id = EmployeeId::new(t.next_employee);
        let employee = employee.into_employee(tenant_id.clone(), id, Utc::now());
        t.employees.insert((tenant_id.clone(), id), employee.clone());
        Ok(employee)
    }

    async fn list_employees(&self, tenant_id: &TenantId) -> StoreResult<Vec<Employee>> {
        let t = self.read()?;
        Ok(t.employees
            .values()
            .filter(|e| &e.tenant_id == tenant_id)
            .cloned()
            .collect())
    }

    async fn get_employee(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<Option<Employee>> {
        let t = self.read()?;
        Ok(t.employees.get(&(tenant_id.clone(), id)).cloned())
    }

    async fn update_employee(&self, tenant_id: &TenantId, id: EmployeeId, changes: EmployeeChanges) -> StoreResult<Employee> {
        let mut t = self.write()?;
        let employee = t
            .employees
            .get_mut(&(tenant_id.clone(), id))
            .ok_or(StoreError::NotFound)?;
        employee.apply(changes);
        Ok(employee.clone())
    }

    async fn delete_employee(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<()> {
        let mut t = self.write()?;
        t.employees
            .remove(&(tenant_id.clone(), id))
            .ok_or(StoreError::NotFound)?;
        t.salaries
            .retain(|(tenant, employee, _), _| !(tenant == tenant_id && *employee == id));
        Ok(())
    }

    async fn insert_salary(&self, tenant_id: &TenantId, employee_id: EmployeeId, salary: NewSalary) -> StoreResult<Salary> {
        let mut t = self.write()?;
        if !t.employees.contains_key(&(tenant_id.clone(), employee_id)) {
            return Err(StoreError::NotFound);
        }
        let key = (tenant_id.clone(), employee_id, salary.period);
        if t.salaries.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "Salary record already exists for {}",
                salary.period
            )));
        }
        let salary = salary.into_salary(tenant_id.clone(), employee_id, Utc::now());
        t.salaries.insert(key, salary.clone());
        Ok(salary)
    }

    async fn list_employee_salaries(&self, tenant_id: &TenantId, employee_id: EmployeeId) -> StoreResult<Vec<Salary>> {
        let t = self.read()?;
        if !t.employees.contains_key(&(tenant_id.clone(), employee_id)) {
            return Err(StoreError::NotFound);
        }
        let mut rows: Vec<Salary> = t
            .salaries
            .values()
            .filter(|s| &s.tenant_id == tenant_id && s.employee_id == employee_id)
            .cloned()
            .collect();
        sort_for_listing(&mut rows);
        Ok(rows)
    }

    async fn update_salary(
        &self,
        tenant_id: &TenantId,
        employee_id: EmployeeId,
        period: SalaryPeriod,
        changes: SalaryChanges,
    ) -> StoreResult<Salary> {
        let mut t = self.write()?;
        let salary = t
            .salaries
            .get_mut(&(tenant_id.clone(), employee_id, period))
            .ok_or(StoreError::NotFound)?;
        salary.apply(changes);
        Ok(salary.clone())
    }

    async fn delete_salary(&self, tenant_id: &TenantId, employee_id: EmployeeId, period: SalaryPeriod) -> StoreResult<()> {
        let mut t = self.write()?;
        t.salaries
            .remove(&(tenant_id.clone(), employee_id, period))
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list_salaries(&self, tenant_id: &TenantId) -> StoreResult<Vec<Salary>> {
        let t = self.read()?;
        let mut rows: Vec<Salary> = t
            .salaries
            .values()
            .filter(|s| &s.tenant_id == tenant_id)
            .cloned()
            .collect();
        sort_for_listing(&mut rows);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use technia_hr::SalaryAmounts;

    use super::*;

    fn tenant(name: &str) -> TenantId {
        TenantId::new(name)
    }

    fn new_salary(year: i32, month: i32) -> NewSalary {
        NewSalary {
            period: SalaryPeriod::new(year, month),
            amounts: SalaryAmounts::default(),
            due_date: None,
        }
    }

    #[tokio::test]
    async fn lead_phone_is_unique_per_tenant_only() {
        let store = InMemoryStore::new();
        let lead = || NewLead {
            phone: "0100".into(),
            ..Default::default()
        };

        store.insert_lead(&tenant("a.io"), lead()).await.unwrap();
        assert!(matches!(
            store.insert_lead(&tenant("a.io"), lead()).await,
            Err(StoreError::Conflict(_))
        ));
        store.insert_lead(&tenant("b.io"), lead()).await.unwrap();
    }

    #[tokio::test]
    async fn records_are_invisible_from_another_tenant() {
        let store = InMemoryStore::new();
        let lead = store
            .insert_lead(
                &tenant("a.io"),
                NewLead {
                    phone: "0100".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store.get_lead(&tenant("b.io"), lead.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_lead(&tenant("b.io"), lead.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(store.list_leads(&tenant("b.io")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_lead_removes_its_actions() {
        let store = InMemoryStore::new();
        let t = tenant("a.io");
        let lead = store
            .insert_lead(
                &t,
                NewLead {
                    phone: "0100".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .insert_call(
                &t,
                lead.id,
                UserId::new(1),
                NewCall {
                    call_date: Utc::now(),
                    status: 1,
                },
            )
            .await
            .unwrap();

        store.delete_lead(&t, lead.id).await.unwrap();
        assert!(store.read().unwrap().calls.is_empty());
        assert!(matches!(store.list_calls(&t, lead.id).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn child_listings_require_a_parent_in_the_same_tenant() {
        let store = InMemoryStore::new();
        let lead = store
            .insert_lead(
                &tenant("a.io"),
                NewLead {
                    phone: "0100".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let employee = store
            .insert_employee(
                &tenant("a.io"),
                NewEmployee {
                    contact_name: "Laila".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(store.list_calls(&tenant("a.io"), lead.id).await.unwrap().is_empty());
        assert!(store.list_meetings(&tenant("a.io"), lead.id).await.unwrap().is_empty());
        assert!(
            store
                .list_employee_salaries(&tenant("a.io"), employee.id)
                .await
                .unwrap()
                .is_empty()
        );

        let other = tenant("b.io");
        assert!(matches!(store.list_calls(&other, lead.id).await, Err(StoreError::NotFound)));
        assert!(matches!(store.list_meetings(&other, lead.id).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.list_employee_salaries(&other, employee.id).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.list_calls(&tenant("a.io"), LeadId::new(999)).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn salary_period_is_unique_per_employee_and_cascades_on_delete() {
        let store = InMemoryStore::new();
        let t = tenant("a.io");
        let e = store
            .insert_employee(
                &t,
                NewEmployee {
                    contact_name: "Laila".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        store.insert_salary(&t, e.id, new_salary(2024, 5)).await.unwrap();
        store.insert_salary(&t, e.id, new_salary(2024, 6)).await.unwrap();
        assert!(matches!(
            store.insert_salary(&t, e.id, new_salary(2024, 5)).await,
            Err(StoreError::Conflict(_))
        ));

        let listed = store.list_employee_salaries(&t, e.id).await.unwrap();
        assert_eq!(listed[0].period, SalaryPeriod::new(2024, 6));

        store.delete_employee(&t, e.id).await.unwrap();
        assert!(store.list_salaries(&t).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn role_permissions_skip_roles_of_other_tenants() {
        use technia_auth::{ModuleId, StoredCredential};
        use uuid::Uuid;

        let store = InMemoryStore::new();
        let ours = tenant("a.io");
        let theirs = tenant("b.io");

        store
            .add_user(UserAccount {
                principal: Principal {
                    id: UserId::new(1),
                    uid: Uuid::new_v4(),
                    tenant_id: ours.clone(),
                    username: "u".into(),
                    first_name: "U".into(),
                    middle_name: None,
                    last_name: "U".into(),
                    email: "u@a.io".into(),
                    phone: None,
                    gender: None,
                    date_added: Utc::now(),
                },
                credential: StoredCredential::new("pw"),
            })
            .unwrap();
        for (id, tenant_id) in [(1, ours.clone()), (2, theirs.clone())] {
            store
                .add_role(Role {
                    id: RoleId::new(id),
                    tenant_id,
                    module_id: ModuleId::new(1),
                    name: format!("role {id}"),
                })
                .unwrap();
            store.grant(RoleId::new(id), FeatureKey::LEADS, Grants::ALL).unwrap();
            store.assign_role(UserId::new(1), RoleId::new(id)).unwrap();
        }

        let rows = store.role_permissions(&ours, UserId::new(1)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role_id, RoleId::new(1));
    }
}

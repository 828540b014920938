//! Demo data for local development and black-box tests.
//!
//! Two tenants. `technia.io` holds the interesting grant combinations;
//! `acme.co` mirrors its role ids and feature keys so tenant isolation can be
//! checked against identical numbers.

use chrono::Utc;
use uuid::Uuid;

use technia_auth::{FeatureKey, Grants, Module, Principal, Role, RoleId, StoredCredential, UserAccount};
use technia_core::{Gender, TenantId, UserId};
use technia_realestate::{LookupEntry, LookupKind};

use super::{InMemoryStore, StoreResult};

pub const TECHNIA: &str = "technia.io";
pub const ACME: &str = "acme.co";

/// `(username, password)` pairs seeded by [`seed_demo`].
pub mod users {
    /// Full access to every feature of `technia.io`.
    pub const ADMIN: (&str, &str) = ("admin", "admin123");
    /// HR: employees read; salaries read and delete, but not write.
    pub const AMINA: (&str, &str) = ("amina", "amina123");
    /// Real estate agent: leads read/write/edit, actions read/write. No HR.
    pub const OMAR: (&str, &str) = ("omar", "omar123");
    /// Authenticated, but holds no roles.
    pub const NOUR: (&str, &str) = ("nour", "nour123");
    /// Full access, but in `acme.co`.
    pub const KARIM: (&str, &str) = ("karim", "karim123");
}

fn account(id: i32, tenant: &str, (username, password): (&str, &str), first: &str, last: &str, gender: Gender) -> UserAccount {
    UserAccount {
        principal: Principal {
            id: UserId::new(id),
            uid: Uuid::new_v4(),
            tenant_id: TenantId::new(tenant),
            username: username.to_string(),
            first_name: first.to_string(),
            middle_name: None,
            last_name: last.to_string(),
            email: format!("{username}@{tenant}"),
            phone: None,
            gender: Some(gender),
            date_added: Utc::now(),
        },
        credential: StoredCredential::new(password),
    }
}

fn role(store: &InMemoryStore, id: i32, tenant: &str, module: Module, name: &str, grants: &[(FeatureKey, Grants)]) -> StoreResult<RoleId> {
    let role_id = RoleId::new(id);
    store.add_role(Role {
        id: role_id,
        tenant_id: TenantId::new(tenant),
        module_id: module.id(),
        name: name.to_string(),
    })?;
    for (key, g) in grants {
        store.grant(role_id, *key, *g)?;
    }
    Ok(role_id)
}

fn seed_lookups(store: &InMemoryStore, tenant: &str) -> StoreResult<()> {
    let tables: [(LookupKind, &[&str]); 5] = [
        (LookupKind::LeadStage, &["Assigned", "Not Assigned", "Action Taken"]),
        (LookupKind::LeadStatus, &["Hot", "Warm", "Cold", "New"]),
        (LookupKind::LeadType, &["Campaign", "Cold Call", "Personal"]),
        (LookupKind::CallStatus, &["Scheduled", "Answered", "Rescheduled", "Unanswered"]),
        (LookupKind::MeetingStatus, &["Scheduled", "Done", "Cancelled", "Rescheduled"]),
    ];
    for (kind, names) in tables {
        for (id, name) in (1..).zip(names) {
            store.add_lookup(
                kind,
                LookupEntry {
                    id,
                    tenant_id: TenantId::new(tenant),
                    name: name.to_string(),
                },
            )?;
        }
    }
    Ok(())
}

/// Seed the demo tenants, users, roles and lookups.
pub fn seed_demo(store: &InMemoryStore) -> StoreResult<()> {
    let rw = Grants::new(true, true, false, false);
    let rwe = Grants::new(true, true, true, false);

    store.add_user(account(1, TECHNIA, users::ADMIN, "Sara", "Mansour", Gender::Female))?;
    store.add_user(account(2, TECHNIA, users::AMINA, "Amina", "Saleh", Gender::Female))?;
    store.add_user(account(3, TECHNIA, users::OMAR, "Omar", "Farouk", Gender::Male))?;
    store.add_user(account(4, TECHNIA, users::NOUR, "Nour", "Adel", Gender::Male))?;
    store.add_user(account(5, ACME, users::KARIM, "Karim", "Nabil", Gender::Male))?;

    let re_admin = role(
        store,
        1,
        TECHNIA,
        Module::RealEstate,
        "Real Estate Admin",
        &[(FeatureKey::LEADS, Grants::ALL), (FeatureKey::ACTIONS, Grants::ALL)],
    )?;
    let hr_admin = role(
        store,
        2,
        TECHNIA,
        Module::Hr,
        "HR Admin",
        &[(FeatureKey::EMPLOYEES, Grants::ALL), (FeatureKey::SALARIES, Grants::ALL)],
    )?;
    let payroll_viewer = role(
        store,
        3,
        TECHNIA,
        Module::Hr,
        "Payroll Viewer",
        &[(FeatureKey::EMPLOYEES, Grants::read_only()), (FeatureKey::SALARIES, Grants::read_only())],
    )?;
    let payroll_cleaner = role(
        store,
        4,
        TECHNIA,
        Module::Hr,
        "Payroll Cleaner",
        &[(FeatureKey::SALARIES, Grants::new(false, false, false, true))],
    )?;
    let agent = role(
        store,
        5,
        TECHNIA,
        Module::RealEstate,
        "Agent",
        &[(FeatureKey::LEADS, rwe), (FeatureKey::ACTIONS, rw)],
    )?;
    let acme_re = role(
        store,
        6,
        ACME,
        Module::RealEstate,
        "Real Estate Admin",
        &[(FeatureKey::LEADS, Grants::ALL), (FeatureKey::ACTIONS, Grants::ALL)],
    )?;
    let acme_hr = role(
        store,
        7,
        ACME,
        Module::Hr,
        "HR Admin",
        &[(FeatureKey::EMPLOYEES, Grants::ALL), (FeatureKey::SALARIES, Grants::ALL)],
    )?;

    store.assign_role(UserId::new(1), re_admin)?;
    store.assign_role(UserId::new(1), hr_admin)?;
    store.assign_role(UserId::new(2), payroll_viewer)?;
    store.assign_role(UserId::new(2), payroll_cleaner)?;
    store.assign_role(UserId::new(3), agent)?;
    store.assign_role(UserId::new(5), acme_re)?;
    store.assign_role(UserId::new(5), acme_hr)?;

    seed_lookups(store, TECHNIA)?;
    seed_lookups(store, ACME)?;

    tracing::info!(tenants = 2, users = 5, roles = 7, "demo data seeded");
    Ok(())
}

/// A fresh in-memory store with [`seed_demo`] applied.
pub fn demo_store() -> StoreResult<InMemoryStore> {
    let store = InMemoryStore::new();
    seed_demo(&store)?;
    Ok(store)
}

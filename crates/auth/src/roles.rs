use serde::{Deserialize, Serialize};

use technia_core::TenantId;

use crate::{FeatureKey, Grants, ModuleId};

/// Role identifier (integer identity column).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i32);

impl RoleId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for RoleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A named bundle of permissions owned by one tenant.
///
/// Roles are provisioned outside the API; the authorization layer only reads
/// them through role assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub tenant_id: TenantId,
    pub module_id: ModuleId,
    pub name: String,
}

/// One `(role, module, feature)` permission row, as reached through a user's
/// role assignments.
///
/// `tenant_id` is the owning role's tenant, carried along so the aggregation
/// can refuse grants that leak across tenants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    pub role_id: RoleId,
    pub tenant_id: TenantId,
    pub key: FeatureKey,
    pub grants: Grants,
}

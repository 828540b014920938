//! Permission aggregation: the union of every role a principal holds.
//!
//! The result is derived, never stored, and recomputed on every check. A
//! feature absent from the result means "no permission".

use std::collections::BTreeMap;

use technia_core::TenantId;

use crate::{Action, FeatureKey, Grants, Principal, RolePermission};

/// Per-feature grants for one principal, OR-combined across all held roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedPermissions {
    by_feature: BTreeMap<FeatureKey, Grants>,
}

impl AggregatedPermissions {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold role permission rows into per-feature grants for `tenant_id`.
    ///
    /// Rows owned by another tenant are ignored. The fold is an OR, so the
    /// result does not depend on row order.
    pub fn aggregate<'a, I>(tenant_id: &TenantId, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a RolePermission>,
    {
        let mut by_feature: BTreeMap<FeatureKey, Grants> = BTreeMap::new();
        for row in rows {
            if &row.tenant_id != tenant_id {
                tracing::warn!(
                    role_id = %row.role_id,
                    role_tenant = %row.tenant_id,
                    tenant = %tenant_id,
                    "ignoring cross-tenant role permission"
                );
                continue;
            }
            *by_feature.entry(row.key).or_insert(Grants::NONE) |= row.grants;
        }
        Self { by_feature }
    }

    pub fn for_principal<'a, I>(principal: &Principal, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a RolePermission>,
    {
        Self::aggregate(&principal.tenant_id, rows)
    }

    pub fn get(&self, key: FeatureKey) -> Option<Grants> {
        self.by_feature.get(&key).copied()
    }

    pub fn allows(&self, key: FeatureKey, action: Action) -> bool {
        self.get(key).is_some_and(|g| g.allows(action))
    }

    pub fn is_empty(&self) -> bool {
        self.by_feature.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_feature.len()
    }

    /// Entries in `(module, feature)` order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, Grants)> + '_ {
        self.by_feature.iter().map(|(k, g)| (*k, *g))
    }
}

impl FromIterator<(FeatureKey, Grants)> for AggregatedPermissions {
    fn from_iter<T: IntoIterator<Item = (FeatureKey, Grants)>>(iter: T) -> Self {
        let mut by_feature: BTreeMap<FeatureKey, Grants> = BTreeMap::new();
        for (key, grants) in iter {
            *by_feature.entry(key).or_insert(Grants::NONE) |= grants;
        }
        Self { by_feature }
    }
}

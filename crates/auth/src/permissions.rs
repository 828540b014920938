//! Permission model: modules, module-relative features, CRUD actions and grants.
//!
//! Feature ids are only unique *within* a module, so the public surface never
//! exposes a bare feature number with a business meaning. Everything that
//! names a feature does so through [`FeatureKey`], the `(module, feature)` pair.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::authorize::AuthzError;

/// Numeric identifier of a top-level business module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(i32);

impl ModuleId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Numeric identifier of a feature, meaningful only together with its module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(i32);

impl FeatureId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Business modules known to the system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Module {
    RealEstate,
    Hr,
}

impl Module {
    pub const fn id(self) -> ModuleId {
        match self {
            Module::RealEstate => ModuleId::new(1),
            Module::Hr => ModuleId::new(2),
        }
    }
}

/// Compound `(module, feature)` key. The only identity a feature has.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureKey {
    pub module_id: ModuleId,
    pub feature_id: FeatureId,
}

impl FeatureKey {
    /// Real Estate → Leads.
    pub const LEADS: FeatureKey = FeatureKey::of(Module::RealEstate, 1);
    /// Real Estate → Actions (calls and meetings).
    pub const ACTIONS: FeatureKey = FeatureKey::of(Module::RealEstate, 2);
    /// HR → Employees.
    pub const EMPLOYEES: FeatureKey = FeatureKey::of(Module::Hr, 1);
    /// HR → Salaries.
    pub const SALARIES: FeatureKey = FeatureKey::of(Module::Hr, 2);

    pub const fn new(module_id: ModuleId, feature_id: FeatureId) -> Self {
        Self {
            module_id,
            feature_id,
        }
    }

    const fn of(module: Module, feature: i32) -> Self {
        Self::new(module.id(), FeatureId::new(feature))
    }

    /// Build a key from raw integers, as stored in the permission tables.
    pub const fn from_raw(module_id: i32, feature_id: i32) -> Self {
        Self::new(ModuleId::new(module_id), FeatureId::new(feature_id))
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module_id, self.feature_id)
    }
}

/// The four CRUD actions a role can be granted on a feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Write, Action::Edit, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "write" => Ok(Action::Write),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            other => Err(AuthzError::InvalidAction(other.to_string())),
        }
    }
}

/// Four independent boolean grants for one feature.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grants {
    pub read: bool,
    pub write: bool,
    pub edit: bool,
    pub delete: bool,
}

impl Grants {
    pub const NONE: Grants = Grants {
        read: false,
        write: false,
        edit: false,
        delete: false,
    };

    pub const ALL: Grants = Grants {
        read: true,
        write: true,
        edit: true,
        delete: true,
    };

    pub const fn new(read: bool, write: bool, edit: bool, delete: bool) -> Self {
        Self {
            read,
            write,
            edit,
            delete,
        }
    }

    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::NONE
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Write => self.write,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    /// Element-wise OR: the highest privilege granted by either side.
    pub fn union(self, other: Grants) -> Grants {
        Grants {
            read: self.read || other.read,
            write: self.write || other.write,
            edit: self.edit || other.edit,
            delete: self.delete || other.delete,
        }
    }
}

impl BitOr for Grants {
    type Output = Grants;

    fn bitor(self, rhs: Grants) -> Grants {
        self.union(rhs)
    }
}

impl BitOrAssign for Grants {
    fn bitor_assign(&mut self, rhs: Grants) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_ids_are_reused_across_modules_but_keys_differ() {
        assert_eq!(FeatureKey::LEADS.feature_id, FeatureKey::EMPLOYEES.feature_id);
        assert_ne!(FeatureKey::LEADS, FeatureKey::EMPLOYEES);
        assert_ne!(FeatureKey::ACTIONS, FeatureKey::SALARIES);
        assert_eq!(FeatureKey::SALARIES, FeatureKey::from_raw(2, 2));
    }

    #[test]
    fn action_parsing_is_exact() {
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        assert!("Delete".parse::<Action>().is_err());
        assert!("update".parse::<Action>().is_err());
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn union_takes_highest_privilege() {
        let a = Grants::new(true, false, false, false);
        let b = Grants::new(false, false, false, true);
        assert_eq!(a | b, Grants::new(true, false, false, true));
        assert_eq!(a | Grants::NONE, a);
        assert_eq!(a | Grants::ALL, Grants::ALL);
    }
}

//! Credential checks, permission aggregation and the authorization gate.
//!
//! No HTTP and no storage here. Callers load user accounts and role
//! permission rows; this crate decides.

pub mod aggregate;
pub mod authorize;
pub mod credentials;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use aggregate::AggregatedPermissions;
pub use authorize::{AuthzError, authorize, require_permission};
pub use credentials::{StoredCredential, verify_credentials};
pub use permissions::{Action, FeatureId, FeatureKey, Grants, Module, ModuleId};
pub use principal::{Principal, UserAccount};
pub use roles::{Role, RoleId, RolePermission};

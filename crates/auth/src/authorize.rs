//! Authorization gate.
//!
//! - No IO
//! - No panics
//! - Pure function of the aggregated permissions passed in

use thiserror::Error;

use crate::{Action, AggregatedPermissions, FeatureKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Credentials missing or not matching any user. Deliberately generic.
    #[error("Invalid username or password")]
    Unauthenticated,

    #[error("You don't have {action} permission for this resource")]
    Forbidden { key: FeatureKey, action: Action },

    #[error("unknown action '{0}' (expected read, write, edit or delete)")]
    InvalidAction(String),
}

/// Whether `perms` grant `action` on `key`. Absent keys are denied.
pub fn authorize(perms: &AggregatedPermissions, key: FeatureKey, action: Action) -> bool {
    perms.allows(key, action)
}

/// Like [`authorize`], but a denial is an [`AuthzError::Forbidden`].
pub fn require_permission(
    perms: &AggregatedPermissions,
    key: FeatureKey,
    action: Action,
) -> Result<(), AuthzError> {
    if authorize(perms, key, action) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden { key, action })
    }
}

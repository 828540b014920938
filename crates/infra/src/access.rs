//! Request-path access control: credential checks, identity resolution,
//! permission aggregation and the authorization gate, wired to storage.
//!
//! Nothing here caches. Each call reads the current role state, so a role
//! change is visible on the next request.

use std::sync::Arc;

use thiserror::Error;

use technia_auth::{Action, AggregatedPermissions, AuthzError, FeatureKey, Principal, verify_credentials};

use crate::store::{IdentityStore, StoreError};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct AccessControl {
    identities: Arc<dyn IdentityStore>,
}

impl AccessControl {
    pub fn new(identities: Arc<dyn IdentityStore>) -> Self {
        Self { identities }
    }

    /// Principal for `username` iff the stored credential equals `password`.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<Principal>, AccessError> {
        let account = self.identities.find_account_by_username(username).await?;
        Ok(verify_credentials(account, password))
    }

    /// Like [`Self::verify_credentials`], but "no match" is `Unauthenticated`.
    pub async fn resolve_identity(&self, username: &str, password: &str) -> Result<Principal, AccessError> {
        match self.verify_credentials(username, password).await? {
            Some(principal) => Ok(principal),
            None => {
                tracing::warn!("authentication failed");
                Err(AuthzError::Unauthenticated.into())
            }
        }
    }

    pub async fn aggregated_permissions(&self, principal: &Principal) -> Result<AggregatedPermissions, AccessError> {
        let rows = self
            .identities
            .role_permissions(&principal.tenant_id, principal.id)
            .await?;
        Ok(AggregatedPermissions::for_principal(principal, &rows))
    }

    pub async fn authorize(&self, principal: &Principal, key: FeatureKey, action: Action) -> Result<bool, AccessError> {
        let perms = self.aggregated_permissions(principal).await?;
        Ok(technia_auth::authorize(&perms, key, action))
    }

    /// `Forbidden` unless the principal's roles grant `action` on `key`.
    pub async fn require_permission(&self, principal: &Principal, key: FeatureKey, action: Action) -> Result<(), AccessError> {
        let perms = self.aggregated_permissions(principal).await?;
        technia_auth::require_permission(&perms, key, action).map_err(|e| {
            tracing::warn!(
                user_id = %principal.id,
                tenant = %principal.tenant_id,
                feature = %key,
                action = %action,
                "permission denied"
            );
            AccessError::from(e)
        })
    }
}

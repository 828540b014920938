use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use technia_core::{Gender, TenantId, UserId};

use crate::credentials::StoredCredential;

/// An authenticated user (system login), scoped to exactly one tenant.
///
/// Never carries the credential: see [`UserAccount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub uid: Uuid,
    pub tenant_id: TenantId,
    pub username: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub date_added: DateTime<Utc>,
}

/// A stored user row: the principal plus its stored credential.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub principal: Principal,
    pub credential: StoredCredential,
}

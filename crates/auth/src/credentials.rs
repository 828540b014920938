//! Credential verification.
//!
//! Credentials are stored and compared as-is: the stored value must equal the
//! supplied password byte for byte. This is plaintext storage and a known weak
//! point; moving to salted hashes changes stored data and is a separate change.

use subtle::ConstantTimeEq;

use crate::principal::{Principal, UserAccount};

/// A stored password credential. Never printed.
#[derive(Clone)]
pub struct StoredCredential(String);

impl StoredCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exact byte equality, evaluated in constant time.
    pub fn matches(&self, supplied: &str) -> bool {
        self.0.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}

impl core::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("StoredCredential(***)")
    }
}

/// Check a username lookup result against a supplied password.
///
/// Returns the principal on a match, `None` otherwise (unknown user and wrong
/// password are indistinguishable to the caller).
pub fn verify_credentials(account: Option<UserAccount>, password: &str) -> Option<Principal> {
    let account = account?;
    if account.credential.matches(password) {
        Some(account.principal)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use technia_core::{Gender, TenantId, UserId};
    use uuid::Uuid;

    use super::*;

    fn account(password: &str) -> UserAccount {
        UserAccount {
            principal: Principal {
                id: UserId::new(1),
                uid: Uuid::new_v4(),
                tenant_id: TenantId::new("technia.io"),
                username: "amina".to_string(),
                first_name: "Amina".to_string(),
                middle_name: None,
                last_name: "Saleh".to_string(),
                email: "amina@technia.io".to_string(),
                phone: None,
                gender: Some(Gender::Female),
                date_added: Utc::now(),
            },
            credential: StoredCredential::new(password),
        }
    }

    #[test]
    fn exact_password_matches() {
        let principal = verify_credentials(Some(account("s3cret")), "s3cret").unwrap();
        assert_eq!(principal.username, "amina");
    }

    #[test]
    fn near_misses_are_rejected() {
        assert!(verify_credentials(Some(account("s3cret")), "s3cre").is_none());
        assert!(verify_credentials(Some(account("s3cret")), "S3cret").is_none());
        assert!(verify_credentials(Some(account("s3cret")), "s3cret ").is_none());
        assert!(verify_credentials(Some(account("s3cret")), "").is_none());
    }

    #[test]
    fn unknown_user_is_no_match() {
        assert!(verify_credentials(None, "anything").is_none());
    }

    #[test]
    fn debug_output_hides_the_credential() {
        let rendered = format!("{:?}", StoredCredential::new("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use technia_core::validate::{optional_email, optional_text, required_text};
use technia_core::{DomainError, DomainResult, Gender, TenantId};

pub const CONTACT_NAME_MAX: usize = 50;
pub const PHONE_MAX: usize = 50;
pub const EMAIL_MAX: usize = 50;

/// Employee identifier, unique within a tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(i32);

impl EmployeeId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A company employee. Keyed by `(tenant_id, id)`.
///
/// Employees are records, not logins; `user_uid` optionally links one to a
/// system user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub tenant_id: TenantId,
    pub id: EmployeeId,
    pub contact_name: String,
    pub business_phone: Option<String>,
    pub personal_phone: Option<String>,
    pub business_email: Option<String>,
    pub personal_email: Option<String>,
    pub gender: Option<Gender>,
    pub is_company_admin: bool,
    pub user_uid: Option<Uuid>,
    pub date_added: DateTime<Utc>,
}

impl Employee {
    pub fn apply(&mut self, changes: EmployeeChanges) {
        if let Some(name) = changes.contact_name {
            self.contact_name = name;
        }
        if changes.business_phone.is_some() {
            self.business_phone = changes.business_phone;
        }
        if changes.personal_phone.is_some() {
            self.personal_phone = changes.personal_phone;
        }
        if changes.business_email.is_some() {
            self.business_email = changes.business_email;
        }
        if changes.personal_email.is_some() {
            self.personal_email = changes.personal_email;
        }
        if changes.gender.is_some() {
            self.gender = changes.gender;
        }
        if let Some(admin) = changes.is_company_admin {
            self.is_company_admin = admin;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEmployee {
    pub contact_name: String,
    pub business_phone: Option<String>,
    pub personal_phone: Option<String>,
    pub business_email: Option<String>,
    pub personal_email: Option<String>,
    pub gender: Option<Gender>,
    pub is_company_admin: bool,
}

impl NewEmployee {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            contact_name: required_text("contact_name", &self.contact_name, CONTACT_NAME_MAX)?,
            business_phone: optional_text("business_phone", self.business_phone, PHONE_MAX)?,
            personal_phone: optional_text("personal_phone", self.personal_phone, PHONE_MAX)?,
            business_email: optional_email("business_email", self.business_email, EMAIL_MAX)?,
            personal_email: optional_email("personal_email", self.personal_email, EMAIL_MAX)?,
            ..self
        })
    }

    pub fn into_employee(self, tenant_id: TenantId, id: EmployeeId, date_added: DateTime<Utc>) -> Employee {
        Employee {
            tenant_id,
            id,
            contact_name: self.contact_name,
            business_phone: self.business_phone,
            personal_phone: self.personal_phone,
            business_email: self.business_email,
            personal_email: self.personal_email,
            gender: self.gender,
            is_company_admin: self.is_company_admin,
            user_uid: None,
            date_added,
        }
    }
}

/// Partial employee update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub contact_name: Option<String>,
    pub business_phone: Option<String>,
    pub personal_phone: Option<String>,
    pub business_email: Option<String>,
    pub personal_email: Option<String>,
    pub gender: Option<Gender>,
    pub is_company_admin: Option<bool>,
}

impl EmployeeChanges {
    pub fn validated(self) -> DomainResult<Self> {
        let contact_name = match self.contact_name {
            Some(name) if name.trim().is_empty() => {
                return Err(DomainError::validation("contact_name cannot be empty"));
            }
            Some(name) => Some(required_text("contact_name", &name, CONTACT_NAME_MAX)?),
            None => None,
        };
        Ok(Self {
            contact_name,
            business_phone: optional_text("business_phone", self.business_phone, PHONE_MAX)?,
            personal_phone: optional_text("personal_phone", self.personal_phone, PHONE_MAX)?,
            business_email: optional_text("business_email", self.business_email, EMAIL_MAX)?,
            personal_email: optional_text("personal_email", self.personal_email, EMAIL_MAX)?,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_name_is_required_and_trimmed() {
        let e = NewEmployee {
            contact_name: "  Laila Hassan ".into(),
            ..Default::default()
        }
        .validated()
        .unwrap();
        assert_eq!(e.contact_name, "Laila Hassan");

        assert!(NewEmployee::default().validated().is_err());
        assert!(
            NewEmployee {
                contact_name: "x".repeat(51),
                ..Default::default()
            }
            .validated()
            .is_err()
        );
    }

    #[test]
    fn malformed_business_email_is_rejected() {
        let e = NewEmployee {
            contact_name: "Laila".into(),
            business_email: Some("laila-at-technia".into()),
            ..Default::default()
        };
        assert!(e.validated().is_err());
    }

    #[test]
    fn update_cannot_blank_the_name() {
        let changes = EmployeeChanges {
            contact_name: Some("  ".into()),
            ..Default::default()
        };
        assert!(changes.validated().is_err());
    }

    #[test]
    fn apply_keeps_unsupplied_fields() {
        let mut e = NewEmployee {
            contact_name: "Laila".into(),
            business_phone: Some("100".into()),
            ..Default::default()
        }
        .into_employee(TenantId::new("technia.io"), EmployeeId::new(1), Utc::now());

        e.apply(EmployeeChanges {
            is_company_admin: Some(true),
            ..Default::default()
        });

        assert!(e.is_company_admin);
        assert_eq!(e.business_phone.as_deref(), Some("100"));
    }
}

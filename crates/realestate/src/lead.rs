use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use technia_core::validate::{optional_text, required_text};
use technia_core::{DomainResult, Gender, TenantId, UserId};

pub const PHONE_MAX: usize = 50;
pub const NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 50;
pub const JOB_TITLE_MAX: usize = 100;

/// Lead identifier (bigint identity column).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(i64);

impl LeadId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for LeadId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A prospective customer. `phone` is unique within the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub tenant_id: TenantId,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub job_title: Option<String>,
    pub assigned_to: Option<UserId>,
    pub stage: Option<i32>,
    pub lead_type: Option<i32>,
    pub status: Option<i32>,
    pub date_added: DateTime<Utc>,
}

impl Lead {
    /// Apply a partial update. Fields left `None` in `changes` are untouched.
    pub fn apply(&mut self, changes: LeadChanges) {
        let LeadChanges {
            name,
            email,
            gender,
            job_title,
            assigned_to,
            stage,
            lead_type,
            status,
        } = changes;

        if name.is_some() {
            self.name = name;
        }
        if email.is_some() {
            self.email = email;
        }
        if gender.is_some() {
            self.gender = gender;
        }
        if job_title.is_some() {
            self.job_title = job_title;
        }
        if assigned_to.is_some() {
            self.assigned_to = assigned_to;
        }
        if stage.is_some() {
            self.stage = stage;
        }
        if lead_type.is_some() {
            self.lead_type = lead_type;
        }
        if status.is_some() {
            self.status = status;
        }
    }
}

/// Input for a new lead. Build it, then call [`NewLead::validated`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLead {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub job_title: Option<String>,
    pub assigned_to: Option<UserId>,
    pub stage: Option<i32>,
    pub lead_type: Option<i32>,
    pub status: Option<i32>,
}

impl NewLead {
    /// Trim the phone (required) and check field lengths.
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            phone: required_text("lead_phone", &self.phone, PHONE_MAX)?,
            name: optional_text("name", self.name, NAME_MAX)?,
            email: optional_text("email", self.email, EMAIL_MAX)?,
            job_title: optional_text("job_title", self.job_title, JOB_TITLE_MAX)?,
            ..self
        })
    }

    pub fn into_lead(self, id: LeadId, tenant_id: TenantId, date_added: DateTime<Utc>) -> Lead {
        Lead {
            id,
            tenant_id,
            phone: self.phone,
            name: self.name,
            email: self.email,
            gender: self.gender,
            job_title: self.job_title,
            assigned_to: self.assigned_to,
            stage: self.stage,
            lead_type: self.lead_type,
            status: self.status,
            date_added,
        }
    }
}

/// Partial lead update. The phone number cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Gender>,
    pub job_title: Option<String>,
    pub assigned_to: Option<UserId>,
    pub stage: Option<i32>,
    pub lead_type: Option<i32>,
    pub status: Option<i32>,
}

impl LeadChanges {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: optional_text("name", self.name, NAME_MAX)?,
            email: optional_text("email", self.email, EMAIL_MAX)?,
            job_title: optional_text("job_title", self.job_title, JOB_TITLE_MAX)?,
            ..self
        })
    }
}

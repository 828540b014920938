use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};

use technia_auth::{AggregatedPermissions, Principal};
use technia_core::{DomainResult, UserId, parse_gender};
use technia_hr::{Employee, EmployeeChanges, NewEmployee, NewSalary, Salary, SalaryAmounts, SalaryChanges, SalaryPeriod};
use technia_realestate::{Call, Lead, LeadChanges, LookupEntry, Meeting, NewCall, NewLead, NewMeeting};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub lead_phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub job_title: Option<String>,
    pub assigned_to: Option<i32>,
    pub lead_stage: Option<i32>,
    pub lead_type: Option<i32>,
    pub lead_status: Option<i32>,
}

impl CreateLeadRequest {
    pub fn into_new_lead(self) -> DomainResult<NewLead> {
        NewLead {
            phone: self.lead_phone,
            name: self.name,
            email: self.email,
            gender: parse_gender(self.gender.as_deref())?,
            job_title: self.job_title,
            assigned_to: self.assigned_to.map(UserId::new),
            stage: self.lead_stage,
            lead_type: self.lead_type,
            status: self.lead_status,
        }
        .validated()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub job_title: Option<String>,
    pub assigned_to: Option<i32>,
    pub lead_stage: Option<i32>,
    pub lead_type: Option<i32>,
    pub lead_status: Option<i32>,
}

impl UpdateLeadRequest {
    pub fn into_changes(self) -> DomainResult<LeadChanges> {
        LeadChanges {
            name: self.name,
            email: self.email,
            gender: parse_gender(self.gender.as_deref())?,
            job_title: self.job_title,
            assigned_to: self.assigned_to.map(UserId::new),
            stage: self.lead_stage,
            lead_type: self.lead_type,
            status: self.lead_status,
        }
        .validated()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCallRequest {
    pub call_date: DateTime<Utc>,
    pub call_status: i32,
}

impl From<CreateCallRequest> for NewCall {
    fn from(body: CreateCallRequest) -> Self {
        NewCall {
            call_date: body.call_date,
            status: body.call_status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMeetingRequest {
    pub meeting_date: DateTime<Utc>,
    pub meeting_status: i32,
}

impl From<CreateMeetingRequest> for NewMeeting {
    fn from(body: CreateMeetingRequest) -> Self {
        NewMeeting {
            meeting_date: body.meeting_date,
            status: body.meeting_status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub contact_name: String,
    pub business_phone: Option<String>,
    pub personal_phone: Option<String>,
    pub business_email: Option<String>,
    pub personal_email: Option<String>,
    pub gender: Option<String>,
    pub is_company_admin: Option<bool>,
}

impl CreateEmployeeRequest {
    pub fn into_new_employee(self) -> DomainResult<NewEmployee> {
        NewEmployee {
            contact_name: self.contact_name,
            business_phone: self.business_phone,
            personal_phone: self.personal_phone,
            business_email: self.business_email,
            personal_email: self.personal_email,
            gender: parse_gender(self.gender.as_deref())?,
            is_company_admin: self.is_company_admin.unwrap_or(false),
        }
        .validated()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub contact_name: Option<String>,
    pub business_phone: Option<String>,
    pub personal_phone: Option<String>,
    pub business_email: Option<String>,
    pub personal_email: Option<String>,
    pub gender: Option<String>,
    pub is_company_admin: Option<bool>,
}

impl UpdateEmployeeRequest {
    pub fn into_changes(self) -> DomainResult<EmployeeChanges> {
        EmployeeChanges {
            contact_name: self.contact_name,
            business_phone: self.business_phone,
            personal_phone: self.personal_phone,
            business_email: self.business_email,
            personal_email: self.personal_email,
            gender: parse_gender(self.gender.as_deref())?,
            is_company_admin: self.is_company_admin,
        }
        .validated()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSalaryRequest {
    pub due_year: i32,
    pub due_month: i32,
    pub gross_salary: Option<Decimal>,
    pub insurance: Option<Decimal>,
    pub taxes: Option<Decimal>,
    pub net_salary: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

impl CreateSalaryRequest {
    pub fn into_new_salary(self) -> DomainResult<NewSalary> {
        NewSalary {
            period: SalaryPeriod::new(self.due_year, self.due_month),
            amounts: SalaryAmounts {
                gross_salary: self.gross_salary,
                insurance: self.insurance,
                taxes: self.taxes,
                net_salary: self.net_salary,
            },
            due_date: self.due_date,
        }
        .validated()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSalaryRequest {
    pub gross_salary: Option<Decimal>,
    pub insurance: Option<Decimal>,
    pub taxes: Option<Decimal>,
    pub net_salary: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

impl UpdateSalaryRequest {
    pub fn into_changes(self) -> DomainResult<SalaryChanges> {
        SalaryChanges {
            amounts: SalaryAmounts {
                gross_salary: self.gross_salary,
                insurance: self.insurance,
                taxes: self.taxes,
                net_salary: self.net_salary,
            },
            due_date: self.due_date,
        }
        .validated()
    }
}

// -------------------------
// Response mapping
// -------------------------

/// Public view of a user. Never includes the credential.
pub fn principal_to_json(p: &Principal) -> Value {
    json!({
        "id": p.id,
        "uid": p.uid,
        "username": p.username,
        "first_name": p.first_name,
        "middle_name": p.middle_name,
        "last_name": p.last_name,
        "email": p.email,
        "phone": p.phone,
        "gender": p.gender,
        "company_domain": p.tenant_id,
        "date_added": p.date_added,
    })
}

pub fn permissions_to_json(perms: &AggregatedPermissions) -> Value {
    Value::Array(
        perms
            .iter()
            .map(|(key, g)| {
                json!({
                    "module_id": key.module_id,
                    "feature_id": key.feature_id,
                    "d_read": g.read,
                    "d_write": g.write,
                    "d_edit": g.edit,
                    "d_delete": g.delete,
                })
            })
            .collect(),
    )
}

pub fn lookup_to_json(entry: &LookupEntry) -> Value {
    json!({
        "id": entry.id,
        "name": entry.name,
        "company_domain": entry.tenant_id,
    })
}

pub fn lead_to_json(lead: &Lead) -> Value {
    json!({
        "lead_id": lead.id,
        "name": lead.name,
        "lead_phone": lead.phone,
        "email": lead.email,
        "gender": lead.gender,
        "job_title": lead.job_title,
        "assigned_to": lead.assigned_to,
        "lead_stage": lead.stage,
        "lead_type": lead.lead_type,
        "lead_status": lead.status,
        "company_domain": lead.tenant_id,
        "date_added": lead.date_added,
    })
}

pub fn call_to_json(call: &Call, status_name: Option<&str>) -> Value {
    let mut v = json!({
        "call_id": call.id,
        "call_date": call.call_date,
        "call_status": call.status,
        "assigned_to": call.assigned_to,
        "lead_id": call.lead_id,
        "company_domain": call.tenant_id,
        "date_added": call.date_added,
    });
    if let Some(name) = status_name {
        v["call_status_name"] = json!(name);
    }
    v
}

pub fn meeting_to_json(meeting: &Meeting, status_name: Option<&str>) -> Value {
    let mut v = json!({
        "meeting_id": meeting.id,
        "meeting_date": meeting.meeting_date,
        "meeting_status": meeting.status,
        "assigned_to": meeting.assigned_to,
        "lead_id": meeting.lead_id,
        "company_domain": meeting.tenant_id,
        "date_added": meeting.date_added,
    });
    if let Some(name) = status_name {
        v["meeting_status_name"] = json!(name);
    }
    v
}

pub fn employee_to_json(e: &Employee) -> Value {
    json!({
        "employee_id": e.id,
        "contact_name": e.contact_name,
        "business_phone": e.business_phone,
        "personal_phone": e.personal_phone,
        "business_email": e.business_email,
        "personal_email": e.personal_email,
        "gender": e.gender,
        "is_company_admin": e.is_company_admin,
        "user_uid": e.user_uid,
        "company_domain": e.tenant_id,
        "date_added": e.date_added,
    })
}

pub fn salary_to_json(s: &Salary) -> Value {
    json!({
        "employee_id": s.employee_id,
        "due_year": s.period.year,
        "due_month": s.period.month,
        "gross_salary": s.amounts.gross_salary,
        "insurance": s.amounts.insurance,
        "taxes": s.amounts.taxes,
        "net_salary": s.amounts.net_salary,
        "due_date": s.due_date,
        "company_domain": s.tenant_id,
        "date_added": s.date_added,
    })
}

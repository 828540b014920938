//! Postgres backend.
//!
//! Every query carries `company_domain` in its `WHERE` clause (or inserts it),
//! so a row of another tenant can never be read or touched.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use technia_auth::{FeatureKey, Grants, Principal, RoleId, RolePermission, StoredCredential, UserAccount};
use technia_core::{Gender, TenantId, UserId, parse_gender};
use technia_hr::{
    Employee, EmployeeChanges, EmployeeId, NewEmployee, NewSalary, Salary, SalaryAmounts, SalaryChanges,
    SalaryPeriod,
};
use technia_realestate::{
    Call, CallId, Lead, LeadChanges, LeadId, LookupEntry, LookupKind, Meeting, MeetingId, NewCall, NewLead,
    NewMeeting,
};

use super::{HrStore, IdentityStore, RealEstateStore, StoreError, StoreResult};

/// Tables are created on startup when missing. Existing tables are left alone.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS user_info (
        id              SERIAL PRIMARY KEY,
        uid             UUID NOT NULL DEFAULT gen_random_uuid(),
        company_domain  VARCHAR(100) NOT NULL,
        first_name      VARCHAR(50) NOT NULL,
        middle_name     VARCHAR(50),
        last_name       VARCHAR(50) NOT NULL,
        phone           VARCHAR(50) UNIQUE,
        email           VARCHAR(50) NOT NULL UNIQUE,
        username        VARCHAR(50) NOT NULL UNIQUE,
        password_hash   VARCHAR(200) NOT NULL,
        gender          VARCHAR(10) CHECK (gender IN ('Male', 'Female')),
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_roles (
        id              SERIAL PRIMARY KEY,
        company_domain  VARCHAR(100) NOT NULL,
        module_id       INT NOT NULL,
        name            VARCHAR(50) NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_role_permissions (
        role_id     INT NOT NULL REFERENCES user_roles(id) ON DELETE CASCADE,
        module_id   INT NOT NULL,
        feature_id  INT NOT NULL,
        d_read      BOOLEAN NOT NULL DEFAULT FALSE,
        d_write     BOOLEAN NOT NULL DEFAULT FALSE,
        d_edit      BOOLEAN NOT NULL DEFAULT FALSE,
        d_delete    BOOLEAN NOT NULL DEFAULT FALSE,
        PRIMARY KEY (role_id, module_id, feature_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_role_mapping (
        user_id  INT NOT NULL REFERENCES user_info(id) ON DELETE CASCADE,
        role_id  INT NOT NULL REFERENCES user_roles(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, role_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads_stage (
        company_domain  VARCHAR(100) NOT NULL,
        id              INT NOT NULL,
        lead_stage      VARCHAR(50),
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads_status (
        company_domain  VARCHAR(100) NOT NULL,
        id              INT NOT NULL,
        lead_status     VARCHAR(50),
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads_types (
        company_domain  VARCHAR(100) NOT NULL,
        id              INT NOT NULL,
        lead_type       VARCHAR(50),
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS calls_status (
        company_domain  VARCHAR(100) NOT NULL,
        id              INT NOT NULL,
        call_status     VARCHAR(50),
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS meetings_status (
        company_domain  VARCHAR(100) NOT NULL,
        id              INT NOT NULL,
        meeting_status  VARCHAR(50),
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leads_info (
        lead_id         BIGSERIAL PRIMARY KEY,
        company_domain  VARCHAR(100) NOT NULL,
        lead_phone      VARCHAR(50) NOT NULL,
        name            VARCHAR(50),
        assigned_to     INT,
        email           VARCHAR(50),
        gender          VARCHAR(10),
        job_title       VARCHAR(100),
        lead_stage      INT,
        lead_type       INT,
        lead_status     INT,
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (company_domain, lead_phone)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS client_calls (
        call_id         SERIAL PRIMARY KEY,
        assigned_to     INT NOT NULL,
        company_domain  VARCHAR(100) NOT NULL,
        lead_id         BIGINT NOT NULL REFERENCES leads_info(lead_id) ON DELETE CASCADE,
        call_date       TIMESTAMPTZ NOT NULL,
        call_status     INT NOT NULL,
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS client_meetings (
        meeting_id      SERIAL PRIMARY KEY,
        assigned_to     INT NOT NULL,
        company_domain  VARCHAR(100) NOT NULL,
        lead_id         BIGINT NOT NULL REFERENCES leads_info(lead_id) ON DELETE CASCADE,
        meeting_date    TIMESTAMPTZ NOT NULL,
        meeting_status  INT NOT NULL,
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees_info (
        company_domain    VARCHAR(100) NOT NULL,
        employee_id       SERIAL,
        contact_name      VARCHAR(50) NOT NULL,
        business_phone    VARCHAR(50),
        personal_phone    VARCHAR(50),
        business_email    VARCHAR(50),
        personal_email    VARCHAR(50),
        gender            VARCHAR(10),
        is_company_admin  BOOLEAN NOT NULL DEFAULT FALSE,
        user_uid          UUID,
        date_added        TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, employee_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees_salaries (
        company_domain  VARCHAR(100) NOT NULL,
        employee_id     INT NOT NULL,
        due_year        INT NOT NULL,
        due_month       INT NOT NULL,
        gross_salary    NUMERIC(19, 4),
        insurance       NUMERIC(19, 4),
        taxes           NUMERIC(19, 4),
        net_salary      NUMERIC(19, 4),
        due_date        DATE,
        date_added      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (company_domain, employee_id, due_year, due_month),
        FOREIGN KEY (company_domain, employee_id)
            REFERENCES employees_info(company_domain, employee_id) ON DELETE CASCADE
    )
    "#,
];

const LEAD_COLUMNS: &str = "lead_id, company_domain, lead_phone, name, assigned_to, email, gender, \
     job_title, lead_stage, lead_type, lead_status, date_added";

const EMPLOYEE_COLUMNS: &str = "company_domain, employee_id, contact_name, business_phone, personal_phone, \
     business_email, personal_email, gender, is_company_admin, user_uid, date_added";

const SALARY_COLUMNS: &str = "company_domain, employee_id, due_year, due_month, gross_salary, insurance, \
     taxes, net_salary, due_date, date_added";

const USER_COLUMNS: &str = "id, uid, company_domain, first_name, middle_name, last_name, phone, email, \
     username, password_hash, gender, date_added";

/// All stores backed by one Postgres pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create missing tables. Idempotent.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!(tables = SCHEMA.len(), "database schema ensured");
        Ok(())
    }
}

impl PostgresStore {
    async fn lead_exists(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<bool> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM leads_info WHERE company_domain = $1 AND lead_id = $2)",
        )
        .bind(tenant_id.as_str())
        .bind(id.get())
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    async fn employee_exists(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<bool> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM employees_info WHERE company_domain = $1 AND employee_id = $2)",
        )
        .bind(tenant_id.as_str())
        .bind(id.get())
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }
}

fn lookup_table(kind: LookupKind) -> (&'static str, &'static str) {
    match kind {
        LookupKind::LeadStage => ("leads_stage", "lead_stage"),
        LookupKind::LeadStatus => ("leads_status", "lead_status"),
        LookupKind::LeadType => ("leads_types", "lead_type"),
        LookupKind::CallStatus => ("calls_status", "call_status"),
        LookupKind::MeetingStatus => ("meetings_status", "meeting_status"),
    }
}

fn conflict_on_unique(err: sqlx::Error, message: String) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(message);
        }
    }
    StoreError::Database(err)
}

fn decode_gender(row: &PgRow, column: &str) -> Result<Option<Gender>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    parse_gender(raw.as_deref()).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn user_from_row(row: &PgRow) -> Result<UserAccount, sqlx::Error> {
    Ok(UserAccount {
        principal: Principal {
            id: UserId::new(row.try_get("id")?),
            uid: row.try_get("uid")?,
            tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            middle_name: row.try_get("middle_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            gender: decode_gender(row, "gender")?,
            date_added: row.try_get("date_added")?,
        },
        credential: StoredCredential::new(row.try_get::<String, _>("password_hash")?),
    })
}

fn lead_from_row(row: &PgRow) -> Result<Lead, sqlx::Error> {
    Ok(Lead {
        id: LeadId::new(row.try_get("lead_id")?),
        tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
        phone: row.try_get("lead_phone")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        gender: decode_gender(row, "gender")?,
        job_title: row.try_get("job_title")?,
        assigned_to: row.try_get::<Option<i32>, _>("assigned_to")?.map(UserId::new),
        stage: row.try_get("lead_stage")?,
        lead_type: row.try_get("lead_type")?,
        status: row.try_get("lead_status")?,
        date_added: row.try_get("date_added")?,
    })
}

fn call_from_row(row: &PgRow) -> Result<Call, sqlx::Error> {
    Ok(Call {
        id: CallId(row.try_get("call_id")?),
        tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
        lead_id: LeadId::new(row.try_get("lead_id")?),
        assigned_to: UserId::new(row.try_get("assigned_to")?),
        call_date: row.try_get("call_date")?,
        status: row.try_get("call_status")?,
        date_added: row.try_get("date_added")?,
    })
}

fn meeting_from_row(row: &PgRow) -> Result<Meeting, sqlx::Error> {
    Ok(Meeting {
        id: MeetingId(row.try_get("meeting_id")?),
        tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
        lead_id: LeadId::new(row.try_get("lead_id")?),
        assigned_to: UserId::new(row.try_get("assigned_to")?),
        meeting_date: row.try_get("meeting_date")?,
        status: row.try_get("meeting_status")?,
        date_added: row.try_get("date_added")?,
    })
}

fn employee_from_row(row: &PgRow) -> Result<Employee, sqlx::Error> {
    Ok(Employee {
        tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
        id: EmployeeId::new(row.try_get("employee_id")?),
        contact_name: row.try_get("contact_name")?,
        business_phone: row.try_get("business_phone")?,
        personal_phone: row.try_get("personal_phone")?,
        business_email: row.try_get("business_email")?,
        personal_email: row.try_get("personal_email")?,
        gender: decode_gender(row, "gender")?,
        is_company_admin: row.try_get("is_company_admin")?,
        user_uid: row.try_get("user_uid")?,
        date_added: row.try_get("date_added")?,
    })
}

fn salary_from_row(row: &PgRow) -> Result<Salary, sqlx::Error> {
    Ok(Salary {
        tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
        employee_id: EmployeeId::new(row.try_get("employee_id")?),
        period: SalaryPeriod::new(row.try_get("due_year")?, row.try_get("due_month")?),
        amounts: SalaryAmounts {
            gross_salary: row.try_get("gross_salary")?,
            insurance: row.try_get("insurance")?,
            taxes: row.try_get("taxes")?,
            net_salary: row.try_get("net_salary")?,
        },
        due_date: row.try_get("due_date")?,
        date_added: row.try_get("date_added")?,
    })
}

#[async_trait::async_trait]
impl IdentityStore for PostgresStore {
    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM user_info WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn list_users(&self, tenant_id: &TenantId) -> StoreResult<Vec<Principal>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM user_info WHERE company_domain = $1 ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| user_from_row(r).map(|a| a.principal).map_err(StoreError::from))
            .collect()
    }

    async fn role_permissions(&self, tenant_id: &TenantId, user_id: UserId) -> StoreResult<Vec<RolePermission>> {
        let rows = sqlx::query(
            r#"
            SELECT p.role_id, r.company_domain, p.module_id, p.feature_id,
                   p.d_read, p.d_write, p.d_edit, p.d_delete
            FROM user_role_mapping m
            JOIN user_roles r ON r.id = m.role_id
            JOIN user_role_permissions p ON p.role_id = r.id
            WHERE m.user_id = $1 AND r.company_domain = $2
            "#,
        )
        .bind(user_id.get())
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(RolePermission {
                role_id: RoleId::new(row.try_get("role_id")?),
                tenant_id: TenantId::new(row.try_get::<String, _>("company_domain")?),
                key: FeatureKey::from_raw(row.try_get("module_id")?, row.try_get("feature_id")?),
                grants: Grants::new(
                    row.try_get("d_read")?,
                    row.try_get("d_write")?,
                    row.try_get("d_edit")?,
                    row.try_get("d_delete")?,
                ),
            });
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl RealEstateStore for PostgresStore {
    async fn list_lookup(&self, tenant_id: &TenantId, kind: LookupKind) -> StoreResult<Vec<LookupEntry>> {
        let (table, column) = lookup_table(kind);
        let sql = format!("SELECT id, {column} AS name FROM {table} WHERE company_domain = $1 ORDER BY id");
        let rows = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(LookupEntry {
                id: row.try_get("id")?,
                tenant_id: tenant_id.clone(),
                name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            });
        }
        Ok(out)
    }

    async fn insert_lead(&self, tenant_id: &TenantId, lead: NewLead) -> StoreResult<Lead> {
        let sql = format!(
            "INSERT INTO leads_info (company_domain, lead_phone, name, assigned_to, email, gender, job_title, \
             lead_stage, lead_type, lead_status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {LEAD_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(&lead.phone)
            .bind(&lead.name)
            .bind(lead.assigned_to.map(UserId::get))
            .bind(&lead.email)
            .bind(lead.gender.map(Gender::as_str))
            .bind(&lead.job_title)
            .bind(lead.stage)
            .bind(lead.lead_type)
            .bind(lead.status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "A lead with this phone number already exists".to_string()))?;
        Ok(lead_from_row(&row)?)
    }

    async fn list_leads(&self, tenant_id: &TenantId) -> StoreResult<Vec<Lead>> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads_info WHERE company_domain = $1 ORDER BY lead_id");
        let rows = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| lead_from_row(r).map_err(StoreError::from)).collect()
    }

    async fn get_lead(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<Option<Lead>> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads_info WHERE company_domain = $1 AND lead_id = $2");
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(lead_from_row).transpose()?)
    }

    async fn update_lead(&self, tenant_id: &TenantId, id: LeadId, changes: LeadChanges) -> StoreResult<Lead> {
        let sql = format!(
            "UPDATE leads_info SET \
                name = COALESCE($3, name), \
                email = COALESCE($4, email), \
                gender = COALESCE($5, gender), \
                job_title = COALESCE($6, job_title), \
                assigned_to = COALESCE($7, assigned_to), \
                lead_stage = COALESCE($8, lead_stage), \
                lead_type = COALESCE($9, lead_type), \
                lead_status = COALESCE($10, lead_status) \
             WHERE company_domain = $1 AND lead_id = $2 \
             RETURNING {LEAD_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(id.get())
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(changes.gender.map(Gender::as_str))
            .bind(&changes.job_title)
            .bind(changes.assigned_to.map(UserId::get))
            .bind(changes.stage)
            .bind(changes.lead_type)
            .bind(changes.status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(lead_from_row(&row)?)
    }

    async fn delete_lead(&self, tenant_id: &TenantId, id: LeadId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for table in ["client_calls", "client_meetings"] {
            let sql = format!("DELETE FROM {table} WHERE company_domain = $1 AND lead_id = $2");
            sqlx::query(&sql)
                .bind(tenant_id.as_str())
                .bind(id.get())
                .execute(&mut *tx)
                .await?;
        }
        let deleted = sqlx::query("DELETE FROM leads_info WHERE company_domain = $1 AND lead_id = $2")
            .bind(tenant_id.as_str())
            .bind(id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_call(&self, tenant_id: &TenantId, lead_id: LeadId, assigned_to: UserId, call: NewCall) -> StoreResult<Call> {
        let row = sqlx::query(
            r#"
            INSERT INTO client_calls (company_domain, lead_id, assigned_to, call_date, call_status)
            SELECT $1, $2, $3, $4, $5
            WHERE EXISTS (SELECT 1 FROM leads_info WHERE company_domain = $1 AND lead_id = $2)
            RETURNING call_id, company_domain, lead_id, assigned_to, call_date, call_status, date_added
            "#,
        )
        .bind(tenant_id.as_str())
        .bind(lead_id.get())
        .bind(assigned_to.get())
        .bind(call.call_date)
        .bind(call.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(call_from_row(&row)?)
    }

    async fn list_calls(&self, tenant_id: &TenantId, lead_id: LeadId) -> StoreResult<Vec<Call>> {
        if !self.lead_exists(tenant_id, lead_id).await? {
            return Err(StoreError::NotFound);
        }
        let rows = sqlx::query(
            r#"
            SELECT call_id, company_domain, lead_id, assigned_to, call_date, call_status, date_added
            FROM client_calls
            WHERE company_domain = $1 AND lead_id = $2
            ORDER BY call_id
            "#,
        )
        .bind(tenant_id.as_str())
        .bind(lead_id.get())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|r| call_from_row(r).map_err(StoreError::from)).collect()
    }

    async fn insert_meeting(
        &self,
        tenant_id: &TenantId,
        lead_id: LeadId,
        assigned_to: UserId,
        meeting: NewMeeting,
    ) -> StoreResult<Meeting> {
        let row = sqlx::query(
            r#"
            INSERT INTO client_meetings (company_domain, lead_id, assigned_to, meeting_date, meeting_status)
            SELECT $1, $2, $3, $4, $5
            WHERE EXISTS (SELECT 1 FROM leads_info WHERE company_domain = $1 AND lead_id = $2)
            RETURNING meeting_id, company_domain, lead_id, assigned_to, meeting_date, meeting_status, date_added
            "#,
        )
        .bind(tenant_id.as_str())
        .bind(lead_id.get())
        .bind(assigned_to.get())
        .bind(meeting.meeting_date)
        .bind(meeting.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        Ok(meeting_from_row(&row)?)
    }

    async fn list_meetings(&self, tenant_id: &TenantId, lead_id: LeadId) -> StoreResult<Vec<Meeting>> {
        if !self.lead_exists(tenant_id, lead_id).await? {
            return Err(StoreError::NotFound);
        }
        let rows = sqlx::query(
            r#"
            SELECT meeting_id, company_domain, lead_id, assigned_to, meeting_date, meeting_status, date_added
            FROM client_meetings
            WHERE company_domain = $1 AND lead_id = $2
            ORDER BY meeting_id
            "#,
        )
        .bind(tenant_id.as_str())
        .bind(lead_id.get())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(|r| meeting_from_row(r).map_err(StoreError::from)).collect()
    }
}

#[async_trait::async_trait]
impl HrStore for PostgresStore {
    async fn insert_employee(&self, tenant_id: &TenantId, employee: NewEmployee) -> StoreResult<Employee> {
        let sql = format!(
            "INSERT INTO employees_info (company_domain, contact_name, business_phone, personal_phone, \
             business_email, personal_email, gender, is_company_admin) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {EMPLOYEE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(&employee.contact_name)
            .bind(&employee.business_phone)
            .bind(&employee.personal_phone)
            .bind(&employee.business_email)
            .bind(&employee.personal_email)
            .bind(employee.gender.map(Gender::as_str))
            .bind(employee.is_company_admin)
            .fetch_one(&self.pool)
            .await?;
        Ok(employee_from_row(&row)?)
    }

    async fn list_employees(&self, tenant_id: &TenantId) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees_info WHERE company_domain = $1 ORDER BY employee_id"
        );
        let rows = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| employee_from_row(r).map_err(StoreError::from)).collect()
    }

    async fn get_employee(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees_info WHERE company_domain = $1 AND employee_id = $2"
        );
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(employee_from_row).transpose()?)
    }

    async fn update_employee(&self, tenant_id: &TenantId, id: EmployeeId, changes: EmployeeChanges) -> StoreResult<Employee> {
        let sql = format!(
            "UPDATE employees_info SET \
                contact_name = COALESCE($3, contact_name), \
                business_phone = COALESCE($4, business_phone), \
                personal_phone = COALESCE($5, personal_phone), \
                business_email = COALESCE($6, business_email), \
                personal_email = COALESCE($7, personal_email), \
                gender = COALESCE($8, gender), \
                is_company_admin = COALESCE($9, is_company_admin) \
             WHERE company_domain = $1 AND employee_id = $2 \
             RETURNING {EMPLOYEE_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(id.get())
            .bind(&changes.contact_name)
            .bind(&changes.business_phone)
            .bind(&changes.personal_phone)
            .bind(&changes.business_email)
            .bind(&changes.personal_email)
            .bind(changes.gender.map(Gender::as_str))
            .bind(changes.is_company_admin)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(employee_from_row(&row)?)
    }

    async fn delete_employee(&self, tenant_id: &TenantId, id: EmployeeId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM employees_salaries WHERE company_domain = $1 AND employee_id = $2")
            .bind(tenant_id.as_str())
            .bind(id.get())
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM employees_info WHERE company_domain = $1 AND employee_id = $2")
            .bind(tenant_id.as_str())
            .bind(id.get())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_salary(&self, tenant_id: &TenantId, employee_id: EmployeeId, salary: NewSalary) -> StoreResult<Salary> {
        let sql = format!(
            "INSERT INTO employees_salaries (company_domain, employee_id, due_year, due_month, gross_salary, \
             insurance, taxes, net_salary, due_date) \
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9 \
             WHERE EXISTS (SELECT 1 FROM employees_info WHERE company_domain = $1 AND employee_id = $2) \
             RETURNING {SALARY_COLUMNS}"
        );
        let period = salary.period;
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(employee_id.get())
            .bind(period.year)
            .bind(period.month)
            .bind(salary.amounts.gross_salary)
            .bind(salary.amounts.insurance)
            .bind(salary.amounts.taxes)
            .bind(salary.amounts.net_salary)
            .bind(salary.due_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, format!("Salary record already exists for {period}")))?
            .ok_or(StoreError::NotFound)?;
        Ok(salary_from_row(&row)?)
    }

    async fn list_employee_salaries(&self, tenant_id: &TenantId, employee_id: EmployeeId) -> StoreResult<Vec<Salary>> {
        if !self.employee_exists(tenant_id, employee_id).await? {
            return Err(StoreError::NotFound);
        }
        let sql = format!(
            "SELECT {SALARY_COLUMNS} FROM employees_salaries \
             WHERE company_domain = $1 AND employee_id = $2 \
             ORDER BY due_year DESC, due_month DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(employee_id.get())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| salary_from_row(r).map_err(StoreError::from)).collect()
    }

    async fn update_salary(
        &self,
        tenant_id: &TenantId,
        employee_id: EmployeeId,
        period: SalaryPeriod,
        changes: SalaryChanges,
    ) -> StoreResult<Salary> {
        let sql = format!(
            "UPDATE employees_salaries SET \
                gross_salary = COALESCE($5, gross_salary), \
                insurance = COALESCE($6, insurance), \
                taxes = COALESCE($7, taxes), \
                net_salary = COALESCE($8, net_salary), \
                due_date = COALESCE($9, due_date) \
             WHERE company_domain = $1 AND employee_id = $2 AND due_year = $3 AND due_month = $4 \
             RETURNING {SALARY_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .bind(employee_id.get())
            .bind(period.year)
            .bind(period.month)
            .bind(changes.amounts.gross_salary)
            .bind(changes.amounts.insurance)
            .bind(changes.amounts.taxes)
            .bind(changes.amounts.net_salary)
            .bind(changes.due_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(salary_from_row(&row)?)
    }

    async fn delete_salary(&self, tenant_id: &TenantId, employee_id: EmployeeId, period: SalaryPeriod) -> StoreResult<()> {
        let deleted = sqlx::query(
            "DELETE FROM employees_salaries \
             WHERE company_domain = $1 AND employee_id = $2 AND due_year = $3 AND due_month = $4",
        )
        .bind(tenant_id.as_str())
        .bind(employee_id.get())
        .bind(period.year)
        .bind(period.month)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_salaries(&self, tenant_id: &TenantId) -> StoreResult<Vec<Salary>> {
        let sql = format!(
            "SELECT {SALARY_COLUMNS} FROM employees_salaries WHERE company_domain = $1 \
             ORDER BY due_year DESC, due_month DESC, employee_id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(tenant_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|r| salary_from_row(r).map_err(StoreError::from)).collect()
    }
}

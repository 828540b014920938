use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use technia_api::app::services::AppServices;
use technia_api::config::ApiConfig;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, seeded in-memory stores, ephemeral port.
        let services = Arc::new(AppServices::in_memory_demo().expect("failed to seed demo data"));
        let app = technia_api::app::build_app(services, &ApiConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, user: (&str, &str), path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).basic_auth(user.0, Some(user.1))
    }

    fn post(&self, user: (&str, &str), path: &str, body: Value) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(user.0, Some(user.1))
            .json(&body)
    }

    fn put(&self, user: (&str, &str), path: &str, body: Value) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .basic_auth(user.0, Some(user.1))
            .json(&body)
    }

    fn delete(&self, user: (&str, &str), path: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path)).basic_auth(user.0, Some(user.1))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

const ADMIN: (&str, &str) = ("admin", "admin123");
const AMINA: (&str, &str) = ("amina", "amina123");
const OMAR: (&str, &str) = ("omar", "omar123");
const NOUR: (&str, &str) = ("nour", "nour123");
const KARIM: (&str, &str) = ("karim", "karim123");

async fn create_lead(srv: &TestServer, user: (&str, &str), phone: &str) -> Value {
    let res = srv
        .post(user, "/api/real-estate/leads", json!({ "lead_phone": phone, "name": "Test Lead" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn create_employee(srv: &TestServer, user: (&str, &str), name: &str) -> Value {
    let res = srv
        .post(user, "/api/hr/employees", json!({ "contact_name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_and_root_are_public() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/api/auth/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()["www-authenticate"], "Basic");

    let res = srv.get(("admin", "wrong"), "/api/real-estate/leads").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_user_and_wrong_password_look_the_same() {
    let srv = TestServer::spawn().await;

    let wrong_pw: Value = srv.get(("admin", "nope"), "/api/auth/me").send().await.unwrap().json().await.unwrap();
    let unknown: Value = srv.get(("ghost", "nope"), "/api/auth/me").send().await.unwrap().json().await.unwrap();
    assert_eq!(wrong_pw, unknown);
    assert_eq!(wrong_pw["detail"], "Invalid username or password");
}

#[tokio::test]
async fn login_returns_user_without_credential() {
    let srv = TestServer::spawn().await;

    let res = srv
        .client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "username": "amina", "password": "amina123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "amina");
    assert_eq!(body["user"]["company_domain"], "technia.io");
    assert!(body["user"].get("password").is_none());

    let res = srv
        .client
        .post(srv.url("/api/auth/login"))
        .json(&json!({ "username": "amina", "password": "AMINA123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn permissions_are_the_union_of_roles() {
    let srv = TestServer::spawn().await;

    let res = srv.get(AMINA, "/api/auth/permissions").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let salaries = rows
        .iter()
        .find(|r| r["module_id"] == 2 && r["feature_id"] == 2)
        .unwrap();
    assert_eq!(salaries["d_read"], true);
    assert_eq!(salaries["d_write"], false);
    assert_eq!(salaries["d_edit"], false);
    assert_eq!(salaries["d_delete"], true);

    let res = srv.get(NOUR, "/api/auth/permissions").send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn users_listing_is_tenant_scoped() {
    let srv = TestServer::spawn().await;

    let body: Value = srv.get(KARIM, "/api/auth/users").send().await.unwrap().json().await.unwrap();
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "karim");

    let body: Value = srv.get(ADMIN, "/api/auth/users").send().await.unwrap().json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn forbidden_is_reported_before_not_found() {
    let srv = TestServer::spawn().await;

    let res = srv.get(NOUR, "/api/real-estate/leads/999").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv.get(ADMIN, "/api/real-estate/leads/999").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Lead not found");
}

#[tokio::test]
async fn other_tenants_records_are_not_found() {
    let srv = TestServer::spawn().await;

    let lead = create_lead(&srv, ADMIN, "+201000000001").await;
    let id = lead["lead_id"].as_i64().unwrap();

    let res = srv.get(KARIM, &format!("/api/real-estate/leads/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = srv.get(KARIM, "/api/real-estate/leads").send().await.unwrap().json().await.unwrap();
    assert!(body.as_array().unwrap().is_empty());

    // The same phone is free in another tenant.
    create_lead(&srv, KARIM, "+201000000001").await;
}

#[tokio::test]
async fn lead_lifecycle_with_calls_and_meetings() {
    let srv = TestServer::spawn().await;

    let lead = create_lead(&srv, OMAR, "  +201000000002 ").await;
    assert_eq!(lead["lead_phone"], "+201000000002");
    assert_eq!(lead["company_domain"], "technia.io");
    let id = lead["lead_id"].as_i64().unwrap();

    let res = srv
        .post(OMAR, "/api/real-estate/leads", json!({ "lead_phone": "+201000000002" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .put(OMAR, &format!("/api/real-estate/leads/{id}"), json!({ "job_title": "Engineer", "gender": "Male" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["job_title"], "Engineer");
    assert_eq!(updated["name"], "Test Lead");

    let res = srv
        .post(
            OMAR,
            &format!("/api/real-estate/leads/{id}/calls"),
            json!({ "call_date": "2026-03-01T10:00:00Z", "call_status": 2 }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let call: Value = res.json().await.unwrap();
    assert_eq!(call["assigned_to"], 3);

    srv.post(
        OMAR,
        &format!("/api/real-estate/leads/{id}/calls"),
        json!({ "call_date": "2026-03-02T10:00:00Z", "call_status": 42 }),
    )
    .send()
    .await
    .unwrap();

    let calls: Value = srv
        .get(OMAR, &format!("/api/real-estate/leads/{id}/calls"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut names: Vec<&str> = calls
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["call_status_name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Answered", "Unknown"]);

    let res = srv
        .post(
            OMAR,
            &format!("/api/real-estate/leads/{id}/meetings"),
            json!({ "meeting_date": "2026-03-05T12:00:00Z", "meeting_status": 2 }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let meetings: Value = srv
        .get(OMAR, &format!("/api/real-estate/leads/{id}/meetings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(meetings[0]["meeting_status_name"], "Done");

    // Agents cannot delete leads.
    let res = srv.delete(OMAR, &format!("/api/real-estate/leads/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = srv.delete(ADMIN, &format!("/api/real-estate/leads/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Lead deleted successfully");

    let res = srv.get(ADMIN, &format!("/api/real-estate/leads/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = srv.get(ADMIN, &format!("/api/real-estate/leads/{id}/calls")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn child_listings_of_missing_parents_are_not_found() {
    let srv = TestServer::spawn().await;

    for (path, detail) in [
        ("/api/real-estate/leads/999999/calls", "Lead not found"),
        ("/api/real-estate/leads/999999/meetings", "Lead not found"),
        ("/api/hr/employees/999999/salaries", "Employee not found"),
    ] {
        let res = srv.get(ADMIN, path).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["detail"], detail);
    }

    // Without the grant the caller learns nothing about existence.
    let res = srv.get(NOUR, "/api/real-estate/leads/999999/calls").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn child_listings_of_another_tenants_parent_are_not_found() {
    let srv = TestServer::spawn().await;

    let lead = create_lead(&srv, ADMIN, "+201000000009").await;
    let lead_id = lead["lead_id"].as_i64().unwrap();
    let employee = create_employee(&srv, ADMIN, "Samir Fouad").await;
    let employee_id = employee["employee_id"].as_i64().unwrap();

    for path in [
        format!("/api/real-estate/leads/{lead_id}/calls"),
        format!("/api/real-estate/leads/{lead_id}/meetings"),
        format!("/api/hr/employees/{employee_id}/salaries"),
    ] {
        let res = srv.get(ADMIN, &path).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{path}");

        let res = srv.get(KARIM, &path).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn permission_is_checked_before_the_body_is_parsed() {
    let srv = TestServer::spawn().await;

    let malformed = || {
        srv.client
            .post(srv.url("/api/real-estate/leads"))
            .header("content-type", "application/json")
            .body("{not json")
    };

    let res = malformed().basic_auth(NOUR.0, Some(NOUR.1)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = malformed().basic_auth(ADMIN.0, Some(ADMIN.1)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let res = srv
        .put(AMINA, "/api/hr/employees/1/salaries/2025/1", json!({ "taxes": ["wrong", "type"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn lead_validation_errors_are_bad_requests() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(ADMIN, "/api/real-estate/leads", json!({ "lead_phone": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .post(ADMIN, "/api/real-estate/leads", json!({ "lead_phone": "+20100", "gender": "male" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lookups_are_gated_per_feature() {
    let srv = TestServer::spawn().await;

    let res = srv.get(OMAR, "/api/real-estate/lookup/stages").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 3);

    let res = srv.get(OMAR, "/api/real-estate/lookup/call-statuses").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv.get(AMINA, "/api/real-estate/lookup/meeting-statuses").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn employee_and_salary_lifecycle() {
    let srv = TestServer::spawn().await;

    let employee = create_employee(&srv, ADMIN, "Laila Hassan").await;
    let id = employee["employee_id"].as_i64().unwrap();
    assert_eq!(employee["is_company_admin"], false);

    let res = srv
        .post(
            ADMIN,
            &format!("/api/hr/employees/{id}/salaries"),
            json!({ "due_year": 2025, "due_month": 1, "gross_salary": "5000.00", "net_salary": "4200.50" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let salary: Value = res.json().await.unwrap();
    assert_eq!(salary["gross_salary"], "5000.00");

    let res = srv
        .post(
            ADMIN,
            &format!("/api/hr/employees/{id}/salaries"),
            json!({ "due_year": 2025, "due_month": 1 }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    srv.post(
        ADMIN,
        &format!("/api/hr/employees/{id}/salaries"),
        json!({ "due_year": 2025, "due_month": 3 }),
    )
    .send()
    .await
    .unwrap();

    let listed: Value = srv
        .get(ADMIN, &format!("/api/hr/employees/{id}/salaries"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let months: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["due_month"].as_i64().unwrap())
        .collect();
    assert_eq!(months, vec![3, 1]);

    let res = srv
        .put(
            ADMIN,
            &format!("/api/hr/employees/{id}/salaries/2025/1"),
            json!({ "taxes": "300" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["taxes"], "300");
    assert_eq!(updated["gross_salary"], "5000.00");

    let res = srv.delete(ADMIN, &format!("/api/hr/employees/{id}")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Employee and all salary records deleted successfully");

    let all: Value = srv.get(ADMIN, "/api/hr/salaries").send().await.unwrap().json().await.unwrap();
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn salary_validation_rejects_out_of_range_periods() {
    let srv = TestServer::spawn().await;

    let employee = create_employee(&srv, ADMIN, "Youssef Ali").await;
    let id = employee["employee_id"].as_i64().unwrap();

    for body in [
        json!({ "due_year": 2019, "due_month": 5 }),
        json!({ "due_year": 2025, "due_month": 13 }),
        json!({ "due_year": 2025, "due_month": 5, "gross_salary": "-1" }),
    ] {
        let res = srv
            .post(ADMIN, &format!("/api/hr/employees/{id}/salaries"), body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn payroll_viewer_may_delete_but_not_write_salaries() {
    let srv = TestServer::spawn().await;

    let employee = create_employee(&srv, ADMIN, "Mona Fathy").await;
    let id = employee["employee_id"].as_i64().unwrap();
    srv.post(
        ADMIN,
        &format!("/api/hr/employees/{id}/salaries"),
        json!({ "due_year": 2024, "due_month": 12 }),
    )
    .send()
    .await
    .unwrap();

    let res = srv
        .post(
            AMINA,
            &format!("/api/hr/employees/{id}/salaries"),
            json!({ "due_year": 2025, "due_month": 1 }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "You don't have write permission for this resource");

    let res = srv.get(AMINA, "/api/hr/salaries").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .delete(AMINA, &format!("/api/hr/employees/{id}/salaries/2024/12"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = srv
        .delete(AMINA, &format!("/api/hr/employees/{id}/salaries/2024/12"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employee_validation_errors_are_bad_requests() {
    let srv = TestServer::spawn().await;

    let res = srv
        .post(ADMIN, "/api/hr/employees", json!({ "contact_name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .post(
            ADMIN,
            "/api/hr/employees",
            json!({ "contact_name": "Hana", "business_email": "not-an-email" }),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialise a data root with the default institutions and an `admin`
/// account. Returns the admin's user id.
fn init_root(dir: &TempDir) -> String {
    let report = csms_core::init::init(
        dir.path(),
        &csms_core::init::InitOptions {
            commission_name: "Civil Service Commission".into(),
            admin_username: "admin".into(),
            admin_password: "admin123".into(),
        },
    )
    .unwrap();
    report.admin_created.unwrap()
}

async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header("x-user-id", id);
    }
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => axum::body::Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str, user: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, Some(user), None).await
}

async fn post(app: axum::Router, uri: &str, user: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(user), Some(body)).await
}

/// Create a user through the API and return its id.
async fn create_user(dir: &TempDir, admin: &str, username: &str, role: &str, inst: &str) -> String {
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(
        app,
        "/api/users",
        admin,
        json!({
            "name": format!("{username} user"),
            "username": username,
            "password": "secret1",
            "role": role,
            "institution_id": inst,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["id"].as_str().unwrap().to_string()
}

async fn create_employee(dir: &TempDir, actor: &str, zan_id: &str, inst: &str) -> (StatusCode, Value) {
    let app = csms_server::build_router(dir.path().to_path_buf());
    post(
        app,
        "/api/employees",
        actor,
        json!({
            "zan_id": zan_id,
            "name": "Amina Juma",
            "gender": "Female",
            "date_of_birth": "1990-04-12",
            "institution_id": inst,
            "cadre": "Nurse",
            "employment_date": "2020-01-01",
        }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_profile_without_hash() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let app = csms_server::build_router(dir.path().to_path_buf());

    let (status, json) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], admin);
    assert_eq!(json["role"], "ADMIN");
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    let app = csms_server::build_router(dir.path().to_path_buf());

    let (status, json) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "invalid username or password");
}

#[tokio::test]
async fn protected_routes_require_user_header() {
    let dir = TempDir::new().unwrap();
    init_root(&dir);
    let app = csms_server::build_router(dir.path().to_path_buf());

    let (status, json) = send(app, "GET", "/api/institutions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn institutions_are_seeded_and_admin_only_for_writes() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/institutions", &hro).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 41);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, "/api/institutions", &hro, json!({ "name": "Wizara Mpya" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(app, "/api/institutions", &admin, json!({ "name": "Wizara Mpya" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Wizara Mpya");

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, "/api/institutions", &admin, json!({ "name": "wizara mpya" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = send(app, "DELETE", "/api/institutions/inst_1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT, "inst_1 still has a user");
}

#[tokio::test]
async fn duplicate_username_is_409() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        "/api/users",
        &admin,
        json!({
            "name": "Another",
            "username": "hro1",
            "password": "secret1",
            "role": "HRO",
            "institution_id": "inst_1",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn hro_registers_only_own_institution_employees() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;

    let (status, _) = create_employee(&dir, &hro, "Z200", "inst_2").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = create_employee(&dir, &hro, "Z200", "inst_1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "on_probation");

    let (status, _) = create_employee(&dir, &admin, "z200", "inst_1").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/employees/search?zan_id=Z200", &hro).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Amina Juma");

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/employees/search?zan_id=Z999", &hro).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Request workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn confirmation_request_end_to_end() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;
    let hrmo = create_user(&dir, &admin, "hrmo1", "HRMO", "inst_5").await;
    let cscs = create_user(&dir, &admin, "cscs1", "CSCS", "inst_5").await;
    let (_, employee) = create_employee(&dir, &hro, "Z300", "inst_1").await;
    let employee_id = employee["id"].as_str().unwrap().to_string();

    let submission = json!({
        "employee_id": employee_id,
        "details": { "type": "confirmation", "documents": ["appraisal.pdf"] },
        "client_token": "form-1",
    });

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(app, "/api/requests", &hro, submission.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["status_label"], "Pending HRMO Review");
    assert_eq!(json["version"], 1);
    let id = json["id"].as_str().unwrap().to_string();

    // Same client token: the original request comes back.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(app, "/api/requests", &hro, submission).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id);

    // A second open confirmation for the same employee is refused.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        "/api/requests",
        &hro,
        json!({ "employee_id": employee_id, "details": { "type": "confirmation" } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // HRO cannot forward.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/forward"), &hro, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Returning without a reason is rejected.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/return"), &hrmo, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Stale version.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        &format!("/api/requests/{id}/forward"),
        &hrmo,
        json!({ "expected_version": 7 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = send(
        app,
        "POST",
        &format!("/api/requests/{id}/forward"),
        Some(&hrmo),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["stage"], "commission_review");
    assert_eq!(json["version"], 2);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(
        app,
        &format!("/api/requests/{id}/decide"),
        &cscs,
        json!({ "approve": true, "expected_version": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["status_label"], "Approved by Commission");

    // The approval confirmed the employee.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, &format!("/api/employees/{employee_id}"), &hro).await;
    assert_eq!(json["status"], "confirmed");
    assert!(json["confirmation_date"].is_string());

    // Terminal requests accept no further moves.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/forward"), &hrmo, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // The submitter was notified of each change.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, "/api/notifications", &hro).await;
    let items = json["notifications"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(json["unread_count"], 2);
    assert_eq!(
        items[0]["message"],
        "Your Confirmation request for Amina Juma has been updated to: Approved by Commission."
    );

    let first = items[0]["id"].clone();
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = post(app, "/api/notifications/read", &hro, json!({ "ids": [first] })).await;
    assert_eq!(json["updated"], 1);

    // Tracking and reports see the approved request.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, "/api/requests/track?zan_id=z300", &hrmo).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["status"], "Approved by Commission");

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/reports/confirmation", &cscs).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn request_lists_are_scoped_by_role() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;
    let other_hro = create_user(&dir, &admin, "hro2", "HRO", "inst_2").await;
    let hrmo = create_user(&dir, &admin, "hrmo1", "HRMO", "inst_5").await;
    let (_, employee) = create_employee(&dir, &hro, "Z400", "inst_1").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        "/api/requests",
        &hro,
        json!({ "employee_id": employee["id"], "details": { "type": "confirmation" } }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, "/api/requests", &other_hro).await;
    assert!(json.as_array().unwrap().is_empty());

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, "/api/requests?assigned_to_me=true", &hrmo).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    let id = json[0]["id"].as_str().unwrap().to_string();

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, &format!("/api/requests/{id}"), &other_hro).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/requests/does-not-exist", &hrmo).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_action_is_404() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, "/api/requests/abc/approve", &admin, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn returned_request_is_corrected_and_resubmitted() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;
    let hrmo = create_user(&dir, &admin, "hrmo1", "HRMO", "inst_5").await;
    let cscs = create_user(&dir, &admin, "cscs1", "CSCS", "inst_5").await;
    let (_, employee) = create_employee(&dir, &hro, "Z450", "inst_1").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(
        app,
        "/api/requests",
        &hro,
        json!({
            "employee_id": employee["id"],
            "details": { "type": "cadre_change", "new_cadre": "Clerk" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    let id = json["id"].as_str().unwrap().to_string();

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(
        app,
        &format!("/api/requests/{id}/return"),
        &hrmo,
        json!({ "reason": "Wrong cadre" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["status_label"], "Rejected by HRMO - Awaiting HRO Correction");

    // Only the institution's HRO corrects a returned request.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/resubmit"), &hrmo, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        &format!("/api/requests/{id}/resubmit"),
        &hro,
        json!({ "details": { "type": "confirmation" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(
        app,
        &format!("/api/requests/{id}/resubmit"),
        &hro,
        json!({
            "details": { "type": "cadre_change", "new_cadre": "Accountant" },
            "reason": "Cadre corrected",
            "expected_version": 2,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["status_label"], "Pending HRMO Review");
    assert_eq!(json["version"], 3);
    assert_eq!(json["details"]["new_cadre"], "Accountant");
    let history = json["history"].as_array().unwrap();
    assert_eq!(history.last().unwrap()["reason"], "Cadre corrected");

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/forward"), &hrmo, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    // Rejection needs a reason.
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        &format!("/api/requests/{id}/decide"),
        &cscs,
        json!({ "approve": false }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/decide"), &cscs, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = post(
        app,
        &format!("/api/requests/{id}/decide"),
        &cscs,
        json!({ "approve": false, "reason": "Qualifications not verified" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["status_label"], "Rejected by Commission");

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/approve"), &cscs, json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submitter_withdraws_before_forwarding() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;
    let hrmo = create_user(&dir, &admin, "hrmo1", "HRMO", "inst_5").await;
    let (_, employee) = create_employee(&dir, &hro, "Z460", "inst_1").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = post(
        app,
        "/api/requests",
        &hro,
        json!({ "employee_id": employee["id"], "details": { "type": "confirmation" } }),
    )
    .await;
    let id = json["id"].as_str().unwrap().to_string();

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/withdraw"), &hrmo, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = send(
        app,
        "POST",
        &format!("/api/requests/{id}/withdraw"),
        Some(&hro),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["status_label"], "Withdrawn by Submitter");

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(app, &format!("/api/requests/{id}/withdraw"), &hro, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn approval_after_dismissal_is_refused() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;
    let hrmo = create_user(&dir, &admin, "hrmo1", "HRMO", "inst_5").await;
    let do_officer = create_user(&dir, &admin, "do_officer", "DO", "inst_5").await;
    let cscs = create_user(&dir, &admin, "cscs1", "CSCS", "inst_5").await;
    let (_, employee) = create_employee(&dir, &hro, "Z470", "inst_1").await;
    let employee_id = employee["id"].as_str().unwrap().to_string();

    let mut ids = Vec::new();
    for details in [
        json!({ "type": "dismissal", "reason": "Repeated absence during probation" }),
        json!({ "type": "confirmation" }),
    ] {
        let app = csms_server::build_router(dir.path().to_path_buf());
        let (status, json) = post(
            app,
            "/api/requests",
            &hro,
            json!({ "employee_id": employee_id, "details": details }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        ids.push(json["id"].as_str().unwrap().to_string());
    }
    let (dismissal, confirmation) = (&ids[0], &ids[1]);

    for (id, reviewer) in [(dismissal, &do_officer), (confirmation, &hrmo)] {
        let app = csms_server::build_router(dir.path().to_path_buf());
        let (status, _) = post(app, &format!("/api/requests/{id}/forward"), reviewer, json!({})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        &format!("/api/requests/{dismissal}/decide"),
        &cscs,
        json!({ "approve": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = post(
        app,
        &format!("/api/requests/{confirmation}/decide"),
        &cscs,
        json!({ "approve": true }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (_, json) = get(app, &format!("/api/employees/{employee_id}"), &hro).await;
    assert_eq!(json["status"], "dismissed");
}

// ---------------------------------------------------------------------------
// Dashboard, reports, config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_summary_for_hro() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;
    create_employee(&dir, &hro, "Z500", "inst_1").await;
    create_employee(&dir, &admin, "Z501", "inst_2").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/dashboard/summary", &hro).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"]["total_employees"], 1);
    assert_eq!(json["stats"]["pending_confirmations"], 0);
    // Employed since 2020 and still on probation.
    assert_eq!(json["stats"]["urgent_actions"], 1);
    assert!(json["recent_activities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reports_validate_kind_and_role() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let hro = create_user(&dir, &admin, "hro1", "HRO", "inst_1").await;

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/reports/payroll", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/reports/contractual", &hro).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/reports/request_status", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["kind"], "request-status");
}

#[tokio::test]
async fn config_is_readable_by_any_user() {
    let dir = TempDir::new().unwrap();
    let admin = init_root(&dir);
    let app = csms_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/config", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["commission"]["name"], "Civil Service Commission");
    assert_eq!(json["server"]["port"], 8080);
}

//! # Integration Tests for relief-api
//!
//! Drives the assembled router end to end on the in-memory backend:
//! volunteer and crisis CRUD, daily totals, spreadsheet exports and their
//! temporary files, the admin gate, health probes and the OpenAPI document.

use std::io::Cursor;
use std::path::Path;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use calamine::{Data, Reader, Xlsx};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use relief_core::{Donation, Expense};
use serde_json::{json, Value};
use tower::ServiceExt;

use relief_api::state::{AppConfig, AppState};

const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Helper: state with auth disabled and exports under `reports_dir`.
fn test_state(reports_dir: &Path) -> AppState {
    AppState::with_config(AppConfig {
        reports_dir: reports_dir.to_path_buf(),
        ..AppConfig::default()
    })
}

/// Helper: build the test app with auth enabled.
fn test_app_with_auth(token: &str) -> axum::Router {
    let config = AppConfig {
        auth_token: Some(token.to_string()),
        ..AppConfig::default()
    };
    relief_api::app(AppState::with_config(config))
}

async fn send(app: &axum::Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

/// Helper: rows of the single `Report` worksheet in an xlsx payload.
fn workbook_rows(bytes: Vec<u8>) -> Vec<Vec<Data>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), ["Report"]);
    let range = workbook.worksheet_range("Report").unwrap();
    range.rows().map(<[Data]>::to_vec).collect()
}

// -- Health Probes & Docs -----------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app_with_auth("s3cret");
    let response = send(&app, get("/health/liveness")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn test_readiness_probe_without_database() {
    let app = test_app_with_auth("s3cret");
    let response = send(&app, get("/health/readiness")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ready");
}

#[tokio::test]
async fn test_openapi_is_public() {
    let app = test_app_with_auth("s3cret");
    let response = send(&app, get("/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/reports/excel"].is_object());
}

// -- Volunteers ---------------------------------------------------------------

#[tokio::test]
async fn test_volunteer_crud_flow() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));

    let response = send(&app, get("/volunteers")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = send(
        &app,
        with_json(
            "POST",
            "/volunteers",
            json!({ "name": "Ada", "age": 34, "mobile": "+15550100" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["name"], "Ada");
    assert_eq!(created["age"], 34);
    assert_eq!(created["mobile"], "+15550100");
    let id = created["id"].as_str().unwrap().to_string();

    let listed = body_json(send(&app, get("/volunteers")).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    let response = send(
        &app,
        with_json(
            "PUT",
            &format!("/volunteers/{id}"),
            json!({ "assignedTask": "Water distribution" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["assignedTask"], "Water distribution");
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["age"], 34);

    let response = send(&app, delete(&format!("/volunteers/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Volunteer deleted" })
    );

    let listed = body_json(send(&app, get("/volunteers")).await).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_null_assigned_task_clears_assignment() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));

    let created = body_json(
        send(
            &app,
            with_json(
                "POST",
                "/volunteers",
                json!({
                    "name": "Chen",
                    "age": 41,
                    "mobile": "+15550102",
                    "assignedTask": "Triage"
                }),
            ),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/volunteers/{id}");

    // An absent key leaves the assignment alone.
    let response = send(&app, with_json("PUT", &uri, json!({ "age": 42 }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["assignedTask"], "Triage");
    assert_eq!(updated["age"], 42);

    let response = send(&app, with_json("PUT", &uri, json!({ "assignedTask": null }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["assignedTask"], Value::Null);
    assert_eq!(updated["name"], "Chen");

    let listed = body_json(send(&app, get("/volunteers")).await).await;
    assert_eq!(listed[0]["assignedTask"], Value::Null);
}

#[tokio::test]
async fn test_delete_unknown_volunteer_is_404_and_leaves_collection() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path());
    let app = relief_api::app(state.clone());

    send(
        &app,
        with_json(
            "POST",
            "/volunteers",
            json!({ "name": "Bola", "age": 27, "mobile": "+15550101" }),
        ),
    )
    .await;

    let unknown = uuid::Uuid::new_v4();
    let response = send(&app, delete(&format!("/volunteers/{unknown}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Volunteer not found" })
    );
    assert_eq!(state.volunteers.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_unknown_volunteer_is_404() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));

    let unknown = uuid::Uuid::new_v4();
    let response = send(
        &app,
        with_json("PUT", &format!("/volunteers/{unknown}"), json!({ "age": 40 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_volunteer_id_is_404() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));

    let response = send(&app, delete("/volunteers/65a1f0c2e4b0a1b2c3d4e5f6")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Volunteer not found");
}

#[tokio::test]
async fn test_unknown_ids_name_their_collection() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));
    let unknown = uuid::Uuid::new_v4();

    for (collection, label) in [("volunteers", "Volunteer"), ("crises", "Crisis")] {
        for id in [unknown.to_string(), "not-a-uuid".to_string()] {
            let uri = format!("/{collection}/{id}");

            let response = send(&app, with_json("PUT", &uri, json!({}))).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "PUT {uri}");
            assert_eq!(
                body_json(response).await,
                json!({ "message": format!("{label} not found") })
            );

            let response = send(&app, delete(&uri)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "DELETE {uri}");
            assert_eq!(
                body_json(response).await,
                json!({ "message": format!("{label} not found") })
            );
        }
    }
}

#[tokio::test]
async fn test_invalid_volunteer_payload_is_500_and_not_stored() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path());
    let app = relief_api::app(state.clone());

    let response = send(
        &app,
        with_json("POST", "/volunteers", json!({ "name": "Ada", "age": 30 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["message"].is_string());

    let response = send(
        &app,
        with_json(
            "POST",
            "/volunteers",
            json!({ "name": "", "age": 30, "mobile": "+15550100" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "name must not be empty"
    );

    assert!(state.volunteers.list().await.unwrap().is_empty());
}

// -- Crises -------------------------------------------------------------------

#[tokio::test]
async fn test_crisis_crud_flow() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));

    let response = send(
        &app,
        with_json(
            "POST",
            "/crises",
            json!({
                "title": "River flood",
                "description": "Levee breach north of town",
                "severity": "high",
                "location": "Riverside"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        with_json("PUT", &format!("/crises/{id}"), json!({ "severity": "critical" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["severity"], "critical");
    assert_eq!(updated["title"], "River flood");

    let response = send(&app, delete(&format!("/crises/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": "Crisis deleted" }));

    let response = send(&app, delete(&format!("/crises/{id}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "message": "Crisis not found" }));
}

// -- Reports ------------------------------------------------------------------

#[tokio::test]
async fn test_daily_totals() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path());
    let day = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap();

    for (date, amount, donor) in [(day(1, 8), 10.0, "A"), (day(1, 19), 5.0, "B"), (day(2, 12), 3.0, "C")] {
        state
            .donations
            .insert(Donation::new(date, amount, donor))
            .await
            .unwrap();
    }
    state
        .expenses
        .insert(Expense::new(day(2, 9), 7.5, "Blankets"))
        .await
        .unwrap();

    let app = relief_api::app(state);
    let response = send(&app, get("/reports")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let report = body_json(response).await;
    let donations = report["donations"].as_array().unwrap();
    assert_eq!(donations.len(), 2);
    let total_on = |day: &str| {
        donations
            .iter()
            .find(|entry| entry["day"] == day)
            .map(|entry| entry["totalAmount"].as_f64().unwrap())
    };
    assert_eq!(total_on("2024-01-01"), Some(15.0));
    assert_eq!(total_on("2024-01-02"), Some(3.0));
    assert_eq!(
        report["expenses"],
        json!([{ "day": "2024-01-02", "totalAmount": 7.5 }])
    );
}

#[tokio::test]
async fn test_daily_totals_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let app = relief_api::app(test_state(tmp.path()));
    let report = body_json(send(&app, get("/reports")).await).await;
    assert_eq!(report, json!({ "donations": [], "expenses": [] }));
}

#[tokio::test]
async fn test_volunteer_export_is_attachment_and_file_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = tmp.path().join("reports");
    let state = test_state(&reports);
    let app = relief_api::app(state.clone());

    for (name, task) in [("Ada", Some("Shelter intake")), ("Bola", None)] {
        let mut body = json!({ "name": name, "age": 30, "mobile": "+15550100" });
        if let Some(task) = task {
            body["assignedTask"] = json!(task);
        }
        let response = send(&app, with_json("POST", "/volunteers", body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, get("/reports/excel?type=volunteer")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX);

    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"report_"));
    assert!(disposition.ends_with(".volunteer.xlsx\""));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"PK"), "xlsx payload is a zip archive");

    let rows = workbook_rows(bytes);
    assert_eq!(
        rows[0],
        [
            Data::String("Name".to_string()),
            Data::String("Age".to_string()),
            Data::String("Mobile".to_string()),
            Data::String("Assigned Task".to_string()),
        ]
    );
    assert_eq!(rows.len() - 1, 2, "one data row per volunteer");
    assert_eq!(rows[1][0], Data::String("Ada".to_string()));
    assert_eq!(rows[1][3], Data::String("Shelter intake".to_string()));
    assert_eq!(rows[2][0], Data::String("Bola".to_string()));
    assert_eq!(rows[2][3], Data::Empty);

    assert!(reports.is_dir(), "reports directory is created on demand");
    assert_eq!(dir_entries(&reports), 0, "export file must be deleted");
}

#[tokio::test]
async fn test_every_export_kind_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path());
    state
        .donations
        .insert(Donation::new(Utc::now(), 20.0, "Ada"))
        .await
        .unwrap();
    state
        .expenses
        .insert(Expense::new(Utc::now(), 4.0, "Fuel"))
        .await
        .unwrap();
    let app = relief_api::app(state);

    for kind in ["donation", "expense", "volunteer", "crisis"] {
        let response = send(&app, get(&format!("/reports/excel?type={kind}"))).await;
        assert_eq!(response.status(), StatusCode::OK, "export {kind}");
        let bytes = body_bytes(response).await;
        assert!(bytes.starts_with(b"PK"));
    }
    assert_eq!(dir_entries(tmp.path()), 0);
}

#[tokio::test]
async fn test_donation_export_writes_day_dates() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(tmp.path());
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 18, 5, 0).unwrap();
    state
        .donations
        .insert(Donation::new(date, 10.0, "A"))
        .await
        .unwrap();
    let app = relief_api::app(state);

    let response = send(&app, get("/reports/excel?type=donation")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = workbook_rows(body_bytes(response).await);
    assert_eq!(
        rows,
        [
            vec![
                Data::String("Date".to_string()),
                Data::String("Amount".to_string()),
                Data::String("Donor".to_string()),
            ],
            vec![
                Data::String("2024-01-01".to_string()),
                Data::Float(10.0),
                Data::String("A".to_string()),
            ],
        ]
    );
}

#[tokio::test]
async fn test_unknown_export_type_is_400_without_side_effects() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = tmp.path().join("reports");
    let app = relief_api::app(test_state(&reports));

    for uri in ["/reports/excel?type=unknown", "/reports/excel", "/reports/excel?type=Volunteer"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Invalid report type" })
        );
    }
    assert!(!reports.exists(), "no directory for rejected exports");
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_missing_token_is_401() {
    let app = test_app_with_auth("s3cret");
    let response = send(&app, get("/volunteers")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn test_wrong_token_is_401() {
    let app = test_app_with_auth("s3cret");
    let request = Request::builder()
        .uri("/reports")
        .header("Authorization", "Bearer not-it")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_role_is_403() {
    let app = test_app_with_auth("s3cret");
    let request = Request::builder()
        .uri("/crises")
        .header("Authorization", "Bearer coordinator:field-lead:s3cret")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_token_reaches_handler() {
    let app = test_app_with_auth("s3cret");
    for token in ["s3cret", "admin:ops:s3cret"] {
        let request = Request::builder()
            .uri("/volunteers")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }
}

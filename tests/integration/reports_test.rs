//! Report review workflow through the composed application

use axum::http::{header, StatusCode};
use reportdesk_reports::ReportStatus;
use serde_json::json;

use crate::common::TestApp;

mod common;

#[tokio::test]
async fn test_review_workflow() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    // Pending queue
    let list = app.get("/api/reports?status=PENDING", Some(&cookie)).await;
    assert_eq!(list.status, StatusCode::OK);
    let body = list.json();
    assert_eq!(body["reports"].as_array().unwrap().len(), 1);
    let id = body["reports"][0]["_id"].as_str().unwrap().to_string();

    // Classify and mark for training
    let saved = app
        .send_json(
            "PATCH",
            &format!("/api/reports/{}", id),
            &cookie,
            json!({
                "errorCategory": "HALLUCINATION",
                "severity": "HIGH",
                "expectedResponse": "The capital of Australia is Canberra.",
                "useForTraining": true
            }),
        )
        .await;
    assert_eq!(saved.status, StatusCode::OK);

    // Resolve
    let resolved = app
        .send_json(
            "PATCH",
            &format!("/api/reports/{}/status", id),
            &cookie,
            json!({ "status": "RESOLVED" }),
        )
        .await;
    assert_eq!(resolved.status, StatusCode::OK);
    assert_eq!(
        app.reports.report(&id).map(|r| r.status),
        Some(ReportStatus::Resolved)
    );

    // Pending queue is now empty but counts still cover everything
    let list = app.get("/api/reports?status=PENDING", Some(&cookie)).await;
    let body = list.json();
    assert!(body["reports"].as_array().unwrap().is_empty());
    assert_eq!(body["counts"]["total"], 3);
    assert_eq!(body["counts"]["resolved"], 2);

    // Both resolved sample reports are now training examples
    let export = app
        .get("/api/training/export?format=json", Some(&cookie))
        .await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(export.headers[header::CONTENT_TYPE], "application/json");
    let records = export.json();
    assert_eq!(records.as_array().unwrap().len(), 2);
    assert!(records
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["expectedResponse"] == "The capital of Australia is Canberra."));
}

#[tokio::test]
async fn test_search_and_sort() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let response = app.get("/api/reports?q=FRENCH", Some(&cookie)).await;
    let body = response.json();
    assert_eq!(body["reports"].as_array().unwrap().len(), 1);
    assert_eq!(body["reports"][0]["_id"], "demo-3");

    let response = app
        .get("/api/reports?sortBy=date&order=asc", Some(&cookie))
        .await;
    let ids: Vec<String> = response.json()["reports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["demo-3", "demo-2", "demo-1"]);
}

#[tokio::test]
async fn test_same_status_is_conflict() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let response = app
        .send_json(
            "PATCH",
            "/api/reports/demo-3/status",
            &cookie,
            json!({ "status": "DISMISSED" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_prompt_generation() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let response = app
        .send_json(
            "POST",
            "/api/reports/demo-3/prompt",
            &cookie,
            json!({ "category": "LANGUAGE_ISSUE", "severity": "LOW" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let prompt = response.json()["prompt"].as_str().unwrap().to_string();
    assert!(prompt.contains("--- USER MESSAGE ---\nTranslate 'good morning' to Spanish"));
    assert!(prompt.contains("Category: LANGUAGE_ISSUE\nSeverity: LOW"));
    assert!(prompt.contains("--- EXPECTED IDEAL RESPONSE ---\n\n"));
}

#[tokio::test]
async fn test_insights_reflect_reports() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let response = app.get("/api/insights", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json();
    assert_eq!(body["pendingCount"], 1);
    // Tie between the two classified reports goes to the earlier category
    assert_eq!(body["topCategory"], "VERY GENERIC");
    assert_eq!(body["statusDistribution"]["dismissed"], 1);
    assert_eq!(body["categoryDistribution"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_viewer_cannot_reach_reports_api() {
    let app = TestApp::new();
    let cookie = app.viewer_cookie();

    for path in ["/api/reports", "/api/insights", "/api/training"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(
            response.location(),
            Some("http://localhost:3001/unauthorized")
        );
    }
}

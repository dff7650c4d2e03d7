//! Authorization gate behaviour on the composed application

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use reportdesk_auth::provider::mock::MOCK_ADMIN_TOKEN;
use serde_json::json;

use crate::common::{sign_in_location, TestApp, BASE_URL};

mod common;

#[tokio::test]
async fn test_public_routes_skip_the_gate() {
    let app = TestApp::new();

    let landing = app.get("/", None).await;
    assert_eq!(landing.status, StatusCode::OK);
    assert!(landing.text().contains("Sign in to access the dashboard"));

    let denied = app.get("/unauthorized", None).await;
    assert_eq!(denied.status, StatusCode::OK);
    assert!(denied.text().contains("Access Denied"));

    let user = app.get("/api/auth/user", None).await;
    assert_eq!(user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(user.json(), json!({ "error": "Not authenticated" }));

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.text(), "OK");
}

#[tokio::test]
async fn test_no_session_redirects_to_sign_in_with_return_path() {
    let app = TestApp::new();

    for path in ["/reports", "/reports/demo-1", "/insights", "/api/reports"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.location(), Some(sign_in_location(path).as_str()));
    }

    let response = app.get("/reports", None).await;
    assert_eq!(
        response.location(),
        Some("http://localhost:3001/api/auth/sign-in?redirectTo=%2Freports")
    );
}

#[tokio::test]
async fn test_non_admin_is_sent_to_unauthorized() {
    let app = TestApp::new();
    let cookie = app.viewer_cookie();

    let response = app.get("/reports", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("{}/unauthorized", BASE_URL).as_str())
    );
}

#[tokio::test]
async fn test_admin_with_extra_roles_is_allowed() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let page = app.get("/reports", Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("Ada Admin"));

    let detail = app.get("/reports/demo-1", Some(&cookie)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.text().contains("/api/reports/demo-1"));

    let insights = app.get("/insights", Some(&cookie)).await;
    assert_eq!(insights.status, StatusCode::OK);
}

#[tokio::test]
async fn test_landing_sends_admin_to_reports() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let response = app.get("/", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/reports"));

    let viewer = app.viewer_cookie();
    let response = app.get("/", Some(&viewer)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("You do not have access"));
}

#[tokio::test]
async fn test_tampered_session_fails_closed() {
    let app = TestApp::new();
    let mut cookie = app.admin_cookie();
    cookie.push_str("tampered");

    let response = app.get("/insights", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(sign_in_location("/insights").as_str())
    );
}

#[tokio::test]
async fn test_bearer_session_and_provider_outage() {
    let app = TestApp::new();
    let request = || {
        Request::get("/api/reports")
            .header(header::AUTHORIZATION, format!("Bearer {}", MOCK_ADMIN_TOKEN))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.send(request()).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["counts"]["total"], 3);

    app.identity.set_unavailable(true);
    let response = app.send(request()).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(sign_in_location("/api/reports").as_str())
    );
}

#[tokio::test]
async fn test_unknown_path_is_gated_then_not_found() {
    let app = TestApp::new();

    let response = app.get("/does-not-exist", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let cookie = app.admin_cookie();
    let response = app.get("/does-not-exist", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.text().contains("404"));
}

#[tokio::test]
async fn test_preflight_and_static_assets_bypass_the_gate() {
    let app = TestApp::new();

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/reports")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.send(preflight).await;
    assert_ne!(response.status, StatusCode::SEE_OTHER);

    let response = app.get("/assets/logo.svg", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_asset_like_page_path_still_requires_admin() {
    let app = TestApp::new();

    let response = app.get("/reports/chart.png", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(sign_in_location("/reports/chart.png").as_str())
    );

    let response = app.get("/reports/chart.png", Some(&app.viewer_cookie())).await;
    assert_eq!(
        response.location(),
        Some(format!("{}/unauthorized", BASE_URL).as_str())
    );

    let response = app.get("/reports/chart.png", Some(&app.admin_cookie())).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("Ada Admin"));
}

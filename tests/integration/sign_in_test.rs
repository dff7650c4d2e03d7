//! Sign-in, callback, session introspection and sign-out through the
//! composed application with the mock identity provider

use axum::http::StatusCode;
use reportdesk_auth::{SESSION_COOKIE, SIGN_IN_COOKIE};
use url::Url;

use crate::common::{TestApp, TestResponse, BASE_URL};

mod common;

/// `state` query parameter of a provider redirect
fn state_param(response: &TestResponse) -> String {
    let location = Url::parse(response.location().unwrap()).unwrap();
    location
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

async fn start(app: &TestApp, redirect_to: &str) -> (String, String) {
    let response = app
        .get(&format!("/api/auth/sign-in?redirectTo={}", redirect_to), None)
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response
        .location()
        .unwrap()
        .starts_with("http://localhost:3001/api/auth/callback?code=mock-code&state="));

    let sign_in_cookie = response.cookie(SIGN_IN_COOKIE).unwrap();
    (state_param(&response), sign_in_cookie)
}

#[tokio::test]
async fn test_full_sign_in_flow() {
    let app = TestApp::new();
    let (state, sign_in_cookie) = start(&app, "%2Finsights").await;

    let callback = app
        .get(
            &format!("/api/auth/callback?code=mock-code&state={}", state),
            Some(&sign_in_cookie),
        )
        .await;
    assert_eq!(callback.status, StatusCode::SEE_OTHER);
    assert_eq!(
        callback.location(),
        Some(format!("{}/reports", BASE_URL).as_str())
    );

    let session_header = callback.set_cookie_header(SESSION_COOKIE).unwrap();
    assert!(session_header.contains("HttpOnly"));
    assert!(session_header.contains("SameSite=Lax"));
    assert!(callback
        .set_cookie_header(SIGN_IN_COOKIE)
        .unwrap()
        .contains("Max-Age=0"));

    let session = callback.cookie(SESSION_COOKIE).unwrap();
    let user = app.get("/api/auth/user", Some(&session)).await;
    assert_eq!(user.status, StatusCode::OK);
    let body = user.json();
    assert_eq!(body["sub"], "mock-admin");
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["roles"], serde_json::json!(["admin"]));

    let page = app.get("/reports", Some(&session)).await;
    assert_eq!(page.status, StatusCode::OK);
}

#[tokio::test]
async fn test_auth_entry_returns_to_remembered_path() {
    let app = TestApp::new();
    let (state, sign_in_cookie) = start(&app, "%2Finsights").await;

    let response = app
        .get(
            &format!("/api/auth?code=mock-code&state={}", state),
            Some(&sign_in_cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("{}/insights", BASE_URL).as_str())
    );
    assert!(response.cookie(SESSION_COOKIE).is_some());
}

#[tokio::test]
async fn test_unsafe_return_path_falls_back_to_reports() {
    let app = TestApp::new();
    let (state, sign_in_cookie) = start(&app, "%2F%2Fevil.example.com").await;

    let response = app
        .get(
            &format!("/api/auth?code=mock-code&state={}", state),
            Some(&sign_in_cookie),
        )
        .await;
    assert_eq!(
        response.location(),
        Some(format!("{}/reports", BASE_URL).as_str())
    );
}

#[tokio::test]
async fn test_auth_entry_without_code_starts_sign_in() {
    let app = TestApp::new();
    let response = app.get("/api/auth", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert!(response.cookie(SIGN_IN_COOKIE).is_some());
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch_and_missing_cookie() {
    let app = TestApp::new();
    let (_, sign_in_cookie) = start(&app, "%2Freports").await;

    let response = app
        .get(
            "/api/auth/callback?code=mock-code&state=forged",
            Some(&sign_in_cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["code"], "INVALID_SIGN_IN_STATE");

    let response = app
        .get("/api/auth/callback?code=mock-code&state=anything", None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_with_provider_error() {
    let app = TestApp::new();
    let (state, sign_in_cookie) = start(&app, "%2Freports").await;

    let response = app
        .get(
            &format!("/api/auth/callback?code=unknown-code&state={}", state),
            Some(&sign_in_cookie),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["error"]["code"], "IDENTITY_PROVIDER_ERROR");
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let app = TestApp::new();
    let cookie = app.admin_cookie();

    let response = app.get("/api/auth/sign-out", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some(format!("{}/", BASE_URL).as_str()));
    assert!(response
        .set_cookie_header(SESSION_COOKIE)
        .unwrap()
        .contains("Max-Age=0"));
}

#[tokio::test]
async fn test_user_endpoint_roles_from_custom_data() {
    let app = TestApp::new();
    let cookie = app.viewer_cookie();

    let response = app.get("/api/auth/user", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["roles"], serde_json::json!(["viewer"]));
}

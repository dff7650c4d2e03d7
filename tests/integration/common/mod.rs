//! Common test utilities and fixtures for integration tests
//!
//! Builds the composed dashboard against in-memory collaborators:
//! - Mock identity provider with a demo admin and ad-hoc users
//! - Mock reports service with sample reports
//! - Session cookie minting and request helpers

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use reportdesk_auth::provider::mock::MockIdentityProvider;
use reportdesk_auth::{AuthBackend, AuthConfig, Claims, SESSION_COOKIE, SIGN_IN_COOKIE};
use reportdesk_reports::client::mock::MockReportsService;
use reportdesk_reports::ReportsState;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const BASE_URL: &str = "http://localhost:3001";

/// Composed application plus handles on its collaborators
pub struct TestApp {
    pub app: Router,
    pub backend: AuthBackend,
    pub identity: MockIdentityProvider,
    pub reports: MockReportsService,
}

/// Collected response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` pair of a Set-Cookie header, if one was set
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", name)))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    /// Full Set-Cookie header for `name`
    pub fn set_cookie_header(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", name)))
            .map(str::to_string)
    }
}

impl TestApp {
    pub fn new() -> Self {
        let identity = MockIdentityProvider::with_demo_admin();
        let backend = AuthBackend::new(
            AuthConfig {
                base_url: BASE_URL.to_string(),
                session_secret: "integration-test-secret".to_string(),
                session_ttl_secs: 3600,
                cookie_secure: false,
            },
            Arc::new(identity.clone()),
        );
        let reports = MockReportsService::with_sample_data();
        let app = reportdesk_app::compose(
            backend.clone(),
            ReportsState {
                reports: Arc::new(reports.clone()),
                auth: backend.clone(),
            },
        );

        Self {
            app,
            backend,
            identity,
            reports,
        }
    }

    /// Session cookie pair for arbitrary claims
    pub fn session_cookie(&self, claims: Value) -> String {
        let token = self
            .backend
            .codec()
            .issue_session(Claims::from_value(claims).unwrap())
            .unwrap();
        format!("{}={}", SESSION_COOKIE, token)
    }

    pub fn admin_cookie(&self) -> String {
        self.session_cookie(json!({
            "sub": "admin_1",
            "name": "Ada Admin",
            "roles": ["admin", "editor"]
        }))
    }

    pub fn viewer_cookie(&self) -> String {
        self.session_cookie(json!({
            "sub": "viewer_1",
            "customData": { "roles": ["viewer"] }
        }))
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        cookie: &str,
        body: Value,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

/// Expected sign-in redirect for a return path
pub fn sign_in_location(return_path: &str) -> String {
    format!("{}{}", BASE_URL, reportdesk_auth::sign_in_path(return_path))
}

/// Name of the sign-in state cookie
pub fn sign_in_cookie_name() -> &'static str {
    SIGN_IN_COOKIE
}

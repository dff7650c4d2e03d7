//! Client-side mirror gate against a live dashboard listener

use std::sync::Arc;

use reportdesk_auth::mirror::HttpUserSource;
use reportdesk_auth::{MirrorGate, MirrorView, Navigation};
use tokio::net::TcpListener;

use crate::common::TestApp;

mod common;

/// Serve the composed app on an ephemeral port and return its base URL
async fn serve(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.app.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_admin_renders() {
    let app = TestApp::new();
    let base_url = serve(&app).await;

    let source = HttpUserSource::new(&base_url)
        .unwrap()
        .with_cookie(app.admin_cookie());
    let mut handle = MirrorGate::spawn(Arc::new(source), "/reports");

    match handle.settled().await {
        Some(MirrorView::Render(user)) => {
            assert_eq!(user.sub.as_deref(), Some("admin_1"));
            assert_eq!(user.roles, vec!["admin", "editor"]);
        }
        other => panic!("Expected render, got {:?}", other),
    }
    assert!(handle.snapshot().is_admin);
}

#[tokio::test]
async fn test_signed_out_navigates_to_sign_in() {
    let app = TestApp::new();
    let base_url = serve(&app).await;

    let source = HttpUserSource::new(&base_url).unwrap();
    let mut handle = MirrorGate::spawn(Arc::new(source), "/insights");

    let view = handle.settled().await.unwrap();
    assert_eq!(
        view,
        MirrorView::Navigate(Navigation::SignIn {
            redirect_to: "/insights".to_string()
        })
    );
    if let MirrorView::Navigate(nav) = view {
        assert_eq!(nav.href(), "/api/auth/sign-in?redirectTo=%2Finsights");
    }
}

#[tokio::test]
async fn test_viewer_navigates_to_unauthorized() {
    let app = TestApp::new();
    let base_url = serve(&app).await;

    let source = HttpUserSource::new(&base_url)
        .unwrap()
        .with_cookie(app.viewer_cookie());
    let mut handle = MirrorGate::spawn(Arc::new(source), "/reports");

    assert_eq!(
        handle.settled().await,
        Some(MirrorView::Navigate(Navigation::Unauthorized))
    );
    let snapshot = handle.snapshot();
    assert!(snapshot.is_authenticated && !snapshot.is_admin);
}

#[tokio::test]
async fn test_unreachable_server_fails_closed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpUserSource::new(&format!("http://{}", addr)).unwrap();
    let mut handle = MirrorGate::spawn(Arc::new(source), "/reports");

    assert_eq!(
        handle.settled().await,
        Some(MirrorView::Navigate(Navigation::SignIn {
            redirect_to: "/reports".to_string()
        }))
    );
}

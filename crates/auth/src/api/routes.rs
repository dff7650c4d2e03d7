//! Route definitions for the sign-in flow

use axum::{routing::get, Router};

use super::handlers;
use crate::backend::AuthBackend;

/// Create all auth routes
pub fn routes() -> Router<AuthBackend> {
    Router::new()
        .route("/api/auth", get(handlers::auth_entry))
        .route("/api/auth/sign-in", get(handlers::sign_in))
        .route("/api/auth/callback", get(handlers::callback))
        .route("/api/auth/sign-out", get(handlers::sign_out))
        .route("/api/auth/user", get(handlers::current_user))
}

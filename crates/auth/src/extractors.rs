//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;

/// Authenticated user extractor (session cookie or bearer token).
///
/// Reuses the context the gate middleware resolved when present.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_context = match parts.extensions.get::<AuthContext>() {
            Some(ctx) if ctx.is_authenticated => ctx.clone(),
            _ => {
                let backend = AuthBackend::from_ref(state);
                backend.resolve(&parts.headers).await?
            }
        };

        if !auth_context.is_authenticated {
            return Err(AuthError::NotAuthenticated);
        }

        Ok(AuthUser(auth_context))
    }
}

/// Admin user extractor.
///
/// Like `AuthUser` but rejects users without the admin role with 403.
/// Handlers behind the gate use this as a second check.
#[derive(Debug)]
pub struct AdminUser(pub AuthContext);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(auth_context) = AuthUser::from_request_parts(parts, state).await?;

        if !auth_context.is_admin() {
            tracing::debug!(
                subject = auth_context.subject().unwrap_or("-"),
                "Admin role required"
            );
            return Err(AuthError::Forbidden);
        }

        Ok(AdminUser(auth_context))
    }
}

//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Session evidence was present but could not be turned into an `AuthContext`.
///
/// Distinct from "not authenticated", which is a normal outcome.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionResolutionError {
    #[error("malformed session evidence: {0}")]
    Malformed(String),

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    NotAuthenticated,
    InvalidSession,
    /// Authenticated but missing the admin role
    Forbidden,
    /// Callback state missing, expired, or not matching the sign-in cookie
    InvalidSignInState,
    MissingAuthorizationCode,
    IdentityProviderFailed,
    SessionIssueFailed,
}

impl From<SessionResolutionError> for AuthError {
    fn from(err: SessionResolutionError) -> Self {
        tracing::warn!(error = %err, "Session resolution failed");
        AuthError::InvalidSession
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Not authenticated",
            ),
            AuthError::InvalidSession => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SESSION",
                "Invalid or expired session",
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "ADMIN_ROLE_REQUIRED",
                "Admin role required",
            ),
            AuthError::InvalidSignInState => (
                StatusCode::BAD_REQUEST,
                "INVALID_SIGN_IN_STATE",
                "Sign-in state missing or mismatched",
            ),
            AuthError::MissingAuthorizationCode => (
                StatusCode::BAD_REQUEST,
                "MISSING_AUTHORIZATION_CODE",
                "Authorization code required",
            ),
            AuthError::IdentityProviderFailed => (
                StatusCode::BAD_GATEWAY,
                "IDENTITY_PROVIDER_ERROR",
                "Identity provider request failed",
            ),
            AuthError::SessionIssueFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SESSION_ERROR",
                "Failed to issue session",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::NotAuthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidSession, StatusCode::UNAUTHORIZED),
            (AuthError::Forbidden, StatusCode::FORBIDDEN),
            (AuthError::InvalidSignInState, StatusCode::BAD_REQUEST),
            (AuthError::MissingAuthorizationCode, StatusCode::BAD_REQUEST),
            (AuthError::IdentityProviderFailed, StatusCode::BAD_GATEWAY),
            (
                AuthError::SessionIssueFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_session_resolution_error_maps_to_invalid_session() {
        let err: AuthError = SessionResolutionError::Malformed("bad token".to_string()).into();
        assert!(matches!(err, AuthError::InvalidSession));

        let err: AuthError =
            SessionResolutionError::ProviderUnavailable("timeout".to_string()).into();
        assert!(matches!(err, AuthError::InvalidSession));
    }

    #[tokio::test]
    async fn test_auth_error_body_shape() {
        let response = AuthError::Forbidden.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "ADMIN_ROLE_REQUIRED");
    }
}

//! Sign-in flow and session introspection handlers
//!
//! Implements:
//! - GET /api/auth - Callback when `code` is present, otherwise start sign-in
//! - GET /api/auth/sign-in - Redirect to the identity provider
//! - GET /api/auth/callback - Finish sign-in and land on /reports
//! - GET /api/auth/sign-out - Clear the session and end the provider session
//! - GET /api/auth/user - Current user and roles

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::AuthBackend;
use crate::claims::Claims;
use crate::config::{safe_return_path, POST_SIGN_IN_PATH, SESSION_COOKIE, SIGN_IN_COOKIE};
use crate::context::AuthContext;
use crate::cookies::{clear_cookie, read_cookie, set_cookie};
use crate::error::AuthError;
use crate::jwt::{SignInState, SIGN_IN_TTL_SECS};
use crate::pkce::{code_challenge, random_token};
use crate::provider::AuthorizationRequest;

/// Query parameters accepted by the auth entry points
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

/// Response shape for `GET /api/auth/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<&AuthContext> for UserInfo {
    fn from(ctx: &AuthContext) -> Self {
        let claims = ctx.claims.as_ref();

        Self {
            sub: claims.and_then(Claims::subject).map(str::to_string),
            name: claims.and_then(Claims::name).map(str::to_string),
            email: claims.and_then(Claims::email).map(str::to_string),
            picture: claims.and_then(Claims::picture).map(str::to_string),
            roles: ctx.roles().to_vec(),
        }
    }
}

/// GET /api/auth - Dispatch to the callback or start sign-in
pub async fn auth_entry(
    State(backend): State<AuthBackend>,
    headers: HeaderMap,
    Query(query): Query<AuthQuery>,
) -> Result<Response, AuthError> {
    if query.code.is_some() {
        let (sign_in, session) = complete_sign_in(&backend, &headers, query).await?;
        return Ok(signed_in_response(&backend, &session, &sign_in.redirect_to));
    }

    start_sign_in(&backend, query.redirect_to.as_deref())
}

/// GET /api/auth/sign-in - Redirect to the identity provider
pub async fn sign_in(
    State(backend): State<AuthBackend>,
    Query(query): Query<AuthQuery>,
) -> Result<Response, AuthError> {
    start_sign_in(&backend, query.redirect_to.as_deref())
}

/// GET /api/auth/callback - Finish sign-in and land on the reports list
pub async fn callback(
    State(backend): State<AuthBackend>,
    headers: HeaderMap,
    Query(query): Query<AuthQuery>,
) -> Result<Response, AuthError> {
    let (_, session) = complete_sign_in(&backend, &headers, query).await?;
    Ok(signed_in_response(&backend, &session, POST_SIGN_IN_PATH))
}

/// GET /api/auth/sign-out - Clear the session and end the provider session
pub async fn sign_out(State(backend): State<AuthBackend>) -> Response {
    let config = backend.config();
    let home = config.absolute("/");

    let location = backend
        .provider()
        .end_session_url(&home)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to build end-session URL");
            home.clone()
        });

    (
        [(SET_COOKIE, clear_cookie(SESSION_COOKIE, config.cookie_secure))],
        Redirect::to(&location),
    )
        .into_response()
}

/// GET /api/auth/user - Current user and roles
pub async fn current_user(State(backend): State<AuthBackend>, headers: HeaderMap) -> Response {
    match backend.resolve(&headers).await {
        Ok(ctx) if ctx.is_authenticated => Json(UserInfo::from(&ctx)).into_response(),
        Ok(_) => not_authenticated(),
        Err(e) => {
            tracing::warn!(error = %e, "Session resolution failed for /api/auth/user");
            not_authenticated()
        }
    }
}

fn not_authenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Not authenticated" })),
    )
        .into_response()
}

fn start_sign_in(backend: &AuthBackend, redirect_to: Option<&str>) -> Result<Response, AuthError> {
    let config = backend.config();

    let random = || {
        random_token().map_err(|e| {
            tracing::error!(error = %e, "Failed to generate sign-in randomness");
            AuthError::SessionIssueFailed
        })
    };
    let state = random()?;
    let code_verifier = random()?;

    let authorization_url = backend
        .provider()
        .authorization_url(&AuthorizationRequest {
            redirect_uri: config.callback_url(),
            state: state.clone(),
            code_challenge: code_challenge(&code_verifier),
        })
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build authorization URL");
            AuthError::IdentityProviderFailed
        })?;

    let sign_in_token = backend
        .codec()
        .issue_sign_in(SignInState {
            state,
            code_verifier,
            redirect_to: safe_return_path(redirect_to),
        })
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign sign-in state");
            AuthError::SessionIssueFailed
        })?;

    Ok((
        [(
            SET_COOKIE,
            set_cookie(
                SIGN_IN_COOKIE,
                &sign_in_token,
                SIGN_IN_TTL_SECS,
                config.cookie_secure,
            ),
        )],
        Redirect::to(&authorization_url),
    )
        .into_response())
}

/// Verify the callback against the sign-in cookie, exchange the code and
/// mint a session token for the signed-in user.
async fn complete_sign_in(
    backend: &AuthBackend,
    headers: &HeaderMap,
    query: AuthQuery,
) -> Result<(SignInState, String), AuthError> {
    if let Some(error) = query.error {
        tracing::warn!(error = %error, "Identity provider returned an error to the callback");
        return Err(AuthError::IdentityProviderFailed);
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AuthError::MissingAuthorizationCode)?;

    let cookie = read_cookie(headers, SIGN_IN_COOKIE).ok_or(AuthError::InvalidSignInState)?;
    let sign_in = backend.codec().verify_sign_in(&cookie).map_err(|e| {
        tracing::debug!(error = ?e, "Sign-in cookie rejected");
        AuthError::InvalidSignInState
    })?;

    if query.state.as_deref() != Some(sign_in.state.as_str()) {
        tracing::warn!("Callback state does not match sign-in cookie");
        return Err(AuthError::InvalidSignInState);
    }

    let provider = backend.provider();
    let tokens = provider
        .exchange_code(
            &code,
            &backend.config().callback_url(),
            &sign_in.code_verifier,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Authorization code exchange failed");
            AuthError::IdentityProviderFailed
        })?;

    let claims = provider
        .user_info(&tokens.access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Userinfo request failed");
            AuthError::IdentityProviderFailed
        })?
        .ok_or_else(|| {
            tracing::error!("Fresh access token rejected by userinfo endpoint");
            AuthError::IdentityProviderFailed
        })?;

    tracing::info!(subject = claims.subject().unwrap_or("-"), "User signed in");

    let session = backend.codec().issue_session(claims).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign session token");
        AuthError::SessionIssueFailed
    })?;

    Ok((sign_in, session))
}

fn signed_in_response(backend: &AuthBackend, session: &str, redirect_to: &str) -> Response {
    let config = backend.config();
    let mut headers = HeaderMap::new();
    headers.append(
        SET_COOKIE,
        set_cookie(
            SESSION_COOKIE,
            session,
            backend.codec().session_ttl_secs(),
            config.cookie_secure,
        ),
    );
    headers.append(SET_COOKIE, clear_cookie(SIGN_IN_COOKIE, config.cookie_secure));

    (headers, Redirect::to(&config.absolute(redirect_to))).into_response()
}

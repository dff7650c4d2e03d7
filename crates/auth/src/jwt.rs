//! Signed cookie tokens and credential extraction helpers
//!
//! The session cookie and the sign-in cookie are both HS256 JWTs signed with
//! the configured session secret. Each kind has its own issuer so one can
//! never be replayed as the other.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::error::SessionResolutionError;

const SESSION_ISSUER: &str = "reportdesk:session";
const SIGN_IN_ISSUER: &str = "reportdesk:sign-in";

/// Sign-in state lifetime (10 minutes)
pub(crate) const SIGN_IN_TTL_SECS: u64 = 600;

#[derive(Debug, Serialize, Deserialize)]
struct SessionToken {
    iss: String,
    iat: u64,
    exp: u64,
    #[serde(flatten)]
    user: Claims,
}

/// State carried from sign-in to callback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInState {
    pub state: String,
    pub code_verifier: String,
    pub redirect_to: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SignInToken {
    iss: String,
    iat: u64,
    exp: u64,
    #[serde(flatten)]
    sign_in: SignInState,
}

/// Outcome of verifying a signed token
#[derive(Debug, PartialEq)]
pub(crate) enum TokenError {
    Expired,
    Invalid(String),
}

/// Mints and verifies signed cookie tokens
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl_secs: u64,
}

impl SessionCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.session_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            session_ttl_secs: config.session_ttl_secs,
        }
    }

    pub fn session_ttl_secs(&self) -> u64 {
        self.session_ttl_secs
    }

    /// Wrap provider user claims in a session token, keeping only the
    /// profile and role claims
    pub fn issue_session(&self, user: Claims) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();
        let token = SessionToken {
            iss: SESSION_ISSUER.to_string(),
            iat: now,
            exp: now + self.session_ttl_secs,
            user: user.for_session(),
        };
        encode(&Header::new(Algorithm::HS256), &token, &self.encoding_key)
    }

    /// Verify a session token and return the user claims it carries
    pub(crate) fn verify_session(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify::<SessionToken>(token, SESSION_ISSUER)
            .map(|t| t.user)
    }

    /// Wrap sign-in state in a short-lived token
    pub fn issue_sign_in(
        &self,
        sign_in: SignInState,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();
        let token = SignInToken {
            iss: SIGN_IN_ISSUER.to_string(),
            iat: now,
            exp: now + SIGN_IN_TTL_SECS,
            sign_in,
        };
        encode(&Header::new(Algorithm::HS256), &token, &self.encoding_key)
    }

    pub(crate) fn verify_sign_in(&self, token: &str) -> Result<SignInState, TokenError> {
        self.verify::<SignInToken>(token, SIGN_IN_ISSUER)
            .map(|t| t.sign_in)
    }

    fn verify<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        issuer: &str,
    ) -> Result<T, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.set_issuer(&[issuer]);

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(error = %e, "Token validation failed");
                    TokenError::Invalid(e.to_string())
                }
            })
    }
}

fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Extract a bearer credential from the Authorization header.
///
/// A missing header is `Ok(None)`; a header in any other scheme or with
/// non-visible characters is malformed evidence.
pub(crate) fn extract_bearer_token(
    headers: &HeaderMap,
) -> Result<Option<String>, SessionResolutionError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let header_str = header.to_str().map_err(|_| {
        SessionResolutionError::Malformed("authorization header is not visible ASCII".to_string())
    })?;

    match header_str.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
        _ => Err(SessionResolutionError::Malformed(
            "authorization header is not a bearer credential".to_string(),
        )),
    }
}

//! Session resolution
//!
//! Turns the session evidence a request carries into an `AuthContext`.
//! Evidence is read from the request headers only: the signed session
//! cookie first, then an `Authorization: Bearer` provider access token.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::SESSION_COOKIE;
use crate::context::AuthContext;
use crate::cookies::read_cookie;
use crate::error::SessionResolutionError;
use crate::jwt::{extract_bearer_token, SessionCodec, TokenError};
use crate::provider::IdentityProvider;

/// Session evidence found on a request
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvidence {
    None,
    /// Signed session cookie minted at sign-in
    Cookie(String),
    /// Identity provider access token
    Bearer(String),
}

impl SessionEvidence {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SessionResolutionError> {
        if let Some(token) = read_cookie(headers, SESSION_COOKIE) {
            return Ok(Self::Cookie(token));
        }

        Ok(match extract_bearer_token(headers)? {
            Some(token) => Self::Bearer(token),
            None => Self::None,
        })
    }
}

/// Resolves request headers into an authentication context.
///
/// No evidence is `Ok(AuthContext::unauthenticated())`, not an error.
#[async_trait::async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<AuthContext, SessionResolutionError>;
}

/// Resolver backed by the session codec and the identity provider
#[derive(Clone)]
pub struct ProviderSessionResolver {
    codec: SessionCodec,
    provider: Arc<dyn IdentityProvider>,
}

impl ProviderSessionResolver {
    pub fn new(codec: SessionCodec, provider: Arc<dyn IdentityProvider>) -> Self {
        Self { codec, provider }
    }
}

#[async_trait::async_trait]
impl SessionResolver for ProviderSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<AuthContext, SessionResolutionError> {
        match SessionEvidence::from_headers(headers)? {
            SessionEvidence::None => Ok(AuthContext::unauthenticated()),

            SessionEvidence::Cookie(token) => match self.codec.verify_session(&token) {
                Ok(claims) => Ok(AuthContext::authenticated(claims)),
                Err(TokenError::Expired) => {
                    tracing::debug!("Session cookie expired");
                    Ok(AuthContext::unauthenticated())
                }
                Err(TokenError::Invalid(reason)) => Err(SessionResolutionError::Malformed(reason)),
            },

            SessionEvidence::Bearer(token) => match self.provider.user_info(&token).await {
                Ok(Some(claims)) => Ok(AuthContext::authenticated(claims)),
                Ok(None) => Ok(AuthContext::unauthenticated()),
                Err(e) => {
                    tracing::error!(error = %e, "Identity provider userinfo request failed");
                    Err(SessionResolutionError::ProviderUnavailable(e.to_string()))
                }
            },
        }
    }
}

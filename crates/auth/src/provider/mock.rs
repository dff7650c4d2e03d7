//! Mock identity provider
//!
//! Approves every sign-in by redirecting straight back to the callback with
//! a fixed authorization code. Codes and access tokens are registered in
//! memory. Thread-safe via `Arc<Mutex<>>`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use url::Url;

use super::{AuthorizationRequest, IdentityProvider, ProviderError, TokenSet};
use crate::claims::Claims;

/// Authorization code handed back by every mock sign-in
pub const MOCK_AUTHORIZATION_CODE: &str = "mock-code";

/// Access token of the built-in demo administrator
pub const MOCK_ADMIN_TOKEN: &str = "mock-admin-token";

#[derive(Debug, Default)]
struct MockState {
    /// authorization code -> access token
    codes: HashMap<String, String>,
    /// access token -> user claims
    users: HashMap<String, Claims>,
}

/// Mock identity provider that resolves registered codes and tokens.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<MockState>>,
    unavailable: Arc<AtomicBool>,
}

impl MockIdentityProvider {
    /// Create an empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock provider whose sign-in yields an administrator, for local development.
    pub fn with_demo_admin() -> Self {
        let provider = Self::new();
        let claims = Claims::from_value(json!({
            "sub": "mock-admin",
            "name": "Mock Admin",
            "email": "admin@example.com",
            "roles": ["admin"]
        }))
        .unwrap_or_default();
        provider.register_user(MOCK_ADMIN_TOKEN, claims);
        provider.register_code(MOCK_AUTHORIZATION_CODE, MOCK_ADMIN_TOKEN);
        provider
    }

    /// Make `access_token` resolve to `claims`.
    pub fn register_user(&self, access_token: &str, claims: Claims) {
        self.state
            .lock()
            .expect("mock provider lock poisoned")
            .users
            .insert(access_token.to_string(), claims);
    }

    /// Make `code` exchange to `access_token`.
    pub fn register_code(&self, code: &str, access_token: &str) {
        self.state
            .lock()
            .expect("mock provider lock poisoned")
            .codes
            .insert(code.to_string(), access_token.to_string());
    }

    /// Simulate an unreachable provider.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ProviderError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProviderError::Request(
                "mock identity provider unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MockState>, ProviderError> {
        self.state
            .lock()
            .map_err(|e| ProviderError::Request(format!("mock provider lock poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ProviderError> {
        let mut url = Url::parse(&request.redirect_uri)
            .map_err(|e| ProviderError::Configuration(format!("Invalid redirect URI: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("code", MOCK_AUTHORIZATION_CODE)
            .append_pair("state", &request.state);
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        code: &str,
        _redirect_uri: &str,
        _code_verifier: &str,
    ) -> Result<TokenSet, ProviderError> {
        self.check_available()?;
        tracing::debug!(code = %code, "Mock identity provider: exchanging code");

        let access_token = self
            .lock()?
            .codes
            .get(code)
            .cloned()
            .ok_or_else(|| ProviderError::Response("invalid_grant".to_string()))?;

        Ok(TokenSet {
            access_token,
            id_token: None,
            refresh_token: None,
            expires_in: Some(3600),
        })
    }

    async fn user_info(&self, access_token: &str) -> Result<Option<Claims>, ProviderError> {
        self.check_available()?;
        Ok(self.lock()?.users.get(access_token).cloned())
    }

    fn end_session_url(&self, post_logout_redirect_uri: &str) -> Result<String, ProviderError> {
        Ok(post_logout_redirect_uri.to_string())
    }
}

//! Identity provider integration
//!
//! Provides the OIDC operations the sign-in flow and bearer sessions need:
//! - Logto HTTP client for production
//! - Mock provider for testing and local development

pub mod logto;
pub mod mock;

use reportdesk_common::Config;
use serde::Deserialize;
use thiserror::Error;

use crate::claims::Claims;

/// Scopes requested at sign-in
pub const DEFAULT_SCOPES: &[&str] = &["openid", "profile", "email", "offline_access", "roles"];

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Identity provider configuration error: {0}")]
    Configuration(String),

    #[error("Identity provider request error: {0}")]
    Request(String),

    #[error("Identity provider response error: {0}")]
    Response(String),
}

/// Parameters of an authorization-code request
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub redirect_uri: String,
    pub state: String,
    pub code_challenge: String,
}

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Identity provider configuration.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Identity provider (logto, mock)
    pub provider: String,
    pub endpoint: String,
    pub app_id: String,
    pub app_secret: String,
    /// API resource indicator requested alongside the scopes
    pub resource: Option<String>,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .field("resource", &self.resource)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl ProviderConfig {
    /// Take the provider settings out of the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.identity_provider.clone(),
            endpoint: config.logto_endpoint.trim_end_matches('/').to_string(),
            app_id: config.logto_app_id.clone(),
            app_secret: config.logto_app_secret.clone(),
            resource: config.logto_resource.clone(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Identity provider trait for different implementations.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to in order to sign in.
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ProviderError>;

    /// Exchange an authorization code for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<TokenSet, ProviderError>;

    /// Fetch user claims for an access token.
    ///
    /// Returns `Ok(None)` when the provider rejects the token.
    async fn user_info(&self, access_token: &str) -> Result<Option<Claims>, ProviderError>;

    /// URL that ends the provider session and returns to `post_logout_redirect_uri`.
    fn end_session_url(&self, post_logout_redirect_uri: &str) -> Result<String, ProviderError>;
}

/// Factory for creating IdentityProvider implementations.
pub struct IdentityProviderFactory;

impl IdentityProviderFactory {
    /// Create an IdentityProvider based on configuration.
    pub fn create(config: ProviderConfig) -> Result<Box<dyn IdentityProvider>, ProviderError> {
        match config.provider.as_str() {
            "logto" => {
                tracing::info!(endpoint = %config.endpoint, "Creating Logto identity provider");
                Ok(Box::new(logto::LogtoProvider::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock identity provider");
                Ok(Box::new(mock::MockIdentityProvider::with_demo_admin()))
            }
            provider => Err(ProviderError::Configuration(format!(
                "Unknown identity provider: {}. Supported providers: logto, mock",
                provider
            ))),
        }
    }
}

//! Logto OIDC client
//!
//! Talks to the tenant endpoints under `{endpoint}/oidc/`:
//! `auth`, `token`, `me` and `session/end`.

use std::time::Duration;

use url::Url;

use super::{AuthorizationRequest, IdentityProvider, ProviderConfig, ProviderError, TokenSet};
use crate::claims::Claims;

/// Upper bound on any single provider round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Logto identity provider
pub struct LogtoProvider {
    http: reqwest::Client,
    endpoint: String,
    app_id: String,
    app_secret: String,
    resource: Option<String>,
    scopes: Vec<String>,
}

impl LogtoProvider {
    /// Create a new Logto client from configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        if config.endpoint.is_empty() || config.app_id.is_empty() || config.app_secret.is_empty()
        {
            return Err(ProviderError::Configuration(
                "LOGTO_ENDPOINT, LOGTO_APP_ID and LOGTO_APP_SECRET are required for Logto"
                    .to_string(),
            ));
        }
        Url::parse(&config.endpoint).map_err(|e| {
            ProviderError::Configuration(format!("Invalid LOGTO_ENDPOINT: {}", e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            app_id: config.app_id,
            app_secret: config.app_secret,
            resource: config.resource,
            scopes: config.scopes,
        })
    }

    fn oidc_url(&self, path: &str) -> Result<Url, ProviderError> {
        Url::parse(&format!("{}/oidc/{}", self.endpoint, path))
            .map_err(|e| ProviderError::Configuration(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for LogtoProvider {
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String, ProviderError> {
        let mut url = self.oidc_url("auth")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.app_id)
                .append_pair("redirect_uri", &request.redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &self.scopes.join(" "))
                .append_pair("state", &request.state)
                .append_pair("code_challenge", &request.code_challenge)
                .append_pair("code_challenge_method", "S256")
                .append_pair("prompt", "consent");
            if let Some(resource) = &self.resource {
                query.append_pair("resource", resource);
            }
        }
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<TokenSet, ProviderError> {
        let url = self.oidc_url("token")?;
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
            ("client_id", self.app_id.as_str()),
        ];

        let response = self
            .http
            .post(url)
            .basic_auth(&self.app_id, Some(&self.app_secret))
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(ProviderError::Response(format!(
                "Token endpoint returned {}: {}",
                status, body
            )));
        }

        response
            .json::<TokenSet>()
            .await
            .map_err(|e| ProviderError::Response(format!("Invalid token response: {}", e)))
    }

    async fn user_info(&self, access_token: &str) -> Result<Option<Claims>, ProviderError> {
        let url = self.oidc_url("me")?;

        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::debug!("Userinfo endpoint rejected access token");
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ProviderError::Response(format!(
                "Userinfo endpoint returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Response(format!("Invalid userinfo response: {}", e)))?;

        let claims = Claims::from_value(body).ok_or_else(|| {
            ProviderError::Response("Userinfo response is not a JSON object".to_string())
        })?;

        Ok(Some(claims.normalize_provider_keys()))
    }

    fn end_session_url(&self, post_logout_redirect_uri: &str) -> Result<String, ProviderError> {
        let mut url = self.oidc_url("session/end")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.app_id)
            .append_pair("post_logout_redirect_uri", post_logout_redirect_uri);
        Ok(url.into())
    }
}

//! Current-user sources for the mirror gate

use std::time::Duration;

use reqwest::header::COOKIE;
use serde_json::Value;

use super::MirrorError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the current user as returned by `GET /api/auth/user`.
///
/// `Ok(None)` means the server answered "not authenticated".
#[async_trait::async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_user(&self) -> Result<Option<Value>, MirrorError>;
}

/// HTTP source calling the dashboard's own user endpoint
pub struct HttpUserSource {
    http: reqwest::Client,
    url: String,
    cookie: Option<String>,
}

impl HttpUserSource {
    /// Source for the dashboard at `base_url`
    pub fn new(base_url: &str) -> Result<Self, MirrorError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MirrorError::Request(e.to_string()))?;

        Ok(Self {
            http,
            url: format!("{}/api/auth/user", base_url.trim_end_matches('/')),
            cookie: None,
        })
    }

    /// Forward a browser Cookie header with each fetch
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

#[async_trait::async_trait]
impl UserSource for HttpUserSource {
    async fn fetch_user(&self) -> Result<Option<Value>, MirrorError> {
        let mut request = self.http.get(&self.url);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MirrorError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(MirrorError::Response(format!(
                "User endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|e| MirrorError::Response(format!("Invalid user response: {}", e)))
    }
}

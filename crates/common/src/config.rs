//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

/// Default public base URL of the dashboard
const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Default session lifetime (7 days)
const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default listen port
const DEFAULT_PORT: u16 = 3001;

#[derive(Clone)]
pub struct Config {
    /// Public base URL used for redirects and the OIDC callback
    pub base_url: String,

    /// Session cookie signing configuration
    pub session_secret: String,
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,

    /// Identity provider (logto, mock)
    pub identity_provider: String,
    pub logto_endpoint: String,
    pub logto_app_id: String,
    pub logto_app_secret: String,
    pub logto_resource: Option<String>,

    /// Reports API (http, mock)
    pub reports_provider: String,
    pub reports_api_base_url: String,

    /// Runtime configuration
    pub log_format: String,
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .field("identity_provider", &self.identity_provider)
            .field("logto_endpoint", &self.logto_endpoint)
            .field("logto_app_id", &self.logto_app_id)
            .field("logto_app_secret", &"[REDACTED]")
            .field("logto_resource", &self.logto_resource)
            .field("reports_provider", &self.reports_provider)
            .field("reports_api_base_url", &self.reports_api_base_url)
            .field("log_format", &self.log_format)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow::anyhow!("{} is required", key));

        let base_url = get("APP_BASE_URL")
            .or_else(|| get("LOGTO_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let session_secret = get("SESSION_SECRET")
            .or_else(|| get("LOGTO_COOKIE_ENCRYPTION_KEY"))
            .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET is required"))?;

        let session_ttl_secs = match get("SESSION_TTL_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("SESSION_TTL_SECS must be a positive integer"))?,
            None => DEFAULT_SESSION_TTL_SECS,
        };

        let identity_provider = get("IDENTITY_PROVIDER").unwrap_or_else(|| "logto".to_string());
        let (logto_endpoint, logto_app_id, logto_app_secret) = if identity_provider == "logto" {
            (
                require("LOGTO_ENDPOINT")?,
                require("LOGTO_APP_ID")?,
                require("LOGTO_APP_SECRET")?,
            )
        } else {
            (
                get("LOGTO_ENDPOINT").unwrap_or_default(),
                get("LOGTO_APP_ID").unwrap_or_default(),
                get("LOGTO_APP_SECRET").unwrap_or_default(),
            )
        };

        let reports_provider = get("REPORTS_PROVIDER").unwrap_or_else(|| "http".to_string());
        let reports_api_base_url = if reports_provider == "http" {
            require("REPORTS_API_BASE_URL")?
        } else {
            get("REPORTS_API_BASE_URL").unwrap_or_default()
        };

        Ok(Self {
            base_url,
            session_secret,
            session_ttl_secs,
            cookie_secure: get("APP_ENV").as_deref() == Some("production"),
            identity_provider,
            logto_endpoint,
            logto_app_id,
            logto_app_secret,
            logto_resource: get("LOGTO_RESOURCE"),
            reports_provider,
            reports_api_base_url,
            log_format: get("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "reportdesk=debug".to_string()),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        })
    }
}

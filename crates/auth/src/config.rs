//! Authentication configuration and well-known paths

use url::form_urlencoded;

/// Sign-in entry point
pub const SIGN_IN_PATH: &str = "/api/auth/sign-in";

/// OIDC redirect target registered with the identity provider
pub const CALLBACK_PATH: &str = "/api/auth/callback";

/// Fixed access-denied view
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Where users land after sign-in when no usable return path exists
pub const POST_SIGN_IN_PATH: &str = "/reports";

/// Session cookie name
pub const SESSION_COOKIE: &str = "reportdesk_session";

/// Short-lived cookie holding sign-in state between redirect and callback
pub const SIGN_IN_COOKIE: &str = "reportdesk_sign_in";

/// Authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Public base URL without trailing slash
    pub base_url: String,
    /// HS256 secret used for session and sign-in cookies
    pub session_secret: String,
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("base_url", &self.base_url)
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl AuthConfig {
    /// Absolute URL for a path on this service
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Absolute OIDC callback URL
    pub fn callback_url(&self) -> String {
        self.absolute(CALLBACK_PATH)
    }

    /// Sign-in URL carrying the originally requested path
    pub fn sign_in_url(&self, return_path: &str) -> String {
        self.absolute(&sign_in_path(return_path))
    }

    /// Access-denied URL; never carries a return path
    pub fn unauthorized_url(&self) -> String {
        self.absolute(UNAUTHORIZED_PATH)
    }
}

/// Site-relative sign-in path carrying `redirectTo`
pub fn sign_in_path(return_path: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(return_path.as_bytes()).collect();
    format!("{}?redirectTo={}", SIGN_IN_PATH, encoded)
}

/// Accept only same-site absolute paths as post-sign-in targets.
///
/// Protocol-relative (`//host`) and backslash forms are rejected so the
/// sign-in flow cannot be used as an open redirect.
pub fn safe_return_path(candidate: Option<&str>) -> String {
    match candidate {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => POST_SIGN_IN_PATH.to_string(),
    }
}

//! Route classification for the authorization gate

/// Path prefixes that never pass through the gate
pub const PUBLIC_PREFIXES: &[&str] = &["/api/auth", "/unauthorized", "/api/logto"];

/// Path prefixes served as static assets
const STATIC_PREFIXES: &[&str] = &["/static/", "/assets/"];

/// File extensions served as static assets
const STATIC_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Gate requirement for a request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// No gate applied
    Public,
    /// Gate applied
    Protected,
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
        }
    }
}

/// Classify a request path. The root path is public by exact match only.
pub fn classify(path: &str) -> RouteClass {
    if path == "/" || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        RouteClass::Public
    } else {
        RouteClass::Protected
    }
}

/// Static assets are excluded from classification altogether
pub fn is_static_asset(path: &str) -> bool {
    if path == "/favicon.ico" || STATIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }

    let lower = path.to_ascii_lowercase();
    STATIC_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

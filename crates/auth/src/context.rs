//! Per-request authentication context

use crate::claims::Claims;
use crate::roles::{extract_roles, is_authorized, RoleSet};

/// Authentication state of a single request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthContext {
    pub is_authenticated: bool,
    pub claims: Option<Claims>,
}

impl AuthContext {
    /// Context for a request carrying no session evidence
    pub fn unauthenticated() -> Self {
        Self {
            is_authenticated: false,
            claims: None,
        }
    }

    /// Context for a request with a valid session
    pub fn authenticated(claims: Claims) -> Self {
        Self {
            is_authenticated: true,
            claims: Some(claims),
        }
    }

    /// Roles carried by the claims (empty when unauthenticated)
    pub fn roles(&self) -> RoleSet {
        extract_roles(self.claims.as_ref())
    }

    /// Authenticated and holding the admin role
    pub fn is_admin(&self) -> bool {
        self.is_authenticated && is_authorized(&self.roles())
    }

    /// Subject of the session, for logging
    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().and_then(Claims::subject)
    }
}

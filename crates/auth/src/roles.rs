//! Role extraction and the admin membership rule
//!
//! The identity provider may put roles in one of several places depending
//! on how a tenant is configured. Extraction walks an ordered list of
//! locations and takes the first one holding an array of strings.
//!
//! Every caller that makes an access decision (gate middleware, `AdminUser`
//! extractor, `/api/auth/user`, mirror gate) goes through [`extract_roles`]
//! and [`is_authorized`].

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::claims::Claims;

/// Role required for every protected route
pub const ADMIN_ROLE: &str = "admin";

/// Normalized set of role strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Sorted role list
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A place in the claims object where roles may live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleLocation {
    /// Top-level `roles`
    Direct,
    /// `customData.roles`
    CustomData,
    /// Top-level `organizationRoles`
    OrganizationRoles,
}

impl RoleLocation {
    /// Lookup order; the first location yielding roles wins
    pub const PRIORITY: [RoleLocation; 3] = [
        RoleLocation::Direct,
        RoleLocation::CustomData,
        RoleLocation::OrganizationRoles,
    ];

    fn locate<'a>(&self, claims: &'a Claims) -> Option<&'a Value> {
        match self {
            Self::Direct => claims.get("roles"),
            Self::CustomData => claims.get("customData").and_then(|data| data.get("roles")),
            Self::OrganizationRoles => claims.get("organizationRoles"),
        }
    }

    /// Roles at this location, or `None` when the value is missing, null,
    /// or anything other than an array made only of strings.
    pub fn extract(&self, claims: &Claims) -> Option<RoleSet> {
        let items = self.locate(claims)?.as_array()?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<RoleSet>>()
    }
}

impl std::fmt::Display for RoleLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "roles"),
            Self::CustomData => write!(f, "customData.roles"),
            Self::OrganizationRoles => write!(f, "organizationRoles"),
        }
    }
}

/// Extract the role set from (possibly absent) claims
pub fn extract_roles(claims: Option<&Claims>) -> RoleSet {
    let Some(claims) = claims else {
        return RoleSet::empty();
    };

    RoleLocation::PRIORITY
        .iter()
        .find_map(|location| {
            let roles = location.extract(claims)?;
            tracing::trace!(location = %location, count = roles.len(), "Roles extracted");
            Some(roles)
        })
        .unwrap_or_default()
}

/// The single role-membership rule for the dashboard
pub fn is_authorized(roles: &RoleSet) -> bool {
    roles.contains(ADMIN_ROLE)
}

//! Identity claims
//!
//! Claims are kept as an open JSON object because the identity provider
//! places role information in different locations depending on tenant
//! configuration. Typed accessors cover the well-known profile fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key-value assertions about an authenticated identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

/// Top-level claims copied into the session cookie: the profile fields and
/// the role locations. Registered JWT claims are owned by the session token.
const SESSION_CLAIMS: &[&str] = &["sub", "name", "email", "picture", "roles", "organizationRoles"];

impl Claims {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Build claims from a JSON value; anything but an object yields `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// String claim lookup; non-string values are ignored
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Subject (user ID)
    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn picture(&self) -> Option<&str> {
        self.get_str("picture")
    }

    /// Reduce provider claims to what the session cookie carries.
    ///
    /// Userinfo may hold arbitrary `customData`; only its `roles` entry is
    /// kept so the cookie stays small.
    pub fn for_session(mut self) -> Self {
        let mut kept: Map<String, Value> = SESSION_CLAIMS
            .iter()
            .filter_map(|key| self.0.remove(*key).map(|value| (key.to_string(), value)))
            .collect();

        let custom_roles = self
            .0
            .get_mut("customData")
            .and_then(Value::as_object_mut)
            .and_then(|data| data.remove("roles"));
        if let Some(roles) = custom_roles {
            let mut custom_data = Map::new();
            custom_data.insert("roles".to_string(), roles);
            kept.insert("customData".to_string(), Value::Object(custom_data));
        }

        Self(kept)
    }

    /// Rename provider snake_case role keys to the camelCase locations the
    /// role extractor reads (`custom_data` → `customData`,
    /// `organization_roles` → `organizationRoles`). Existing camelCase keys win.
    pub fn normalize_provider_keys(mut self) -> Self {
        for (from, to) in [
            ("custom_data", "customData"),
            ("organization_roles", "organizationRoles"),
        ] {
            if let Some(value) = self.0.remove(from) {
                self.0.entry(to.to_string()).or_insert(value);
            }
        }
        self
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

//! Concrete authentication backend
//!
//! Bundles the auth configuration, session codec, identity provider and
//! session resolver behind one cloneable handle.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::SessionResolutionError;
use crate::gate::{AuthorizationGate, GateOutcome};
use crate::jwt::SessionCodec;
use crate::provider::IdentityProvider;
use crate::session::{ProviderSessionResolver, SessionResolver};

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    config: AuthConfig,
    codec: SessionCodec,
    provider: Arc<dyn IdentityProvider>,
    resolver: Arc<dyn SessionResolver>,
    gate: AuthorizationGate,
}

impl AuthBackend {
    /// Backend resolving sessions from the signed cookie or provider bearer tokens
    pub fn new(config: AuthConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        let codec = SessionCodec::new(&config);
        let resolver: Arc<dyn SessionResolver> = Arc::new(ProviderSessionResolver::new(
            codec.clone(),
            Arc::clone(&provider),
        ));
        Self::with_resolver(config, provider, resolver)
    }

    /// Backend with a caller-supplied session resolver
    pub fn with_resolver(
        config: AuthConfig,
        provider: Arc<dyn IdentityProvider>,
        resolver: Arc<dyn SessionResolver>,
    ) -> Self {
        Self {
            codec: SessionCodec::new(&config),
            gate: AuthorizationGate::new(Arc::clone(&resolver)),
            config,
            provider,
            resolver,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    pub fn provider(&self) -> &dyn IdentityProvider {
        self.provider.as_ref()
    }

    /// Resolve the session evidence on a request
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<AuthContext, SessionResolutionError> {
        self.resolver.resolve(headers).await
    }

    /// Run the authorization gate for a request
    pub async fn evaluate(&self, path: &str, headers: &HeaderMap) -> GateOutcome {
        self.gate.evaluate(path, headers).await
    }
}

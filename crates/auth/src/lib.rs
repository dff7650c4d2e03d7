//! Authentication and authorization for the Reportdesk dashboard
//!
//! Provides the route classifier, session resolution against the identity
//! provider, role extraction, the authorization gate middleware, axum
//! extractors, the sign-in flow routes and the client-side mirror gate.
//! Extractors work with any domain state implementing `FromRef<S>` for
//! `AuthBackend`.

pub mod api;
mod backend;
mod claims;
pub mod classifier;
mod config;
mod context;
pub mod cookies;
mod error;
mod extractors;
pub mod gate;
mod jwt;
mod middleware;
pub mod mirror;
pub mod pkce;
pub mod provider;
pub mod roles;
pub mod session;

pub use api::UserInfo;
pub use backend::AuthBackend;
pub use claims::Claims;
pub use classifier::{classify, is_static_asset, RouteClass};
pub use config::{
    safe_return_path, sign_in_path, AuthConfig, CALLBACK_PATH, POST_SIGN_IN_PATH, SESSION_COOKIE,
    SIGN_IN_COOKIE, SIGN_IN_PATH, UNAUTHORIZED_PATH,
};
pub use context::AuthContext;
pub use error::{AuthError, SessionResolutionError};
pub use extractors::{AdminUser, AuthUser};
pub use gate::{AuthorizationGate, GateDecision, GateOutcome, GateState};
pub use jwt::{SessionCodec, SignInState};
pub use middleware::gate_middleware;
pub use mirror::{MirrorGate, MirrorHandle, MirrorView, Navigation};
pub use provider::{IdentityProvider, IdentityProviderFactory, ProviderConfig, ProviderError};
pub use roles::{extract_roles, is_authorized, RoleLocation, RoleSet, ADMIN_ROLE};
pub use session::{ProviderSessionResolver, SessionResolver};

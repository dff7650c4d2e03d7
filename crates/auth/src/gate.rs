//! Authorization gate
//!
//! Per-request decision procedure for protected routes:
//!
//! ```text
//! Start ──Authenticated──▶ SessionChecked ──RolesExtracted──▶ RoleChecked
//!   │                                                          │      │
//!   └─Unauthenticated─▶ Denied ◀──────────AdminRoleMissing─────┘      │
//!                                                  Allowed ◀─AdminRolePresent
//! any non-terminal ──SessionFailed──▶ Errored
//! ```
//!
//! Allowed, Denied and Errored are terminal. The gate fails closed: an
//! illegal transition is treated as Errored and never as Allowed.

use std::sync::Arc;

use axum::http::HeaderMap;
pub use reportdesk_common::StateError;

use crate::classifier::{classify, RouteClass};
use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::roles::{is_authorized, RoleSet};
use crate::session::SessionResolver;

/// Gate evaluation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateState {
    Start,
    SessionChecked,
    RoleChecked,
    Allowed,
    Denied,
    Errored,
}

impl GateState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Allowed | Self::Denied | Self::Errored)
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::SessionChecked => write!(f, "session_checked"),
            Self::RoleChecked => write!(f, "role_checked"),
            Self::Allowed => write!(f, "allowed"),
            Self::Denied => write!(f, "denied"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Events that drive the gate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateEvent {
    Authenticated,
    Unauthenticated,
    SessionFailed,
    RolesExtracted,
    AdminRolePresent,
    AdminRoleMissing,
}

impl std::fmt::Display for GateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticated => write!(f, "authenticated"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::SessionFailed => write!(f, "session_failed"),
            Self::RolesExtracted => write!(f, "roles_extracted"),
            Self::AdminRolePresent => write!(f, "admin_role_present"),
            Self::AdminRoleMissing => write!(f, "admin_role_missing"),
        }
    }
}

/// Gate state machine
pub struct GateStateMachine;

impl GateStateMachine {
    /// Attempt a state transition
    pub fn transition(current: GateState, event: GateEvent) -> Result<GateState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (_, GateEvent::SessionFailed) => GateState::Errored,
            (GateState::Start, GateEvent::Authenticated) => GateState::SessionChecked,
            (GateState::Start, GateEvent::Unauthenticated) => GateState::Denied,
            (GateState::SessionChecked, GateEvent::RolesExtracted) => GateState::RoleChecked,
            (GateState::RoleChecked, GateEvent::AdminRolePresent) => GateState::Allowed,
            (GateState::RoleChecked, GateEvent::AdminRoleMissing) => GateState::Denied,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Transition, collapsing any rejected transition into `Errored`
    fn advance(current: GateState, event: GateEvent) -> GateState {
        Self::transition(current, event).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Rejected gate transition, failing closed");
            GateState::Errored
        })
    }
}

/// Outcome of evaluating the gate for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// No valid session; sign in, then return to `return_path`
    RedirectSignIn { return_path: String },
    /// Signed in without the admin role
    RedirectUnauthorized,
    /// Session could not be resolved; handled exactly like `RedirectSignIn`
    RedirectSignInOnError { return_path: String },
}

impl GateDecision {
    /// Absolute redirect target, or `None` when the request may proceed
    pub fn redirect_location(&self, config: &AuthConfig) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectSignIn { return_path } | Self::RedirectSignInOnError { return_path } => {
                Some(config.sign_in_url(return_path))
            }
            Self::RedirectUnauthorized => Some(config.unauthorized_url()),
        }
    }
}

impl std::fmt::Display for GateDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::RedirectSignIn { .. } => write!(f, "redirect_sign_in"),
            Self::RedirectUnauthorized => write!(f, "redirect_unauthorized"),
            Self::RedirectSignInOnError { .. } => write!(f, "redirect_sign_in_on_error"),
        }
    }
}

/// Result of a gate evaluation
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub decision: GateDecision,
    /// Resolved context; `None` for public routes and resolution failures
    pub context: Option<AuthContext>,
    pub state: GateState,
}

/// Evaluates requests against the admin policy
#[derive(Clone)]
pub struct AuthorizationGate {
    resolver: Arc<dyn SessionResolver>,
}

impl AuthorizationGate {
    pub fn new(resolver: Arc<dyn SessionResolver>) -> Self {
        Self { resolver }
    }

    /// Decide whether a request for `path` may proceed. Performs no writes.
    pub async fn evaluate(&self, path: &str, headers: &HeaderMap) -> GateOutcome {
        if classify(path) == RouteClass::Public {
            return GateOutcome {
                decision: GateDecision::Allow,
                context: None,
                state: GateState::Allowed,
            };
        }

        let context = match self.resolver.resolve(headers).await {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                tracing::warn!(error = %e, path = %path, "Session resolution failed");
                None
            }
        };

        let session_event = match &context {
            None => GateEvent::SessionFailed,
            Some(ctx) if ctx.is_authenticated => GateEvent::Authenticated,
            Some(_) => GateEvent::Unauthenticated,
        };
        let mut state = GateStateMachine::advance(GateState::Start, session_event);

        if state == GateState::SessionChecked {
            let roles = context
                .as_ref()
                .map_or_else(RoleSet::empty, AuthContext::roles);
            state = GateStateMachine::advance(state, GateEvent::RolesExtracted);

            if state == GateState::RoleChecked {
                let role_event = if is_authorized(&roles) {
                    GateEvent::AdminRolePresent
                } else {
                    GateEvent::AdminRoleMissing
                };
                state = GateStateMachine::advance(state, role_event);
            }
        }

        let return_path = path.to_string();
        let authenticated = context.as_ref().is_some_and(|ctx| ctx.is_authenticated);
        let decision = match state {
            GateState::Allowed => GateDecision::Allow,
            GateState::Denied if authenticated => GateDecision::RedirectUnauthorized,
            GateState::Denied => GateDecision::RedirectSignIn { return_path },
            _ => GateDecision::RedirectSignInOnError { return_path },
        };

        tracing::debug!(
            path = %path,
            state = %state,
            decision = %decision,
            subject = context.as_ref().and_then(AuthContext::subject).unwrap_or("-"),
            "Gate evaluated"
        );

        GateOutcome {
            decision,
            context,
            state,
        }
    }
}

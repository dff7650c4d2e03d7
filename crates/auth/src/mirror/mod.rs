//! Client-side mirror of the authorization gate
//!
//! Renders protected views in a client: fetches the current user from
//! `GET /api/auth/user` in the background and publishes what the view
//! should show through a watch channel. The decision uses the same
//! [`extract_roles`] and [`is_authorized`] as the server gate.
//!
//! The fetch is tied to a `CancellationToken`. Dropping the handle cancels
//! it, and a result arriving after cancellation is discarded.

pub mod source;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::api::UserInfo;
use crate::claims::Claims;
use crate::config::{sign_in_path, UNAUTHORIZED_PATH};
use crate::roles::{extract_roles, is_authorized};

pub use source::{HttpUserSource, UserSource};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MirrorError {
    #[error("User request error: {0}")]
    Request(String),

    #[error("User response error: {0}")]
    Response(String),
}

/// Where the client should navigate instead of rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    SignIn { redirect_to: String },
    Unauthorized,
}

impl Navigation {
    /// Site-relative target
    pub fn href(&self) -> String {
        match self {
            Self::SignIn { redirect_to } => sign_in_path(redirect_to),
            Self::Unauthorized => UNAUTHORIZED_PATH.to_string(),
        }
    }
}

/// What a protected view shows
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorView {
    /// Fetch outstanding; show neither content nor redirect
    Loading,
    Navigate(Navigation),
    Render(UserInfo),
}

/// Flags derived from the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub is_admin: bool,
}

impl From<&MirrorView> for AuthSnapshot {
    fn from(view: &MirrorView) -> Self {
        let (is_loading, is_authenticated, is_admin) = match view {
            MirrorView::Loading => (true, false, false),
            MirrorView::Navigate(Navigation::SignIn { .. }) => (false, false, false),
            MirrorView::Navigate(Navigation::Unauthorized) => (false, true, false),
            MirrorView::Render(_) => (false, true, true),
        };
        Self {
            is_loading,
            is_authenticated,
            is_admin,
        }
    }
}

/// Decide the view for a settled fetch.
///
/// Transport failures, non-object bodies and 401s all mean "not signed in".
pub fn decide(fetched: Result<Option<Value>, MirrorError>, current_path: &str) -> MirrorView {
    let claims = match fetched {
        Ok(Some(body)) => Claims::from_value(body),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Current user fetch failed, treating as signed out");
            None
        }
    };

    let Some(claims) = claims else {
        return MirrorView::Navigate(Navigation::SignIn {
            redirect_to: current_path.to_string(),
        });
    };

    let roles = extract_roles(Some(&claims));
    if !is_authorized(&roles) {
        return MirrorView::Navigate(Navigation::Unauthorized);
    }

    MirrorView::Render(UserInfo {
        sub: claims.subject().map(str::to_string),
        name: claims.name().map(str::to_string),
        email: claims.email().map(str::to_string),
        picture: claims.picture().map(str::to_string),
        roles: roles.to_vec(),
    })
}

/// Spawns mirror-gate fetches
pub struct MirrorGate;

impl MirrorGate {
    /// Start fetching the current user for the view at `current_path`
    pub fn spawn(source: Arc<dyn UserSource>, current_path: impl Into<String>) -> MirrorHandle {
        let current_path = current_path.into();
        let (tx, rx) = watch::channel(MirrorView::Loading);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = task_cancel.cancelled() => {
                    tracing::debug!(path = %current_path, "Mirror fetch cancelled");
                }
                fetched = source.fetch_user() => {
                    if task_cancel.is_cancelled() {
                        return;
                    }
                    tx.send_replace(decide(fetched, &current_path));
                }
            }
        });

        MirrorHandle {
            view: rx,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
            task,
        }
    }
}

/// Owner of a running mirror-gate fetch; dropping it cancels the fetch
pub struct MirrorHandle {
    view: watch::Receiver<MirrorView>,
    cancel: CancellationToken,
    _guard: DropGuard,
    task: JoinHandle<()>,
}

impl MirrorHandle {
    /// Current view
    pub fn view(&self) -> MirrorView {
        self.view.borrow().clone()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot::from(&*self.view.borrow())
    }

    /// Receiver for view changes
    pub fn subscribe(&self) -> watch::Receiver<MirrorView> {
        self.view.clone()
    }

    /// Wait for the fetch to settle; `None` if it was cancelled first
    pub async fn settled(&mut self) -> Option<MirrorView> {
        self.view
            .wait_for(|view| !matches!(view, MirrorView::Loading))
            .await
            .ok()
            .map(|view| view.clone())
    }

    /// Cancel the outstanding fetch; the view stays as it is
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

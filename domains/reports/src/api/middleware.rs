//! Reports domain state and auth backend integration

use axum::extract::FromRef;
use reportdesk_auth::AuthBackend;
use std::sync::Arc;

use crate::client::ReportsService;

/// Application state for the Reports domain
#[derive(Clone)]
pub struct ReportsState {
    pub reports: Arc<dyn ReportsService>,
    pub auth: AuthBackend,
}

impl FromRef<ReportsState> for AuthBackend {
    fn from_ref(state: &ReportsState) -> Self {
        state.auth.clone()
    }
}

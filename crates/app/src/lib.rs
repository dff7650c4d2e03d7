//! Reportdesk application composition root
//!
//! Composes the auth, reports and page routers into a single application
//! behind the authorization gate.

pub mod pages;

use axum::{middleware, routing::get, Router};
use reportdesk_auth::{
    gate_middleware, AuthBackend, AuthConfig, IdentityProviderFactory, ProviderConfig,
};
use reportdesk_common::Config;
use reportdesk_reports::{ReportsConfig, ReportsServiceFactory, ReportsState};
use std::sync::Arc;

/// Create the main application router with all routes and middleware
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig {
        base_url: config.base_url.clone(),
        session_secret: config.session_secret.clone(),
        session_ttl_secs: config.session_ttl_secs,
        cookie_secure: config.cookie_secure,
    };

    let provider = IdentityProviderFactory::create(ProviderConfig::from_config(config))?;
    let backend = AuthBackend::new(auth_config, Arc::from(provider));

    let reports = ReportsServiceFactory::create(ReportsConfig::from_config(config))?;
    let reports_state = ReportsState {
        reports: Arc::from(reports),
        auth: backend.clone(),
    };

    Ok(compose(backend, reports_state))
}

/// Assemble routers around an existing backend and reports state
pub fn compose(backend: AuthBackend, reports_state: ReportsState) -> Router {
    let gated = Router::new()
        .merge(reportdesk_auth::api::routes().with_state(backend.clone()))
        .merge(pages::routes().with_state(backend.clone()))
        .merge(reportdesk_reports::routes().with_state(reports_state))
        .fallback(pages::not_found)
        .layer(middleware::from_fn_with_state(backend, gate_middleware));

    // Outside the gate layer
    gated.route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

//! Route definitions for Reports domain API

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{insights, reports, training};
use super::middleware::ReportsState;

/// Create report review routes
fn report_routes() -> Router<ReportsState> {
    Router::new()
        .route("/api/reports", get(reports::list_reports))
        .route(
            "/api/reports/{id}",
            get(reports::get_report).patch(reports::update_report),
        )
        .route("/api/reports/{id}/status", patch(reports::update_status))
        .route("/api/reports/{id}/prompt", post(reports::generate_prompt))
}

/// Create insights routes
fn insights_routes() -> Router<ReportsState> {
    Router::new().route("/api/insights", get(insights::get_insights))
}

/// Create training dataset routes
fn training_routes() -> Router<ReportsState> {
    Router::new()
        .route("/api/training", get(training::list_training))
        .route("/api/training/export", get(training::export_training))
}

/// Create all Reports domain API routes
pub fn routes() -> Router<ReportsState> {
    Router::new()
        .merge(report_routes())
        .merge(insights_routes())
        .merge(training_routes())
}

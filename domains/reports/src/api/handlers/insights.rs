//! Insights API handler

use axum::{extract::State, Json};
use chrono::Utc;
use reportdesk_auth::AdminUser;
use reportdesk_common::Result;

use crate::api::middleware::ReportsState;
use crate::domain::insights::{self, Insights};

/// Summary metrics over all reports
pub async fn get_insights(
    AdminUser(_): AdminUser,
    State(state): State<ReportsState>,
) -> Result<Json<Insights>> {
    let page = state.reports.list_reports().await?;
    Ok(Json(insights::compute(&page.reports, Utc::now())))
}

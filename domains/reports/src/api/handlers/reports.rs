//! Report review API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use reportdesk_auth::AdminUser;
use reportdesk_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::ReportsState;
use crate::domain::entities::{
    ErrorCategory, Report, ReportDetail, ReportStatus, ReportUpdate, Severity,
};
use crate::domain::listing::{self, ListQuery, ReportListing};
use crate::domain::prompt::{build_improvement_prompt, PromptInputs};
use crate::domain::state::{ReportEvent, ReportStateMachine};

/// Request for updating a report's review fields
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    pub status: Option<ReportStatus>,
    pub error_category: Option<ErrorCategory>,
    pub severity: Option<Severity>,

    #[validate(length(max = 20000, message = "Expected response is too long"))]
    pub expected_response: Option<String>,

    #[validate(length(max = 20000, message = "Reviewer notes are too long"))]
    pub reviewer_notes: Option<String>,

    pub use_for_training: Option<bool>,
}

impl From<UpdateReportRequest> for ReportUpdate {
    fn from(req: UpdateReportRequest) -> Self {
        Self {
            status: req.status,
            error_category: req.error_category,
            severity: req.severity,
            expected_response: req.expected_response,
            reviewer_notes: req.reviewer_notes,
            use_for_training: req.use_for_training,
        }
    }
}

/// Request for changing only the status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
}

/// Classification overrides for the improvement prompt
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePromptRequest {
    pub category: Option<ErrorCategory>,
    pub severity: Option<Severity>,

    #[validate(length(max = 20000, message = "Expected response is too long"))]
    pub expected_response: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// List reports with filtering, search and sorting
pub async fn list_reports(
    AdminUser(_): AdminUser,
    State(state): State<ReportsState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ReportListing>> {
    let page = state.reports.list_reports().await?;
    Ok(Json(listing::list(page.reports, &query)))
}

/// Get a report with its conversation
pub async fn get_report(
    AdminUser(_): AdminUser,
    State(state): State<ReportsState>,
    Path(id): Path<String>,
) -> Result<Json<ReportDetail>> {
    let detail = state.reports.get_report_detail(&id).await?;
    Ok(Json(detail))
}

/// Save classification, notes, training flag and status
pub async fn update_report(
    AdminUser(ctx): AdminUser,
    State(state): State<ReportsState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateReportRequest>,
) -> Result<Json<Report>> {
    let update = ReportUpdate::from(req);
    if update.is_empty() {
        return Err(Error::Validation("No fields to update".to_string()));
    }

    let report = state.reports.update_report(&id, &update).await?;
    tracing::info!(
        report_id = %id,
        reviewer = ctx.subject().unwrap_or("-"),
        "Report review saved"
    );
    Ok(Json(report))
}

/// Move a report to another status
pub async fn update_status(
    AdminUser(ctx): AdminUser,
    State(state): State<ReportsState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<Report>> {
    let current = state.reports.get_report_detail(&id).await?.report.status;

    let next = ReportStateMachine::transition(current, ReportEvent::to_status(req.status))
        .map_err(|e| Error::Conflict(e.to_string()))?;

    let report = state.reports.update_status(&id, next).await?;
    tracing::info!(
        report_id = %id,
        from = %current,
        to = %next,
        reviewer = ctx.subject().unwrap_or("-"),
        "Report status changed"
    );
    Ok(Json(report))
}

/// Build the improvement prompt for a report
pub async fn generate_prompt(
    AdminUser(_): AdminUser,
    State(state): State<ReportsState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<GeneratePromptRequest>,
) -> Result<Json<PromptResponse>> {
    let detail = state.reports.get_report_detail(&id).await?;
    let report = &detail.report;

    let inputs = PromptInputs {
        category: req
            .category
            .or(report.error_category)
            .map(|c| c.to_string())
            .unwrap_or_default(),
        severity: req
            .severity
            .or(report.severity)
            .map(|s| s.to_string())
            .unwrap_or_default(),
        expected_response: req
            .expected_response
            .or_else(|| report.expected_response.clone())
            .unwrap_or_default(),
    };

    Ok(Json(PromptResponse {
        prompt: build_improvement_prompt(&detail, &inputs),
    }))
}

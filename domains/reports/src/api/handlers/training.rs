//! Training dataset handlers

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use reportdesk_auth::AdminUser;
use reportdesk_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::api::middleware::ReportsState;
use crate::domain::entities::Report;
use crate::domain::export::{self, ExportFormat};

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Reports marked for the training dataset
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResponse {
    pub reports: Vec<Report>,
    pub count: usize,
}

/// List reports marked for training
pub async fn list_training(
    AdminUser(_): AdminUser,
    State(state): State<ReportsState>,
) -> Result<Json<TrainingResponse>> {
    let page = state.reports.list_reports().await?;
    let reports: Vec<Report> = export::training_examples(&page.reports)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(TrainingResponse {
        count: reports.len(),
        reports,
    }))
}

/// Download the training dataset as CSV or JSON
pub async fn export_training(
    AdminUser(ctx): AdminUser,
    State(state): State<ReportsState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response> {
    let page = state.reports.list_reports().await?;
    let examples = export::training_examples(&page.reports);

    if examples.is_empty() {
        return Err(Error::Unprocessable(
            "No reports marked for training".to_string(),
        ));
    }

    let format = query.format;
    let body = match format {
        ExportFormat::Csv => export::to_csv(&examples),
        ExportFormat::Json => export::to_json(&examples)?,
    };

    tracing::info!(
        count = examples.len(),
        format = format.filename(),
        reviewer = ctx.subject().unwrap_or("-"),
        "Training dataset exported"
    );

    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.filename()),
            ),
        ],
        body,
    )
        .into_response())
}

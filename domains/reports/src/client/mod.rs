//! Reports API integration
//!
//! Provides access to the upstream response-reports API:
//! - HTTP client for production
//! - In-memory service for testing and local development

pub mod http;
pub mod mock;

use reportdesk_common::{Config, Error};
use thiserror::Error;

use crate::domain::entities::{Report, ReportDetail, ReportStatus, ReportUpdate, ReportsPage};

#[derive(Error, Debug)]
pub enum ReportsError {
    #[error("Reports configuration error: {0}")]
    Configuration(String),

    #[error("Reports request error: {0}")]
    Request(String),

    #[error("Reports response error: {0}")]
    Response(String),

    #[error("Report not found: {0}")]
    NotFound(String),
}

impl From<ReportsError> for Error {
    fn from(err: ReportsError) -> Self {
        match err {
            ReportsError::NotFound(id) => Error::NotFound(format!("Report {} not found", id)),
            ReportsError::Configuration(msg) => Error::Internal(msg),
            other => Error::Upstream(other.to_string()),
        }
    }
}

/// Reports service configuration.
#[derive(Debug, Clone)]
pub struct ReportsConfig {
    /// Reports provider (http, mock)
    pub provider: String,
    /// Base URL of the reports API (without `/v1`)
    pub base_url: String,
}

impl ReportsConfig {
    /// Take the reports settings out of the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            provider: config.reports_provider.clone(),
            base_url: config.reports_api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Reports service trait for different implementations.
#[async_trait::async_trait]
pub trait ReportsService: Send + Sync {
    /// All reports, in upstream order.
    async fn list_reports(&self) -> Result<ReportsPage, ReportsError>;

    /// A report with its conversation and messages.
    async fn get_report_detail(&self, id: &str) -> Result<ReportDetail, ReportsError>;

    /// Apply a partial update and return the stored report.
    async fn update_report(&self, id: &str, update: &ReportUpdate)
        -> Result<Report, ReportsError>;

    /// Change only the status.
    async fn update_status(&self, id: &str, status: ReportStatus) -> Result<Report, ReportsError> {
        self.update_report(id, &ReportUpdate::status(status)).await
    }
}

/// Factory for creating ReportsService implementations.
pub struct ReportsServiceFactory;

impl ReportsServiceFactory {
    /// Create a ReportsService based on configuration.
    pub fn create(config: ReportsConfig) -> Result<Box<dyn ReportsService>, ReportsError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!(base_url = %config.base_url, "Creating HTTP reports service");
                Ok(Box::new(http::HttpReportsService::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock reports service");
                Ok(Box::new(mock::MockReportsService::with_sample_data()))
            }
            provider => Err(ReportsError::Configuration(format!(
                "Unknown reports provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}

//! Reports API HTTP client
//!
//! Talks to `{base_url}/v1/response-reports` and `/v1/response-reports/{id}`.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ReportsConfig, ReportsError, ReportsService};
use crate::domain::entities::{Report, ReportDetail, ReportUpdate, ReportsPage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP implementation of [`ReportsService`].
pub struct HttpReportsService {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpReportsService {
    /// Create a new client from configuration.
    pub fn new(config: ReportsConfig) -> Result<Self, ReportsError> {
        if config.base_url.is_empty() {
            return Err(ReportsError::Configuration(
                "REPORTS_API_BASE_URL is required for the http reports provider".to_string(),
            ));
        }

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ReportsError::Configuration(format!("Invalid reports API URL: {}", e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ReportsError::Configuration(format!(
                "Invalid reports API URL: {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReportsError::Configuration(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn reports_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "response-reports"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        id: Option<&str>,
    ) -> Result<T, ReportsError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Reports API request failed");
            ReportsError::Request(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ReportsError::NotFound(id.to_string()));
            }
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            tracing::error!(%status, "Reports API returned an error");
            return Err(ReportsError::Response(format!(
                "Reports API returned {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ReportsError::Response(format!("Invalid reports API response: {}", e)))
    }
}

#[async_trait::async_trait]
impl ReportsService for HttpReportsService {
    async fn list_reports(&self) -> Result<ReportsPage, ReportsError> {
        let page: ReportsPage = self
            .send(self.http.get(self.reports_url(None)), None)
            .await?;
        tracing::debug!(count = page.count, "Fetched reports");
        Ok(page)
    }

    async fn get_report_detail(&self, id: &str) -> Result<ReportDetail, ReportsError> {
        self.send(self.http.get(self.reports_url(Some(id))), Some(id))
            .await
    }

    async fn update_report(
        &self,
        id: &str,
        update: &ReportUpdate,
    ) -> Result<Report, ReportsError> {
        let request = self
            .http
            .request(Method::PATCH, self.reports_url(Some(id)))
            .json(update);
        let report: Report = self.send(request, Some(id)).await?;
        tracing::info!(report_id = %id, status = %report.status, "Report updated");
        Ok(report)
    }
}

//! Training dataset export (CSV and JSON)

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::entities::Report;

const CSV_HEADER: &str = "conversationId,generationId,userMessage,assistantResponse,expectedResponse,category,severity,status,createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            Self::Csv => "training-dataset.csv",
            Self::Json => "training-dataset.json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

/// One exported training example
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecord {
    pub conversation_id: String,
    pub generation_id: String,
    pub user_message: String,
    pub assistant_response: String,
    pub expected_response: String,
    pub category: String,
    pub severity: String,
    pub status: String,
    pub created_at: String,
}

impl From<&Report> for TrainingRecord {
    fn from(report: &Report) -> Self {
        Self {
            conversation_id: report.conversation_id.clone(),
            generation_id: report.generation_id.clone(),
            user_message: report.user_message.clone(),
            assistant_response: report.assistant_response.clone(),
            expected_response: report.expected_response.clone().unwrap_or_default(),
            category: report
                .error_category
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            severity: report
                .severity
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            status: report.status.to_string(),
            created_at: timestamp(&report.created_at),
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reports marked for the training dataset, in input order
pub fn training_examples(reports: &[Report]) -> Vec<&Report> {
    reports.iter().filter(|r| r.is_training_example()).collect()
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// CSV with the three free-text columns always quoted
pub fn to_csv(reports: &[&Report]) -> String {
    let rows = reports.iter().map(|report| {
        let record = TrainingRecord::from(*report);
        [
            record.conversation_id,
            record.generation_id,
            quoted(&record.user_message),
            quoted(&record.assistant_response),
            quoted(&record.expected_response),
            record.category,
            record.severity,
            record.status,
            record.created_at,
        ]
        .join(",")
    });

    std::iter::once(CSV_HEADER.to_string())
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON array of training records
pub fn to_json(reports: &[&Report]) -> serde_json::Result<String> {
    let records: Vec<TrainingRecord> = reports.iter().map(|r| TrainingRecord::from(*r)).collect();
    serde_json::to_string_pretty(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures::{day, report};
    use crate::domain::entities::{ErrorCategory, ReportStatus, Severity};

    fn marked() -> Report {
        let mut r = report("r1", ReportStatus::Resolved, day(2024, 5, 1));
        r.user_message = "Say \"hi\"".to_string();
        r.assistant_response = "hello, world".to_string();
        r.expected_response = Some("hi".to_string());
        r.error_category = Some(ErrorCategory::VeryGeneric);
        r.severity = Some(Severity::Low);
        r.use_for_training = Some(true);
        r
    }

    #[test]
    fn test_training_examples_filter() {
        let mut unmarked = report("r2", ReportStatus::Pending, day(2024, 5, 2));
        unmarked.use_for_training = Some(false);
        let untouched = report("r3", ReportStatus::Pending, day(2024, 5, 2));
        let reports = vec![marked(), unmarked, untouched];

        let examples = training_examples(&reports);
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].id, "r1");
    }

    #[test]
    fn test_csv_layout() {
        let r = marked();
        let csv = to_csv(&[&r]);
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            "conv-r1,gen-r1,\"Say \"\"hi\"\"\",\"hello, world\",\"hi\",VERY_GENERIC,LOW,RESOLVED,2024-05-01T12:00:00.000Z"
        );
    }

    #[test]
    fn test_csv_missing_optionals_are_empty() {
        let mut r = report("r4", ReportStatus::Pending, day(2024, 5, 3));
        r.use_for_training = Some(true);
        let csv = to_csv(&[&r]);
        assert!(csv.ends_with(",\"\",,,PENDING,2024-05-03T12:00:00.000Z"));
    }

    #[test]
    fn test_json_export() {
        let r = marked();
        let json = to_json(&[&r]).unwrap();
        assert!(json.starts_with("[\n  {\n"));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["conversationId"], "conv-r1");
        assert_eq!(parsed[0]["category"], "VERY_GENERIC");
        assert_eq!(parsed[0]["userMessage"], "Say \"hi\"");
        assert_eq!(parsed[0]["createdAt"], "2024-05-01T12:00:00.000Z");
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Csv.filename(), "training-dataset.csv");
        assert_eq!(ExportFormat::Json.content_type(), "application/json");
        assert_eq!(ExportFormat::default(), ExportFormat::Csv);
    }
}

//! In-memory reports service
//!
//! Holds reports and their conversations in memory for tests and local
//! development. Thread-safe via `Arc<Mutex<>>`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};

use super::{ReportsError, ReportsService};
use crate::domain::entities::{
    Conversation, ErrorCategory, Message, MessageRole, Report, ReportDetail, ReportStatus,
    ReportUpdate, ReportsPage, Severity,
};

#[derive(Debug, Default)]
struct MockState {
    reports: Vec<Report>,
    conversations: HashMap<String, (Conversation, Vec<Message>)>,
}

/// Mock reports service backed by memory.
#[derive(Debug, Clone, Default)]
pub struct MockReportsService {
    state: Arc<Mutex<MockState>>,
    unavailable: Arc<AtomicBool>,
}

impl MockReportsService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Service preloaded with a handful of demo reports.
    pub fn with_sample_data() -> Self {
        let service = Self::new();
        let now = Utc::now();

        let samples = [
            (
                "demo-1",
                "What's the capital of Australia?",
                "The capital of Australia is Sydney.",
                "Wrong answer, it is Canberra",
                ReportStatus::Pending,
                Some((ErrorCategory::Hallucination, Severity::High)),
                0,
            ),
            (
                "demo-2",
                "Summarize my last invoice",
                "I can help with many things! Let me know what you need.",
                "Did not answer the question",
                ReportStatus::Resolved,
                Some((ErrorCategory::VeryGeneric, Severity::Medium)),
                2,
            ),
            (
                "demo-3",
                "Translate 'good morning' to Spanish",
                "Bonjour",
                "That is French",
                ReportStatus::Dismissed,
                None,
                5,
            ),
        ];

        for (id, question, answer, reason, status, classification, age_days) in samples {
            let created_at = now - Duration::days(age_days);
            let report = Report {
                id: id.to_string(),
                conversation_id: format!("conv-{}", id),
                generation_id: format!("gen-{}", id),
                user_id: "demo-user".to_string(),
                user_message: question.to_string(),
                assistant_response: answer.to_string(),
                reason: reason.to_string(),
                status,
                created_at,
                updated_at: created_at,
                error_category: classification.map(|(c, _)| c),
                severity: classification.map(|(_, s)| s),
                expected_response: None,
                reviewer_notes: None,
                use_for_training: Some(status == ReportStatus::Resolved),
            };

            let messages = vec![
                message(MessageRole::System, "You are a helpful assistant."),
                message(MessageRole::User, question),
                message(MessageRole::Assistant, answer),
            ];
            service.insert_with_conversation(report, messages);
        }

        service
    }

    /// Store a report (replacing one with the same id).
    pub fn insert(&self, report: Report) {
        let mut state = self.state.lock().expect("mock reports lock poisoned");
        match state.reports.iter_mut().find(|r| r.id == report.id) {
            Some(existing) => *existing = report,
            None => state.reports.push(report),
        }
    }

    /// Store a report together with its conversation messages.
    pub fn insert_with_conversation(&self, report: Report, messages: Vec<Message>) {
        let conversation = Conversation {
            id: report.conversation_id.clone(),
            title: Some(format!("Conversation {}", report.conversation_id)),
            status: Some("active".to_string()),
            message_count: u32::try_from(messages.len()).ok(),
            last_message_date: Some(report.created_at),
        };
        self.state
            .lock()
            .expect("mock reports lock poisoned")
            .conversations
            .insert(report.conversation_id.clone(), (conversation, messages));
        self.insert(report);
    }

    /// Snapshot of a stored report.
    pub fn report(&self, id: &str) -> Option<Report> {
        self.state
            .lock()
            .expect("mock reports lock poisoned")
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Make every call fail as if the upstream API were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>, ReportsError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ReportsError::Request(
                "mock reports service unavailable".to_string(),
            ));
        }
        self.state
            .lock()
            .map_err(|e| ReportsError::Request(format!("mock reports lock poisoned: {e}")))
    }
}

fn message(role: MessageRole, content: &str) -> Message {
    Message {
        role,
        content: content.to_string(),
        content_data: None,
        timestamp: None,
        message_id: None,
        generation_id: None,
        id: None,
        report: None,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait::async_trait]
impl ReportsService for MockReportsService {
    async fn list_reports(&self) -> Result<ReportsPage, ReportsError> {
        let state = self.lock()?;
        Ok(ReportsPage {
            reports: state.reports.clone(),
            count: state.reports.len(),
        })
    }

    async fn get_report_detail(&self, id: &str) -> Result<ReportDetail, ReportsError> {
        let state = self.lock()?;
        let report = state
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ReportsError::NotFound(id.to_string()))?;

        let (conversation, messages) = state
            .conversations
            .get(&report.conversation_id)
            .cloned()
            .unwrap_or_else(|| {
                (
                    Conversation {
                        id: report.conversation_id.clone(),
                        title: None,
                        status: None,
                        message_count: Some(0),
                        last_message_date: None,
                    },
                    Vec::new(),
                )
            });

        Ok(ReportDetail {
            report,
            conversation,
            messages,
        })
    }

    async fn update_report(
        &self,
        id: &str,
        update: &ReportUpdate,
    ) -> Result<Report, ReportsError> {
        let mut state = self.lock()?;
        let report = state
            .reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReportsError::NotFound(id.to_string()))?;

        report.apply(update, Utc::now());
        tracing::debug!(report_id = %id, "Mock reports: updated report");
        Ok(report.clone())
    }
}

//! Reports domain: failure reports, review workflow, insights, training export

pub mod api;
pub mod client;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    ContentData, ContentItem, Conversation, ErrorCategory, Message, MessageRole, Report,
    ReportDetail, ReportStatus, ReportUpdate, ReportsPage, Severity,
};
pub use domain::state::{ReportEvent, ReportStateMachine, StateError};

// Re-export client types
pub use client::{ReportsConfig, ReportsError, ReportsService, ReportsServiceFactory};

// Re-export API types
pub use api::routes;
pub use api::ReportsState;

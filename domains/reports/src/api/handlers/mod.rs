//! HTTP handlers for the Reports domain

pub mod insights;
pub mod reports;
pub mod training;

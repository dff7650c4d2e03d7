//! Reports domain types and pure review logic

pub mod entities;
pub mod export;
pub mod insights;
pub mod listing;
pub mod prompt;
pub mod state;

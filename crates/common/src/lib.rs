//! Shared configuration, error handling, and extractors for Reportdesk
//!
//! This crate provides common functionality used across the Reportdesk service:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP rendering
//! - Validating JSON extractor
//! - State machine error type

pub mod config;
pub mod error;
pub mod extractors;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use state::StateError;

//! State machine error type
//!
//! Used by the authorization gate and the report status machine.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_messages() {
        let err = StateError::InvalidTransition {
            from: "pending".to_string(),
            event: "set_status(pending)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid transition: cannot transition from pending via set_status(pending)"
        );

        let err = StateError::TerminalState("allowed".to_string());
        assert!(err.to_string().contains("allowed is a terminal state"));
    }
}

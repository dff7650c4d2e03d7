//! State machine for report review status
//!
//! PENDING, RESOLVED and DISMISSED are all reachable from each other.
//! Moving a report to the status it already has is not a transition.

pub use reportdesk_common::StateError;

use super::entities::ReportStatus;

/// Events that trigger report status transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportEvent {
    /// Reviewer fixed or acknowledged the problem
    Resolve,
    /// Reviewer decided the report is not actionable
    Dismiss,
    /// Put the report back in the review queue
    Reopen,
}

impl ReportEvent {
    /// Event that moves a report to `target`
    pub fn to_status(target: ReportStatus) -> Self {
        match target {
            ReportStatus::Pending => Self::Reopen,
            ReportStatus::Resolved => Self::Resolve,
            ReportStatus::Dismissed => Self::Dismiss,
        }
    }

    fn target(&self) -> ReportStatus {
        match self {
            Self::Resolve => ReportStatus::Resolved,
            Self::Dismiss => ReportStatus::Dismissed,
            Self::Reopen => ReportStatus::Pending,
        }
    }
}

impl std::fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve => write!(f, "resolve"),
            Self::Dismiss => write!(f, "dismiss"),
            Self::Reopen => write!(f, "reopen"),
        }
    }
}

impl ReportStatus {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ReportStatus] {
        match self {
            Self::Pending => &[Self::Resolved, Self::Dismissed],
            Self::Resolved => &[Self::Pending, Self::Dismissed],
            Self::Dismissed => &[Self::Pending, Self::Resolved],
        }
    }
}

/// Report status state machine
pub struct ReportStateMachine;

impl ReportStateMachine {
    /// Attempt a state transition
    pub fn transition(current: ReportStatus, event: ReportEvent) -> Result<ReportStatus, StateError> {
        let next = event.target();

        if !current.valid_transitions().contains(&next) {
            return Err(StateError::InvalidTransition {
                from: current.to_string(),
                event: event.to_string(),
            });
        }

        Ok(next)
    }
}

//! Error types for the editor

use crate::tracker::TrackerState;
use crate::validation::ValidationIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid change list: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("A commit is already in flight")]
    CommitInFlight,

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: TrackerState,
    },

    #[error("Unknown change: {0}")]
    UnknownChange(String),

    #[error("Tracking session is closed")]
    SessionClosed,
}

/// Failure of the commit round-trip to the storage layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("rejected by server: {0}")]
    Rejected(String),

    #[error("commit task aborted: {0}")]
    Aborted(String),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

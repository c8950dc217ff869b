use serde::{Deserialize, Serialize};
use std::fmt;
use crate::request::AddRequest;

/// Result of a single add call against a management service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    /// The service answered but declined the add (duplicate, validation, ...)
    Rejected(String),
    /// The service could not be reached
    TransportFailed(String),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Added => write!(f, "added"),
            AddOutcome::Rejected(reason) => write!(f, "rejected: {}", reason),
            AddOutcome::TransportFailed(reason) => write!(f, "transport failed: {}", reason),
        }
    }
}

/// Why an entry never reached a management service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Media type is neither movie nor show
    UnsupportedMediaType,
    /// The environment has no show service configured
    NoShowService,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedMediaType => write!(f, "unsupported media type"),
            SkipReason::NoShowService => write!(f, "no show service configured"),
        }
    }
}

/// Terminal state of one watchlist entry after a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EntryOutcome {
    Dispatched { outcome: AddOutcome },
    /// Dry run: the request that would have been sent
    Planned { request: AddRequest },
    Skipped { reason: SkipReason },
    /// The metadata search had no result
    NotFound,
    /// The metadata search could not be reached
    ResolveFailed { reason: String },
}

impl EntryOutcome {
    pub fn dispatched(outcome: AddOutcome) -> Self {
        EntryOutcome::Dispatched { outcome }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            EntryOutcome::Dispatched { outcome: AddOutcome::Added } | EntryOutcome::Planned { .. }
        )
    }
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryOutcome::Dispatched { outcome } => write!(f, "{}", outcome),
            EntryOutcome::Planned { .. } => write!(f, "planned (dry run)"),
            EntryOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
            EntryOutcome::NotFound => write!(f, "not found"),
            EntryOutcome::ResolveFailed { reason } => write!(f, "resolve failed: {}", reason),
        }
    }
}

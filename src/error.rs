//! Error taxonomy for ticket scanning and update orchestration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ticket::TicketId;

/// Failure of a single issue-tracker call.
///
/// Always contained to the change set being processed; never fails a build.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TrackerError {
    /// The tracker has no ticket with this id.
    #[error("ticket #{0} not found")]
    NotFound(TicketId),

    /// The tracker could not be reached or answered garbage.
    #[error("tracker unreachable: {0}")]
    Unreachable(String),

    /// The tracker refused the note.
    #[error("note for ticket #{id} rejected: {reason}")]
    Rejected {
        /// Ticket the note was meant for.
        id: TicketId,
        /// Reason reported by the tracker.
        reason: String,
    },
}

/// Serialisable discriminant of a [`TrackerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerErrorKind {
    /// See [`TrackerError::NotFound`].
    NotFound,
    /// See [`TrackerError::Unreachable`].
    Unreachable,
    /// See [`TrackerError::Rejected`].
    Rejected,
}

impl TrackerError {
    /// Returns the kind of this error, without its payload.
    #[must_use]
    pub fn kind(&self) -> TrackerErrorKind {
        match self {
            Self::NotFound(_) => TrackerErrorKind::NotFound,
            Self::Unreachable(_) => TrackerErrorKind::Unreachable,
            Self::Rejected { .. } => TrackerErrorKind::Rejected,
        }
    }
}

/// Fatal update-run errors. The build is marked FAILURE.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// The job has no issue-tracker site configured.
    #[error("no issue tracker site is configured for this job")]
    NoTrackerSite,

    /// The CI host has no external root URL.
    #[error("CI root URL is not configured; cannot link notes to the build")]
    NoRootUrl,
}

/// Errors loading or compiling settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings {path}: {source}")]
    Read {
        /// Settings file path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`crate::config::Settings`].
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        /// Settings file path.
        path: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The ticket pattern does not compile.
    #[error("invalid ticket pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The ticket pattern has no capture group to read the id from.
    #[error("ticket pattern {0:?} has no capturing group")]
    MissingCaptureGroup(String),
}

/// Errors reading or writing the build-record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record file could not be read or written.
    #[error("{action} {path}: {message}")]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// File involved.
        path: String,
        /// Underlying error text.
        message: String,
    },

    /// A record file holds invalid YAML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File involved.
        path: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A record could not be serialised.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        /// Which record.
        what: &'static str,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_error_kind_matches_variant() {
        assert_eq!(TrackerError::NotFound(TicketId::new(3).unwrap()).kind(), TrackerErrorKind::NotFound);
        assert_eq!(TrackerError::Unreachable("timeout".into()).kind(), TrackerErrorKind::Unreachable);
        let rejected = TrackerError::Rejected { id: TicketId::new(9).unwrap(), reason: "closed".into() };
        assert_eq!(rejected.kind(), TrackerErrorKind::Rejected);
        assert!(rejected.to_string().contains("#9"));
    }

    #[test]
    fn tracker_error_serializes_with_kind_tag() {
        let err = TrackerError::NotFound(TicketId::new(42).unwrap());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "not_found");
        let back: TrackerError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn update_error_messages_name_the_missing_piece() {
        assert!(UpdateError::NoTrackerSite.to_string().contains("tracker site"));
        assert!(UpdateError::NoRootUrl.to_string().contains("root URL"));
    }
}

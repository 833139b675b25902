//! Issue tracker port for reading tickets and appending notes.

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::ticket::TicketId;

/// Snapshot of a ticket as the tracker returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The ticket id.
    pub id: TicketId,
    /// One-line summary.
    pub summary: String,
    /// Workflow status (e.g. "new", "resolved"), if reported.
    #[serde(default)]
    pub status: Option<String>,
}

/// Reads and annotates tickets in an external tracker.
///
/// Calls are blocking; any timeout is the implementation's business.
pub trait IssueTracker: Send + Sync {
    /// Fetches the current state of a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] or [`TrackerError::Unreachable`].
    fn get_issue(&self, id: TicketId) -> Result<Issue, TrackerError>;

    /// Appends a note to a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`], [`TrackerError::Unreachable`] or
    /// [`TrackerError::Rejected`].
    fn update_issue(&self, id: TicketId, note: &str, private: bool) -> Result<(), TrackerError>;
}

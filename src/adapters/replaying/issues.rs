//! Replaying adapter for the `IssueTracker` port.

use std::sync::{Mutex, PoisonError};

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::TrackerError;
use crate::ports::{Issue, IssueTracker};
use crate::ticket::TicketId;

/// Answers tracker calls from a cassette.
pub struct ReplayingIssueTracker {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIssueTracker {
    /// Creates a tracker serving `replayer`'s `issues` interactions.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next<T: serde::de::DeserializeOwned>(&self, method: &str) -> Result<T, TrackerError> {
        let output = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_interaction("issues", method)
            .output;
        replay_result(&output, &format!("issues::{method}")).map_err(TrackerError::Unreachable)?
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn get_issue(&self, _id: TicketId) -> Result<Issue, TrackerError> {
        self.next("get_issue")
    }

    fn update_issue(&self, _id: TicketId, _note: &str, _private: bool) -> Result<(), TrackerError> {
        self.next("update_issue")
    }
}

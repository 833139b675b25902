//! Recording adapter for the `IssueTracker` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::TrackerError;
use crate::ports::{Issue, IssueTracker};
use crate::ticket::TicketId;

/// Records tracker calls while delegating to an inner tracker.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueTracker {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct GetIssueInput {
    id: TicketId,
}

#[derive(Serialize)]
struct UpdateIssueInput<'a> {
    id: TicketId,
    note: &'a str,
    private: bool,
}

impl IssueTracker for RecordingIssueTracker {
    fn get_issue(&self, id: TicketId) -> Result<Issue, TrackerError> {
        let result = self.inner.get_issue(id);
        record_result(&self.recorder, "issues", "get_issue", &GetIssueInput { id }, &result);
        result
    }

    fn update_issue(&self, id: TicketId, note: &str, private: bool) -> Result<(), TrackerError> {
        let result = self.inner.update_issue(id, note, private);
        let input = UpdateIssueInput { id, note, private };
        record_result(&self.recorder, "issues", "update_issue", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MissingTicket;

    impl IssueTracker for MissingTicket {
        fn get_issue(&self, id: TicketId) -> Result<Issue, TrackerError> {
            Err(TrackerError::NotFound(id))
        }

        fn update_issue(&self, _id: TicketId, _note: &str, _private: bool) -> Result<(), TrackerError> {
            Ok(())
        }
    }

    #[test]
    fn records_calls_and_typed_errors() {
        let dir = std::env::temp_dir().join("mantis_updater_rec_issues_test");
        let path = dir.join("issues.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "core #1")));
        let id = TicketId::new(12).unwrap();

        {
            let tracker = RecordingIssueTracker::new(Box::new(MissingTicket), Arc::clone(&recorder));
            assert_eq!(tracker.get_issue(id), Err(TrackerError::NotFound(id)));
            tracker.update_issue(id, "Integrated in core #1", true).unwrap();
        }

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let cassette = crate::cassette::format::Cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].output["err"]["kind"], "not_found");
        assert_eq!(cassette.interactions[1].input["note"], "Integrated in core #1");
        assert_eq!(cassette.interactions[1].input["private"], true);

        let _ = std::fs::remove_dir_all(&dir);
    }
}

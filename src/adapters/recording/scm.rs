//! Recording adapter for the `ChangeSupplier` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::change::ChangeEntry;
use crate::ports::ChangeSupplier;

/// Records the change history while delegating to an inner supplier.
pub struct RecordingChangeSupplier {
    inner: Box<dyn ChangeSupplier>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingChangeSupplier {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn ChangeSupplier>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ChangeSupplier for RecordingChangeSupplier {
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let result = self.inner.changes();
        let recorded = result.as_ref().map_err(ToString::to_string);
        record_result(&self.recorder, "scm", "changes", &serde_json::json!({}), &recorded);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::entry::GenericCommit;

    struct OneCommit;

    impl ChangeSupplier for OneCommit {
        fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
            Ok(vec![ChangeEntry::Other(GenericCommit {
                author: Some("dana".into()),
                message: Some("issue 8".into()),
                affected_paths: vec![],
            })])
        }
    }

    #[test]
    fn records_tagged_entries() {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            std::env::temp_dir().join("unused.cassette.yaml"),
            "test",
            "",
        )));
        let supplier = RecordingChangeSupplier::new(Box::new(OneCommit), Arc::clone(&recorder));
        assert_eq!(supplier.changes().unwrap().len(), 1);
        drop(supplier);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        assert_eq!(recorder.len(), 1);
    }
}

//! Replaying adapter for the `ChangeSupplier` port.

use std::sync::{Mutex, PoisonError};

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::change::ChangeEntry;
use crate::ports::ChangeSupplier;

/// Serves a recorded change history.
pub struct ReplayingChangeSupplier {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingChangeSupplier {
    /// Creates a supplier serving `replayer`'s `scm` interactions.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ChangeSupplier for ReplayingChangeSupplier {
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let output = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_interaction("scm", "changes")
            .output;
        let recorded: Result<Vec<ChangeEntry>, String> = replay_result(&output, "scm::changes")?;
        Ok(recorded?)
    }
}

//! On-disk cassette layout.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One call made through a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the whole recording, across all ports.
    pub seq: u64,
    /// Port name: `issues` or `scm`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// Result, as `{"ok": ..}` or `{"err": ..}`.
    pub output: serde_json::Value,
}

/// A recorded update run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the recording was written.
    pub recorded_at: DateTime<Utc>,
    /// Build the recording was taken from, e.g. `core #17`.
    #[serde(default)]
    pub build: String,
    /// Calls in the order they were made.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette {}: {e}", path.display()))
    }

    /// Only the interactions recorded for `port`, in order.
    #[must_use]
    pub fn for_port(&self, port: &str) -> Self {
        Self {
            interactions: self.interactions.iter().filter(|i| i.port == port).cloned().collect(),
            ..self.clone()
        }
    }
}

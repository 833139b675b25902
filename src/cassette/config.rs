//! Which cassette replays which port.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette files for a replaying run.
///
/// A port with no cassette is left unserved; calling it panics.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the issue tracker port.
    pub issues: Option<PathBuf>,
    /// Cassette for the change supplier port.
    pub scm: Option<PathBuf>,
}

/// Replayers built from a [`CassetteConfig`].
#[derive(Debug, Default)]
pub struct PortReplayers {
    /// Replayer for the issue tracker port.
    pub issues: Option<CassetteReplayer>,
    /// Replayer for the change supplier port.
    pub scm: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Serves both ports from one recording.
    #[must_use]
    pub fn single(path: &Path) -> Self {
        Self { issues: Some(path.to_path_buf()), scm: Some(path.to_path_buf()) }
    }

    /// Loads every configured cassette, keeping only each port's own calls.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured cassette cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: Option<&Path>, port: &str| -> Result<Option<CassetteReplayer>, String> {
            path.map(|p| Cassette::load(p).map(|c| CassetteReplayer::new(&c.for_port(port))))
                .transpose()
        };
        Ok(PortReplayers {
            issues: load(self.issues.as_deref(), "issues")?,
            scm: load(self.scm.as_deref(), "scm")?,
        })
    }
}

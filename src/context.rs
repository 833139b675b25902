//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::browser::TemplateBrowser;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::mantis::MantisTracker;
use crate::adapters::live::scm::{ChangeLogFile, GitLog};
use crate::adapters::recording::issues::RecordingIssueTracker;
use crate::adapters::recording::scm::RecordingChangeSupplier;
use crate::adapters::replaying::{ReplayingChangeSupplier, ReplayingIssueTracker};
use crate::cassette::config::CassetteConfig;
use crate::cassette::recorder::CassetteRecorder;
use crate::change::ChangeEntry;
use crate::config::Settings;
use crate::ports::{ChangeSupplier, FileSystem, IssueTracker, RepositoryBrowser};

/// Where a build's change history comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// A YAML change log exported by the CI host.
    ChangeLog(PathBuf),
    /// A `git log` revision range.
    GitRange(String),
    /// No history; the build only processes carried-over change sets.
    Empty,
}

impl ChangeSource {
    fn supplier(&self) -> Box<dyn ChangeSupplier> {
        match self {
            Self::ChangeLog(path) => Box::new(ChangeLogFile::new(path)),
            Self::GitRange(range) => Box::new(GitLog::new(range.clone())),
            Self::Empty => Box::new(NoChanges),
        }
    }
}

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up live, recording, or replaying adapters.
pub struct ServiceContext {
    /// Filesystem backing the build-record store.
    pub fs: Box<dyn FileSystem>,
    /// Issue tracker; `None` when the job has no tracker site.
    pub issues: Option<Box<dyn IssueTracker>>,
    /// Supplier of the current build's commits.
    pub scm: Box<dyn ChangeSupplier>,
    /// Repository browser for links, if configured.
    pub browser: Option<Box<dyn RepositoryBrowser>>,
    /// Recorder shared with the recording adapters; written on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context from the job's settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker client cannot be built.
    pub fn live(settings: &Settings, source: &ChangeSource) -> Result<Self, String> {
        let issues = match &settings.site {
            Some(site) => Some(Box::new(MantisTracker::new(site)?) as Box<dyn IssueTracker>),
            None => None,
        };
        Ok(Self {
            fs: Box::new(LiveFileSystem),
            issues,
            scm: source.supplier(),
            browser: settings
                .browser
                .clone()
                .map(|t| Box::new(TemplateBrowser::new(t)) as Box<dyn RepositoryBrowser>),
            recorder: None,
        })
    }

    /// Creates a context with only the live filesystem, for reading the store.
    ///
    /// There is no tracker and no change history.
    #[must_use]
    pub fn filesystem_only() -> Self {
        Self {
            fs: Box::new(LiveFileSystem),
            issues: None,
            scm: Box::new(NoChanges),
            browser: None,
            recorder: None,
        }
    }

    /// Creates a live context that also records tracker and change-supplier
    /// calls to a cassette at `path`, written when the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker client cannot be built.
    pub fn recording(
        path: &Path,
        build_label: &str,
        settings: &Settings,
        source: &ChangeSource,
    ) -> Result<Self, String> {
        let mut live = Self::live(settings, source)?;
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "mantis-updater", build_label)));
        let scm = std::mem::replace(&mut live.scm, Box::new(NoChanges));
        Ok(Self {
            fs: std::mem::replace(&mut live.fs, Box::new(LiveFileSystem)),
            browser: live.browser.take(),
            issues: live.issues.take().map(|inner| {
                Box::new(RecordingIssueTracker::new(inner, Arc::clone(&recorder)))
                    as Box<dyn IssueTracker>
            }),
            scm: Box::new(RecordingChangeSupplier::new(scm, Arc::clone(&recorder))),
            recorder: Some(recorder),
        })
    }

    /// Creates a context replaying both ports from one cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        Self::replaying_from(&CassetteConfig::single(path))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// The tracker is absent when it has no cassette, as if the job had no
    /// tracker site. A change supplier without a cassette panics when called.
    /// The filesystem is live; store writes are not part of a recording.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        Ok(Self {
            fs: Box::new(LiveFileSystem),
            issues: replayers
                .issues
                .map(|r| Box::new(ReplayingIssueTracker::new(r)) as Box<dyn IssueTracker>),
            scm: match replayers.scm {
                Some(r) => Box::new(ReplayingChangeSupplier::new(r)),
                None => Box::new(PanickingChangeSupplier),
            },
            browser: None,
            recorder: None,
        })
    }

    /// Replaces the filesystem adapter.
    #[must_use]
    pub fn with_fs(mut self, fs: Box<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        // Adapters holding the other references are dropped after this body.
        self.issues = None;
        self.scm = Box::new(NoChanges);
        let recorder = match Arc::try_unwrap(recorder) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(_) => {
                warn!("cassette recorder still shared; recording not written");
                return;
            }
        };
        match recorder.finish() {
            Ok(path) => info!(path = %path.display(), "cassette written"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}

struct NoChanges;
impl ChangeSupplier for NoChanges {
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Vec::new())
    }
}

struct PanickingChangeSupplier;
impl ChangeSupplier for PanickingChangeSupplier {
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("ChangeSupplier port not configured in CassetteConfig; no cassette loaded for scm");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::ticket::TicketId;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            build: "core #2".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn live_context_without_site_has_no_tracker() {
        let ctx = ServiceContext::live(&Settings::default(), &ChangeSource::Empty).unwrap();
        assert!(ctx.issues.is_none());
        assert!(ctx.browser.is_none());
        assert!(ctx.scm.changes().unwrap().is_empty());
    }

    #[test]
    fn replaying_serves_both_ports_from_one_cassette() {
        let dir = std::env::temp_dir().join("mantis_updater_ctx_replay_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.cassette.yaml");
        write_cassette(
            &path,
            vec![
                Interaction {
                    seq: 0,
                    port: "scm".into(),
                    method: "changes".into(),
                    input: json!({}),
                    output: json!({"ok": [{"scm": "other", "message": "issue 6"}]}),
                },
                Interaction {
                    seq: 1,
                    port: "issues".into(),
                    method: "get_issue".into(),
                    input: json!({"id": 6}),
                    output: json!({"ok": {"id": 6, "summary": "Slow start"}}),
                },
            ],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        assert_eq!(ctx.scm.changes().unwrap()[0].message(), Some("issue 6"));
        let issue = ctx.issues.as_ref().unwrap().get_issue(TicketId::new(6).unwrap()).unwrap();
        assert_eq!(issue.summary, "Slow start");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[should_panic(expected = "not configured")]
    fn unconfigured_change_supplier_panics() {
        let ctx = ServiceContext::replaying_from(&CassetteConfig::default()).unwrap();
        assert!(ctx.issues.is_none());
        let _ = ctx.scm.changes();
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = std::env::temp_dir().join("mantis_updater_ctx_record_test");
        std::fs::create_dir_all(&dir).unwrap();
        let log = dir.join("changes.yaml");
        std::fs::write(&log, "- scm: other\n  message: issue 1\n").unwrap();
        let cassette_path = dir.join("out.cassette.yaml");

        {
            let ctx = ServiceContext::recording(
                &cassette_path,
                "core #2",
                &Settings::default(),
                &ChangeSource::ChangeLog(log.clone()),
            )
            .unwrap();
            assert_eq!(ctx.scm.changes().unwrap().len(), 1);
        }

        let cassette = Cassette::load(&cassette_path).unwrap();
        assert_eq!(cassette.build, "core #2");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].port, "scm");

        let _ = std::fs::remove_dir_all(&dir);
    }
}

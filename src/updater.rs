//! One build's ticket-update run.
//!
//! `GATHER -> DECIDE -> (UPDATE | DEFER) -> RECORD`, strictly in order. The
//! run reads the [`BuildRecord`] and its collaborators and returns an
//! [`UpdateDelta`]; it never writes host state itself.

use tracing::{debug, error, info, info_span, warn};

use crate::build::{BuildRecord, BuildReport, BuildResult, UpdateDelta, UpdateOutcome};
use crate::carry_over;
use crate::change::{integrated_header, render_note, ChangeSet, ChangeSetFactory};
use crate::config::UpdaterConfig;
use crate::error::{TrackerError, UpdateError};
use crate::ports::{ChangeSupplier, IssueTracker, RepositoryBrowser};

/// Collaborators and configuration for updating tickets from builds.
pub struct Updater<'a> {
    config: &'a UpdaterConfig,
    tracker: Option<&'a dyn IssueTracker>,
    changes: &'a dyn ChangeSupplier,
    browser: Option<&'a dyn RepositoryBrowser>,
    root_url: Option<&'a str>,
}

impl<'a> Updater<'a> {
    /// Creates an updater. `tracker` is `None` when the job has no site.
    #[must_use]
    pub fn new(
        config: &'a UpdaterConfig,
        tracker: Option<&'a dyn IssueTracker>,
        changes: &'a dyn ChangeSupplier,
    ) -> Self {
        Self { config, tracker, changes, browser: None, root_url: None }
    }

    /// Sets the repository browser used for links.
    #[must_use]
    pub fn with_browser(mut self, browser: Option<&'a dyn RepositoryBrowser>) -> Self {
        self.browser = browser;
        self
    }

    /// Sets the CI host's external root URL.
    #[must_use]
    pub fn with_root_url(mut self, root_url: Option<&'a str>) -> Self {
        self.root_url = root_url.filter(|url| !url.is_empty());
        self
    }

    /// Runs the update for `build`. Fatal errors become a FAILURE result.
    ///
    /// Per-ticket tracker failures are logged and left out of the report;
    /// they never fail the build.
    #[must_use]
    pub fn perform(&self, build: &BuildRecord) -> UpdateDelta {
        match self.try_perform(build) {
            Ok(delta) => delta,
            Err(e) => {
                error!(job = %build.job, build = build.number, error = %e, "ticket update aborted");
                UpdateDelta { result: Some(BuildResult::Failure), ..UpdateDelta::default() }
            }
        }
    }

    /// Runs the update for `build`, surfacing fatal errors.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] if the job has no tracker site or the CI host
    /// has no root URL.
    pub fn try_perform(&self, build: &BuildRecord) -> Result<UpdateDelta, UpdateError> {
        let span = info_span!("update", job = %build.job, build = build.number);
        let _guard = span.enter();

        let tracker = self.tracker.ok_or(UpdateError::NoTrackerSite)?;
        let root_url = self.root_url.ok_or(UpdateError::NoRootUrl)?;

        let change_sets = self.gather(build);
        if change_sets.is_empty() {
            info!("no ticket references in this build");
            return Ok(UpdateDelta::default());
        }

        let mut delta = UpdateDelta::default();
        let outcomes = if self.should_update(build.result) {
            let build_url = format!("{root_url}{}", build.url);
            let header = integrated_header(&build.job, build.number, &build_url);
            self.update_all(tracker, &header, &change_sets)
        } else {
            info!(
                count = change_sets.len(),
                result = ?build.result,
                threshold = %self.config.threshold,
                "build result below threshold; deferring to next build"
            );
            carry_over::write(&mut delta, change_sets);
            Vec::new()
        };

        delta.report = Some(BuildReport {
            pattern: self.config.scanner.as_str().to_string(),
            outcomes,
        });
        Ok(delta)
    }

    fn gather(&self, build: &BuildRecord) -> Vec<ChangeSet> {
        let mut change_sets = carry_over::read(build)
            .map(|record| record.change_sets.clone())
            .unwrap_or_default();
        if !change_sets.is_empty() {
            debug!(count = change_sets.len(), "carried over from previous build");
        }

        // Carried-over sets are still processed without this build's history.
        let entries = self.changes.changes().unwrap_or_else(|e| {
            warn!(error = %e, "change history unavailable");
            Vec::new()
        });
        let factory = ChangeSetFactory::new(self.config.backends.clone());
        for entry in &entries {
            let Some(message) = entry.message() else {
                continue;
            };
            for ticket_id in self.config.scanner.scan(message) {
                debug!(ticket = %ticket_id, "found ticket reference");
                change_sets.push(factory.create(ticket_id, entry, self.browser));
            }
        }
        change_sets
    }

    fn should_update(&self, result: Option<BuildResult>) -> bool {
        match result {
            None => true,
            Some(r) => !r.is_worse_than(self.config.threshold),
        }
    }

    fn update_all(
        &self,
        tracker: &dyn IssueTracker,
        header: &str,
        change_sets: &[ChangeSet],
    ) -> Vec<UpdateOutcome> {
        let mut outcomes = Vec::with_capacity(change_sets.len());
        for set in change_sets {
            match self.update_one(tracker, header, set) {
                Ok(outcome) => {
                    info!(ticket = %set.ticket_id, "note added");
                    outcomes.push(outcome);
                }
                Err(e) => {
                    warn!(ticket = %set.ticket_id, kind = ?e.kind(), error = %e, "ticket update failed");
                }
            }
        }
        outcomes
    }

    fn update_one(
        &self,
        tracker: &dyn IssueTracker,
        header: &str,
        set: &ChangeSet,
    ) -> Result<UpdateOutcome, TrackerError> {
        let issue = tracker.get_issue(set.ticket_id)?;
        let note = render_note(header, set, self.config.record_changelog);
        tracker.update_issue(set.ticket_id, &note, self.config.keep_note_private)?;
        Ok(UpdateOutcome { ticket_id: set.ticket_id, issue, updated: true })
    }
}

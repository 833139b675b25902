//! `mantis-updater update` command.

use std::path::{Path, PathBuf};

use crate::build::{BuildRecord, BuildResult, UpdateDelta};
use crate::config::Settings;
use crate::context::{ChangeSource, ServiceContext};
use crate::store::BuildStore;
use crate::updater::Updater;

/// Inputs of one `update` invocation.
#[derive(Debug)]
pub struct UpdateRequest<'a> {
    /// Job name.
    pub job: &'a str,
    /// Build number.
    pub number: u32,
    /// Build URL relative to the CI root URL.
    pub url: Option<&'a str>,
    /// Build result, `None` while running.
    pub result: Option<BuildResult>,
    /// YAML change log to read commits from.
    pub changelog: Option<&'a Path>,
    /// Git range to read commits from.
    pub git_range: Option<&'a str>,
    /// Settings file.
    pub config: &'a Path,
    /// Root of the build-record store.
    pub store: &'a Path,
    /// Cassette to record tracker and SCM traffic into.
    pub record: Option<PathBuf>,
}

impl UpdateRequest<'_> {
    fn change_source(&self) -> ChangeSource {
        match (self.changelog, self.git_range) {
            (Some(path), _) => ChangeSource::ChangeLog(path.to_path_buf()),
            (None, Some(range)) => ChangeSource::GitRange(range.to_string()),
            (None, None) => ChangeSource::Empty,
        }
    }

    fn build_url(&self) -> String {
        self.url.map_or_else(|| format!("job/{}/{}/", self.job, self.number), str::to_string)
    }
}

/// Execute the `update` command.
///
/// Saves the build, runs the ticket update against it, and applies the
/// resulting delta to the store.
///
/// # Errors
///
/// Returns an error string if settings or the store cannot be used, or if
/// the run marked the build as failed.
pub fn run(request: &UpdateRequest<'_>) -> Result<(), String> {
    let settings = Settings::load(request.config).map_err(|e| e.to_string())?;
    let config = settings.updater_config().map_err(|e| e.to_string())?;
    let source = request.change_source();

    let ctx = match &request.record {
        Some(path) => {
            let label = format!("{} #{}", request.job, request.number);
            ServiceContext::recording(path, &label, &settings, &source)?
        }
        None => ServiceContext::live(&settings, &source)?,
    };
    let store = BuildStore::new(&ctx, request.store);

    store
        .save_build(&BuildRecord {
            job: request.job.to_string(),
            number: request.number,
            url: request.build_url(),
            result: request.result,
            previous: None,
        })
        .map_err(|e| e.to_string())?;
    let build = store.load(request.job, request.number).map_err(|e| e.to_string())?;

    let updater = Updater::new(&config, ctx.issues.as_deref(), &*ctx.scm)
        .with_browser(ctx.browser.as_deref())
        .with_root_url(settings.root_url.as_deref());
    let delta = updater.perform(&build);
    store.apply(&build, &delta).map_err(|e| e.to_string())?;

    println!("{}", summary(&build, &delta));
    if delta.result == Some(BuildResult::Failure) {
        return Err(format!("Ticket update failed; {} #{} marked FAILURE", build.job, build.number));
    }
    Ok(())
}

fn summary(build: &BuildRecord, delta: &UpdateDelta) -> String {
    let head = format!("{} #{}", build.job, build.number);
    match (&delta.report, &delta.carry_over) {
        (_, Some(carry_over)) => {
            format!("{head}: deferred {} ticket reference(s) to the next build", carry_over.change_sets.len())
        }
        (Some(report), None) => {
            let ids: Vec<String> = report.outcomes.iter().map(|o| format!("#{}", o.ticket_id)).collect();
            if ids.is_empty() {
                format!("{head}: no tickets updated")
            } else {
                format!("{head}: updated {}", ids.join(", "))
            }
        }
        (None, None) if delta.result.is_some() => format!("{head}: ticket update aborted"),
        (None, None) => format!("{head}: no ticket references"),
    }
}

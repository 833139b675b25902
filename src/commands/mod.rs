//! Command dispatch and handlers.

pub mod scan;
pub mod show;
pub mod update;

use crate::cli::Command;

/// Environment variable naming a cassette file to record `update` into.
pub const RECORD_ENV: &str = "MANTIS_UPDATER_RECORD";

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Update { build, url, result, changelog, git_range, config } => {
            let request = update::UpdateRequest {
                job: &build.job,
                number: build.number,
                url: url.as_deref(),
                result: *result,
                changelog: changelog.as_deref(),
                git_range: git_range.as_deref(),
                config,
                store: &build.store,
                record: std::env::var_os(RECORD_ENV).map(std::path::PathBuf::from),
            };
            update::run(&request)
        }
        Command::Scan { message, config } => scan::run(config, message),
        Command::Show { build } => show::run(&build.store, &build.job, build.number),
    }
}

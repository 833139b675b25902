//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::build::BuildResult;
use crate::config::SETTINGS_FILE;

/// Default root of the build-record store.
pub const DEFAULT_STORE: &str = ".mantis-updater";

/// Top-level CLI parser for `mantis-updater`.
#[derive(Debug, Parser)]
#[command(
    name = "mantis-updater",
    version,
    about = "Annotate Mantis tickets referenced by a build's commits"
)]
pub struct Cli {
    /// Emit logs as newline-delimited JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Identifies one build in the store.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Job name.
    #[arg(long)]
    pub job: String,
    /// Build number.
    #[arg(long)]
    pub number: u32,
    /// Root of the build-record store.
    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Update tickets referenced by a build's commits.
    Update {
        /// The build to process.
        #[command(flatten)]
        build: BuildArgs,
        /// Build URL relative to the CI root URL; defaults to `job/<job>/<number>/`.
        #[arg(long)]
        url: Option<String>,
        /// Build result; omit while the build is still running.
        #[arg(long)]
        result: Option<BuildResult>,
        /// YAML change log exported by the CI host.
        #[arg(long, conflicts_with = "git_range")]
        changelog: Option<PathBuf>,
        /// Git revision range to read commits from, e.g. `v1.2..HEAD`.
        #[arg(long)]
        git_range: Option<String>,
        /// Settings file.
        #[arg(long, default_value = SETTINGS_FILE)]
        config: PathBuf,
    },
    /// Print the ticket ids the configured pattern finds in a message.
    Scan {
        /// Commit message to scan.
        message: String,
        /// Settings file.
        #[arg(long, default_value = SETTINGS_FILE)]
        config: PathBuf,
    },
    /// Show a build's stored report and carry-over.
    Show {
        /// The build to show.
        #[command(flatten)]
        build: BuildArgs,
    },
}

//! Core library entry for the `mantis-updater` CLI.
//!
//! Finds ticket references in a build's commits and annotates the
//! referenced Mantis tickets, deferring to the next build when the build
//! result is not good enough.

pub mod adapters;
pub mod build;
pub mod carry_over;
pub mod cassette;
pub mod change;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod store;
pub mod telemetry;
pub mod ticket;
pub mod updater;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    telemetry::init_tracing(cli.log_json, tracing::Level::INFO);
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_scan() {
        let result = run(["mantis-updater", "scan", "--config", "/nonexistent.yaml", "issue 4"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["mantis-updater", "unknown"]);
        assert!(result.is_err());
    }
}

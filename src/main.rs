//! Binary entrypoint for the `mantis-updater` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    // Recording is handled by the update command via MANTIS_UPDATER_RECORD=<file>.
    match mantis_updater::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

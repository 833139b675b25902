//! `mantis-updater scan` command.

use std::path::Path;

use crate::config::Settings;

/// Execute the `scan` command: print each ticket id found, one per line.
///
/// # Errors
///
/// Returns an error string if the settings or pattern are invalid.
pub fn run(config: &Path, message: &str) -> Result<(), String> {
    for id in scan(config, message)? {
        println!("{id}");
    }
    Ok(())
}

fn scan(config: &Path, message: &str) -> Result<Vec<u32>, String> {
    let settings = Settings::load(config).map_err(|e| e.to_string())?;
    let updater_config = settings.updater_config().map_err(|e| e.to_string())?;
    Ok(updater_config.scanner.scan(message).map(|id| id.get()).collect())
}

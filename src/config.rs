//! Settings file and the read-only configuration compiled from it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::build::BuildResult;
use crate::change::BackendSupport;
use crate::error::ConfigError;
use crate::ticket::TicketScanner;

/// Settings file read when `--config` is not given.
pub const SETTINGS_FILE: &str = "mantis-updater.yaml";

/// Ticket pattern used when the settings do not name one.
pub const DEFAULT_PATTERN: &str = r"(?i)issue #?(\d+)";

/// Environment variable overriding `root_url`.
pub const ROOT_URL_ENV: &str = "MANTIS_UPDATER_ROOT_URL";

const DEFAULT_TOKEN_ENV: &str = "MANTIS_API_TOKEN";

/// Where the job's issue tracker lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSite {
    /// Base URL of the tracker.
    pub url: String,
    /// Environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

impl TrackerSite {
    /// Reads the API token from the environment, if set.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }
}

/// URL templates for the repository browser.
///
/// `{revision}` and `{path}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BrowserTemplates {
    /// Template for whole-commit links.
    #[serde(default)]
    pub change_set: Option<String>,
    /// Template for per-path diff links.
    #[serde(default)]
    pub diff: Option<String>,
}

/// Contents of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Issue tracker for this job.
    pub site: Option<TrackerSite>,
    /// External root URL of the CI host.
    pub root_url: Option<String>,
    /// Ticket pattern; the first capture group is the id.
    pub pattern: String,
    /// Post notes as private.
    pub keep_note_private: bool,
    /// Include the change log in notes.
    pub record_changelog: bool,
    /// Worst build result that still updates tickets.
    pub threshold: BuildResult,
    /// Backends with a dedicated adapter.
    pub backends: BackendSupport,
    /// Repository browser link templates.
    pub browser: Option<BrowserTemplates>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site: None,
            root_url: None,
            pattern: DEFAULT_PATTERN.to_string(),
            keep_note_private: false,
            record_changelog: true,
            threshold: BuildResult::Unstable,
            backends: BackendSupport::all(),
            browser: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, then applies environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
            Self::from_yaml(&content)
                .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?
        } else {
            Self::default()
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parses settings from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings YAML.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Applies environment overrides, looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root_url) = lookup(ROOT_URL_ENV).filter(|v| !v.is_empty()) {
            self.root_url = Some(root_url);
        }
    }

    /// Compiles the read-only configuration for one update run.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket pattern is invalid.
    pub fn updater_config(&self) -> Result<UpdaterConfig, ConfigError> {
        Ok(UpdaterConfig {
            scanner: TicketScanner::new(&self.pattern)?,
            keep_note_private: self.keep_note_private,
            record_changelog: self.record_changelog,
            threshold: self.threshold,
            backends: self.backends.clone(),
        })
    }
}

/// Configuration for one update run. Read-only once built.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Compiled ticket pattern.
    pub scanner: TicketScanner,
    /// Post notes as private.
    pub keep_note_private: bool,
    /// Include the change log in notes.
    pub record_changelog: bool,
    /// Worst build result that still updates tickets.
    pub threshold: BuildResult,
    /// Backends with a dedicated adapter.
    pub backends: BackendSupport,
}

impl UpdaterConfig {
    /// Configuration with default flags for the given pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid.
    pub fn with_pattern(pattern: &str) -> Result<Self, ConfigError> {
        Settings { pattern: pattern.to_string(), ..Settings::default() }.updater_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::BackendKind;

    #[test]
    fn empty_settings_use_defaults() {
        let settings = Settings::from_yaml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pattern, DEFAULT_PATTERN);
        assert!(settings.record_changelog);
        assert_eq!(settings.threshold, BuildResult::Unstable);
    }

    #[test]
    fn parses_full_settings() {
        let yaml = r"
site:
  url: https://mantis.example.org/
root_url: https://ci.example.org/
pattern: 'MANTIS-(\d+)'
keep_note_private: true
record_changelog: false
threshold: success
backends: [git]
browser:
  change_set: https://scm/commit/{revision}
";
        let settings = Settings::from_yaml(yaml).unwrap();
        let site = settings.site.as_ref().unwrap();
        assert_eq!(site.url, "https://mantis.example.org/");
        assert_eq!(site.token_env, "MANTIS_API_TOKEN");
        assert_eq!(settings.threshold, BuildResult::Success);
        assert!(settings.backends.supports(BackendKind::Git));
        assert!(!settings.backends.supports(BackendKind::Cvs));
        assert_eq!(settings.browser.as_ref().unwrap().diff, None);

        let config = settings.updater_config().unwrap();
        assert_eq!(config.scanner.as_str(), r"MANTIS-(\d+)");
        assert!(config.keep_note_private);
        assert!(!config.record_changelog);
    }

    #[test]
    fn env_overrides_root_url() {
        let mut settings = Settings { root_url: Some("https://old/".into()), ..Settings::default() };
        settings.apply_overrides(|key| (key == ROOT_URL_ENV).then(|| "https://new/".to_string()));
        assert_eq!(settings.root_url.as_deref(), Some("https://new/"));

        settings.apply_overrides(|_| Some(String::new()));
        assert_eq!(settings.root_url.as_deref(), Some("https://new/"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/mantis-updater.yaml")).unwrap();
        assert_eq!(settings.pattern, DEFAULT_PATTERN);
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        assert!(UpdaterConfig::with_pattern("(unclosed").is_err());
        assert!(UpdaterConfig::with_pattern("no-group").is_err());
    }
}

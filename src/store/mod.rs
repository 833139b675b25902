//! Build store: the host side of an update run.
//!
//! Per-job build records live under a root directory and are read and
//! written through the `FileSystem` port. Layout:
//!
//! ```text
//! <root>/<job>/<number>/
//!   ├── build.yaml
//!   ├── carry_over.yaml
//!   └── report.yaml
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::build::{BuildRecord, BuildReport, BuildResult, CarryOverRecord, PriorBuild, UpdateDelta};
use crate::context::ServiceContext;
use crate::error::StoreError;

const BUILD_FILE: &str = "build.yaml";
const CARRY_OVER_FILE: &str = "carry_over.yaml";
const REPORT_FILE: &str = "report.yaml";

/// Contents of `build.yaml`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredBuild {
    number: u32,
    url: String,
    #[serde(default)]
    result: Option<BuildResult>,
}

/// Persistence for build records, carry-overs and reports.
///
/// All I/O goes through `ctx.fs`.
pub struct BuildStore<'a> {
    ctx: &'a ServiceContext,
    root: PathBuf,
}

impl<'a> BuildStore<'a> {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, root: &Path) -> Self {
        Self { ctx, root: root.to_path_buf() }
    }

    /// Saves the build's number, URL and result to `build.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn save_build(&self, record: &BuildRecord) -> Result<(), StoreError> {
        let stored =
            StoredBuild { number: record.number, url: record.url.clone(), result: record.result };
        self.write_yaml(&self.file(&record.job, record.number, BUILD_FILE), "build", &stored)
    }

    /// Loads a build and links the build immediately before it.
    ///
    /// # Errors
    ///
    /// Returns an error if the build was never saved or a file is unreadable.
    pub fn load(&self, job: &str, number: u32) -> Result<BuildRecord, StoreError> {
        let stored: StoredBuild = self
            .read_yaml(&self.file(job, number, BUILD_FILE))?
            .ok_or_else(|| StoreError::Io {
                action: "no build record at",
                path: self.file(job, number, BUILD_FILE).display().to_string(),
                message: format!("build {job} #{number} has not been saved"),
            })?;

        let previous = match number.checked_sub(1).filter(|n| *n > 0) {
            Some(prior) if self.ctx.fs.exists(&self.file(job, prior, BUILD_FILE)) => {
                Some(PriorBuild { number: prior, carry_over: self.read_carry_over(job, prior)? })
            }
            _ => None,
        };

        Ok(BuildRecord {
            job: job.to_string(),
            number: stored.number,
            url: stored.url,
            result: stored.result,
            previous,
        })
    }

    /// Applies an update delta to `record`'s stored files.
    ///
    /// The carry-over and report are overwritten, never appended to. A
    /// finished run with nothing to carry clears a stale carry-over.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation or writing fails.
    pub fn apply(&self, record: &BuildRecord, delta: &UpdateDelta) -> Result<(), StoreError> {
        let (job, number) = (record.job.as_str(), record.number);

        if let Some(result) = delta.result {
            debug!(job, build = number, %result, "overriding build result");
            let updated = BuildRecord { result: Some(result), ..record.clone() };
            self.save_build(&updated)?;
        }

        let carry_path = self.file(job, number, CARRY_OVER_FILE);
        match &delta.carry_over {
            Some(carry_over) => self.write_yaml(&carry_path, "carry-over", carry_over)?,
            None if delta.report.is_some() && self.ctx.fs.exists(&carry_path) => {
                self.write_yaml(&carry_path, "carry-over", &CarryOverRecord::default())?;
            }
            None => {}
        }

        if let Some(report) = &delta.report {
            self.write_yaml(&self.file(job, number, REPORT_FILE), "report", report)?;
        }
        Ok(())
    }

    /// Reads the change sets a build deferred, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_carry_over(&self, job: &str, number: u32) -> Result<Option<CarryOverRecord>, StoreError> {
        self.read_yaml(&self.file(job, number, CARRY_OVER_FILE))
    }

    /// Reads a build's report, if one was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_report(&self, job: &str, number: u32) -> Result<Option<BuildReport>, StoreError> {
        self.read_yaml(&self.file(job, number, REPORT_FILE))
    }

    fn file(&self, job: &str, number: u32, name: &str) -> PathBuf {
        self.root.join(job).join(number.to_string()).join(name)
    }

    fn read_yaml<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StoreError> {
        if !self.ctx.fs.exists(path) {
            return Ok(None);
        }
        let contents = self.ctx.fs.read_to_string(path).map_err(|e| StoreError::Io {
            action: "failed to read",
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse { path: path.display().to_string(), source })
    }

    fn write_yaml<T: Serialize>(&self, path: &Path, what: &'static str, value: &T) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(value).map_err(|source| StoreError::Serialize { what, source })?;
        self.ctx.fs.write(path, &yaml).map_err(|e| StoreError::Io {
            action: "failed to write",
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

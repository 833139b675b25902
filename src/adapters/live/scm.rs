//! Live adapters for the `ChangeSupplier` port.
//!
//! [`ChangeLogFile`] reads entries exported by the CI host as YAML;
//! [`GitLog`] asks the `git` CLI for a commit range.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::change::entry::{GitCommit, GitPath};
use crate::change::{ChangeEntry, EditType};
use crate::ports::ChangeSupplier;

/// Reads a YAML list of tagged change entries from a file.
pub struct ChangeLogFile {
    path: PathBuf,
}

impl ChangeLogFile {
    /// Creates a supplier for the change log at `path`.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }
}

impl ChangeSupplier for ChangeLogFile {
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read change log {}: {e}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse change log {}: {e}", self.path.display()).into())
    }
}

const RECORD_SEP: char = '\u{1e}';
const FIELD_SEP: char = '\u{1f}';

/// Shells out to `git log` for the commits in a revision range.
pub struct GitLog {
    range: String,
}

impl GitLog {
    /// Creates a supplier for `range` (e.g. `v1.2..HEAD`) in the current directory.
    #[must_use]
    pub fn new(range: impl Into<String>) -> Self {
        Self { range: range.into() }
    }
}

impl ChangeSupplier for GitLog {
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let output = Command::new("git")
            .args(["log", "--reverse", "--name-status", "--no-renames"])
            .arg(format!("--format={RECORD_SEP}%H{FIELD_SEP}%an{FIELD_SEP}%B{FIELD_SEP}"))
            .arg(&self.range)
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git log {} failed: {stderr}", self.range).into());
        }
        Ok(parse_git_log(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn edit_from_status(status: &str) -> EditType {
    match status.chars().next() {
        Some('A') => EditType::Add,
        Some('M' | 'T') => EditType::Edit,
        Some('D') => EditType::Delete,
        _ => EditType::Unknown,
    }
}

/// Parses `git log` output produced with the separators used by [`GitLog`].
fn parse_git_log(output: &str) -> Vec<ChangeEntry> {
    output
        .split(RECORD_SEP)
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(4, FIELD_SEP);
            let id = fields.next()?.trim().to_string();
            let author = fields.next().map(str::to_string).filter(|a| !a.is_empty());
            let message = fields.next().map(|m| m.trim_end().to_string()).filter(|m| !m.is_empty());
            let paths = fields
                .next()
                .unwrap_or_default()
                .lines()
                .filter_map(|line| {
                    let (status, path) = line.split_once('\t')?;
                    Some(GitPath { path: path.to_string(), edit: edit_from_status(status) })
                })
                .collect();
            Some(ChangeEntry::Git(GitCommit { author, message, id, paths }))
        })
        .collect()
}

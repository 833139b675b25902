//! Per-backend adapters normalising native entries into [`NormalizedChange`].
//!
//! Link lookups go through the job's [`RepositoryBrowser`]. A failed lookup is
//! logged and reported as unknown; it never aborts normalisation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entry::{ChangeEntry, CvsCommit, EditType, GitCommit, HgCommit, SvnCommit};
use crate::ports::RepositoryBrowser;

/// One touched path in a normalised change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedPath {
    /// Edit mark (`A`, `M`, `D`, or `?`).
    pub mark: char,
    /// Path as reported by the backend.
    pub path: String,
    /// Per-path revision, for backends that version files individually.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Per-path diff link.
    #[serde(default)]
    pub diff_link: DiffLink,
}

/// Diff link of one affected path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiffLink {
    /// The backend has no per-path diff links.
    #[default]
    Unsupported,
    /// The backend has them but this one could not be resolved.
    Unknown,
    /// Resolved link.
    Url(String),
}

impl From<Option<String>> for DiffLink {
    fn from(link: Option<String>) -> Self {
        link.map_or(Self::Unknown, Self::Url)
    }
}

/// Backend-independent view of one commit.
///
/// `None` fields are unknown and render as the unknown sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NormalizedChange {
    /// Commit author.
    pub author: Option<String>,
    /// Full commit message.
    pub message: Option<String>,
    /// Touched paths in backend order.
    pub affected_paths: Vec<AffectedPath>,
    /// Commit revision.
    pub revision: Option<String>,
    /// Link to the whole change set in the repository browser.
    pub change_set_link: Option<String>,
}

/// Uniform accessors over one backend's commit shape.
pub trait ChangeAdapter {
    /// Commit author.
    fn author(&self) -> Option<String>;

    /// Full commit message.
    fn message(&self) -> Option<String>;

    /// Commit revision.
    fn revision(&self) -> Option<String>;

    /// Link to the whole change set.
    fn change_set_link(&self) -> Option<String>;

    /// Touched paths, each with its mark and, where supported, diff link.
    fn affected_paths(&self) -> Vec<AffectedPath>;

    /// Collects every accessor into a [`NormalizedChange`].
    fn normalize(&self) -> NormalizedChange {
        NormalizedChange {
            author: self.author(),
            message: self.message(),
            affected_paths: self.affected_paths(),
            revision: self.revision(),
            change_set_link: self.change_set_link(),
        }
    }
}

fn resolve_change_set_link(
    browser: Option<&dyn RepositoryBrowser>,
    entry: &ChangeEntry,
) -> Option<String> {
    match browser?.change_set_link(entry) {
        Ok(link) => link,
        Err(error) => {
            warn!(%error, "failed to resolve change set link");
            None
        }
    }
}

fn resolve_diff_link(
    browser: Option<&dyn RepositoryBrowser>,
    entry: &ChangeEntry,
    path: &str,
    revision: Option<&str>,
) -> Option<String> {
    match browser?.diff_link(entry, path, revision) {
        Ok(link) => link,
        Err(error) => {
            warn!(%error, path, "failed to resolve diff link");
            None
        }
    }
}

/// Adapter for CVS commits.
///
/// CVS has no cross-file change set, so the change-set link is always unknown;
/// diff links are resolved per file at the file's new revision.
pub struct CvsAdapter<'a> {
    entry: &'a ChangeEntry,
    commit: &'a CvsCommit,
    browser: Option<&'a dyn RepositoryBrowser>,
}

impl<'a> CvsAdapter<'a> {
    /// Wraps a CVS commit and the entry it came from.
    #[must_use]
    pub fn new(
        entry: &'a ChangeEntry,
        commit: &'a CvsCommit,
        browser: Option<&'a dyn RepositoryBrowser>,
    ) -> Self {
        Self { entry, commit, browser }
    }
}

impl ChangeAdapter for CvsAdapter<'_> {
    fn author(&self) -> Option<String> {
        self.commit.author.clone()
    }

    fn message(&self) -> Option<String> {
        self.commit.message.clone()
    }

    fn revision(&self) -> Option<String> {
        None
    }

    fn change_set_link(&self) -> Option<String> {
        None
    }

    fn affected_paths(&self) -> Vec<AffectedPath> {
        self.commit
            .files
            .iter()
            .map(|file| AffectedPath {
                mark: file.edit.mark(),
                path: file.full_name.clone(),
                revision: file.prev_revision.clone(),
                diff_link: resolve_diff_link(
                    self.browser,
                    self.entry,
                    &file.full_name,
                    Some(&file.revision),
                )
                .into(),
            })
            .collect()
    }
}

/// Adapter for Subversion commits.
pub struct SubversionAdapter<'a> {
    entry: &'a ChangeEntry,
    commit: &'a SvnCommit,
    browser: Option<&'a dyn RepositoryBrowser>,
}

impl<'a> SubversionAdapter<'a> {
    /// Wraps a Subversion commit and the entry it came from.
    #[must_use]
    pub fn new(
        entry: &'a ChangeEntry,
        commit: &'a SvnCommit,
        browser: Option<&'a dyn RepositoryBrowser>,
    ) -> Self {
        Self { entry, commit, browser }
    }
}

impl ChangeAdapter for SubversionAdapter<'_> {
    fn author(&self) -> Option<String> {
        self.commit.author.clone()
    }

    fn message(&self) -> Option<String> {
        self.commit.message.clone()
    }

    fn revision(&self) -> Option<String> {
        Some(self.commit.revision.to_string())
    }

    fn change_set_link(&self) -> Option<String> {
        resolve_change_set_link(self.browser, self.entry)
    }

    fn affected_paths(&self) -> Vec<AffectedPath> {
        let revision = self.commit.revision.to_string();
        self.commit
            .paths
            .iter()
            .map(|p| AffectedPath {
                mark: EditType::from_svn_action(p.action).mark(),
                path: p.path.clone(),
                revision: None,
                diff_link: resolve_diff_link(self.browser, self.entry, &p.path, Some(&revision))
                    .into(),
            })
            .collect()
    }
}

/// Adapter for Mercurial changesets.
pub struct MercurialAdapter<'a> {
    entry: &'a ChangeEntry,
    commit: &'a HgCommit,
    browser: Option<&'a dyn RepositoryBrowser>,
}

impl<'a> MercurialAdapter<'a> {
    /// Wraps a Mercurial changeset and the entry it came from.
    #[must_use]
    pub fn new(
        entry: &'a ChangeEntry,
        commit: &'a HgCommit,
        browser: Option<&'a dyn RepositoryBrowser>,
    ) -> Self {
        Self { entry, commit, browser }
    }
}

impl ChangeAdapter for MercurialAdapter<'_> {
    fn author(&self) -> Option<String> {
        self.commit.author.clone()
    }

    fn message(&self) -> Option<String> {
        self.commit.message.clone()
    }

    fn revision(&self) -> Option<String> {
        Some(format!("{}:{}", self.commit.rev, self.commit.short_node()))
    }

    fn change_set_link(&self) -> Option<String> {
        resolve_change_set_link(self.browser, self.entry)
    }

    fn affected_paths(&self) -> Vec<AffectedPath> {
        let groups = [
            (EditType::Add, &self.commit.added),
            (EditType::Edit, &self.commit.modified),
            (EditType::Delete, &self.commit.deleted),
        ];
        groups
            .into_iter()
            .flat_map(|(edit, paths)| {
                paths.iter().map(move |path| AffectedPath {
                    mark: edit.mark(),
                    path: path.clone(),
                    revision: None,
                    diff_link: DiffLink::Unsupported,
                })
            })
            .collect()
    }
}

/// Adapter for Git commits.
pub struct GitAdapter<'a> {
    entry: &'a ChangeEntry,
    commit: &'a GitCommit,
    browser: Option<&'a dyn RepositoryBrowser>,
}

impl<'a> GitAdapter<'a> {
    /// Wraps a Git commit and the entry it came from.
    #[must_use]
    pub fn new(
        entry: &'a ChangeEntry,
        commit: &'a GitCommit,
        browser: Option<&'a dyn RepositoryBrowser>,
    ) -> Self {
        Self { entry, commit, browser }
    }
}

impl ChangeAdapter for GitAdapter<'_> {
    fn author(&self) -> Option<String> {
        self.commit.author.clone()
    }

    fn message(&self) -> Option<String> {
        self.commit.message.clone()
    }

    fn revision(&self) -> Option<String> {
        Some(self.commit.id.clone())
    }

    fn change_set_link(&self) -> Option<String> {
        resolve_change_set_link(self.browser, self.entry)
    }

    fn affected_paths(&self) -> Vec<AffectedPath> {
        self.commit
            .paths
            .iter()
            .map(|p| AffectedPath {
                mark: p.edit.mark(),
                path: p.path.clone(),
                revision: None,
                diff_link: DiffLink::Unsupported,
            })
            .collect()
    }
}

/// Fallback adapter for any entry.
///
/// Only the message, author and plain path list are known; revision and
/// links have no backend-independent scheme and are always unknown.
pub struct DefaultAdapter<'a> {
    entry: &'a ChangeEntry,
}

impl<'a> DefaultAdapter<'a> {
    /// Wraps any entry.
    #[must_use]
    pub fn new(entry: &'a ChangeEntry) -> Self {
        Self { entry }
    }
}

impl ChangeAdapter for DefaultAdapter<'_> {
    fn author(&self) -> Option<String> {
        self.entry.author().map(String::from)
    }

    fn message(&self) -> Option<String> {
        self.entry.message().map(String::from)
    }

    fn revision(&self) -> Option<String> {
        None
    }

    fn change_set_link(&self) -> Option<String> {
        None
    }

    fn affected_paths(&self) -> Vec<AffectedPath> {
        self.entry
            .affected_paths()
            .into_iter()
            .map(|path| AffectedPath {
                mark: EditType::Unknown.mark(),
                path: path.to_string(),
                revision: None,
                diff_link: DiffLink::Unsupported,
            })
            .collect()
    }
}

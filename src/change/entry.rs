//! Backend-native commit entries as supplied by the SCM layer.

use serde::{Deserialize, Serialize};

/// Version-control backend that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// CVS.
    Cvs,
    /// Subversion.
    Subversion,
    /// Mercurial.
    Mercurial,
    /// Git.
    Git,
    /// Anything else; only generic fields are known.
    Default,
}

/// How a path was touched by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EditType {
    /// Path was added.
    Add,
    /// Path was modified.
    Edit,
    /// Path was deleted.
    Delete,
    /// The backend did not say, or said something unrecognised.
    #[default]
    Unknown,
}

impl EditType {
    /// Single-character mark rendered in front of a path.
    #[must_use]
    pub fn mark(self) -> char {
        match self {
            Self::Add => 'A',
            Self::Edit => 'M',
            Self::Delete => 'D',
            Self::Unknown => '?',
        }
    }

    /// Maps a Subversion action letter (`A`, `M`, `D`, `R`) to an edit type.
    #[must_use]
    pub fn from_svn_action(action: char) -> Self {
        match action.to_ascii_uppercase() {
            'A' => Self::Add,
            'M' | 'R' => Self::Edit,
            'D' => Self::Delete,
            _ => Self::Unknown,
        }
    }
}

/// One file in a CVS commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvsFile {
    /// Repository-relative file name.
    pub full_name: String,
    /// Revision after the commit.
    pub revision: String,
    /// Revision before the commit, if any.
    #[serde(default)]
    pub prev_revision: Option<String>,
    /// Kind of change.
    #[serde(default)]
    pub edit: EditType,
}

/// A CVS commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvsCommit {
    /// Committer, if resolvable.
    #[serde(default)]
    pub author: Option<String>,
    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Files touched.
    #[serde(default)]
    pub files: Vec<CvsFile>,
}

/// One path in a Subversion commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvnPath {
    /// Repository path.
    pub path: String,
    /// Action letter reported by `svn log` (`A`, `M`, `D`, `R`).
    pub action: char,
}

/// A Subversion commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvnCommit {
    /// Committer, if resolvable.
    #[serde(default)]
    pub author: Option<String>,
    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Repository revision number.
    pub revision: u64,
    /// Paths touched.
    #[serde(default)]
    pub paths: Vec<SvnPath>,
}

/// A Mercurial changeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HgCommit {
    /// Committer, if resolvable.
    #[serde(default)]
    pub author: Option<String>,
    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Local revision number.
    pub rev: u64,
    /// Full node hash.
    pub node: String,
    /// Paths added.
    #[serde(default)]
    pub added: Vec<String>,
    /// Paths modified.
    #[serde(default)]
    pub modified: Vec<String>,
    /// Paths deleted.
    #[serde(default)]
    pub deleted: Vec<String>,
}

impl HgCommit {
    /// Node hash abbreviated the way `hg log` prints it.
    #[must_use]
    pub fn short_node(&self) -> &str {
        self.node.get(..12).unwrap_or(&self.node)
    }
}

/// One path in a Git commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitPath {
    /// Path relative to the repository root.
    pub path: String,
    /// Kind of change.
    #[serde(default)]
    pub edit: EditType,
}

/// A Git commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitCommit {
    /// Commit author, if resolvable.
    #[serde(default)]
    pub author: Option<String>,
    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Commit hash.
    pub id: String,
    /// Paths touched.
    #[serde(default)]
    pub paths: Vec<GitPath>,
}

/// A commit from a backend with no dedicated adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericCommit {
    /// Committer, if resolvable.
    #[serde(default)]
    pub author: Option<String>,
    /// Commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Paths touched.
    #[serde(default)]
    pub affected_paths: Vec<String>,
}

/// A commit entry in its backend's native shape, tagged with its backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scm", rename_all = "snake_case")]
pub enum ChangeEntry {
    /// CVS commit.
    Cvs(CvsCommit),
    /// Subversion commit.
    Subversion(SvnCommit),
    /// Mercurial changeset.
    Mercurial(HgCommit),
    /// Git commit.
    Git(GitCommit),
    /// Anything else.
    Other(GenericCommit),
}

impl ChangeEntry {
    /// Backend that produced the entry.
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        match self {
            Self::Cvs(_) => BackendKind::Cvs,
            Self::Subversion(_) => BackendKind::Subversion,
            Self::Mercurial(_) => BackendKind::Mercurial,
            Self::Git(_) => BackendKind::Git,
            Self::Other(_) => BackendKind::Default,
        }
    }

    /// Commit author, whatever the backend.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        match self {
            Self::Cvs(c) => c.author.as_deref(),
            Self::Subversion(c) => c.author.as_deref(),
            Self::Mercurial(c) => c.author.as_deref(),
            Self::Git(c) => c.author.as_deref(),
            Self::Other(c) => c.author.as_deref(),
        }
    }

    /// Commit message, whatever the backend.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Cvs(c) => c.message.as_deref(),
            Self::Subversion(c) => c.message.as_deref(),
            Self::Mercurial(c) => c.message.as_deref(),
            Self::Git(c) => c.message.as_deref(),
            Self::Other(c) => c.message.as_deref(),
        }
    }

    /// Plain list of touched paths, whatever the backend.
    #[must_use]
    pub fn affected_paths(&self) -> Vec<&str> {
        match self {
            Self::Cvs(c) => c.files.iter().map(|f| f.full_name.as_str()).collect(),
            Self::Subversion(c) => c.paths.iter().map(|p| p.path.as_str()).collect(),
            Self::Mercurial(c) => {
                c.added.iter().chain(&c.modified).chain(&c.deleted).map(String::as_str).collect()
            }
            Self::Git(c) => c.paths.iter().map(|p| p.path.as_str()).collect(),
            Self::Other(c) => c.affected_paths.iter().map(String::as_str).collect(),
        }
    }
}

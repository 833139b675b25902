//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the update core and a
//! collaborator it does not own (issue tracker, SCM, repository browser,
//! filesystem). Implementations live in `src/adapters/`.

pub mod browser;
pub mod filesystem;
pub mod issues;
pub mod scm;

pub use browser::RepositoryBrowser;
pub use filesystem::FileSystem;
pub use issues::{Issue, IssueTracker};
pub use scm::ChangeSupplier;

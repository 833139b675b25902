//! Repository browser port for change-set and diff links.

use crate::change::ChangeEntry;

/// Resolves web links for commits in the job's repository browser.
///
/// `Ok(None)` means the browser has no link for this entry; errors are
/// downgraded to an unknown link by the caller.
pub trait RepositoryBrowser: Send + Sync {
    /// Link to the whole commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be built.
    fn change_set_link(
        &self,
        entry: &ChangeEntry,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;

    /// Link to the diff of one path at `revision`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be built.
    fn diff_link(
        &self,
        entry: &ChangeEntry,
        path: &str,
        revision: Option<&str>,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;
}

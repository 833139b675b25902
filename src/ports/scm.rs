//! SCM port supplying the change history of a build.

use crate::change::ChangeEntry;

/// Supplies the commits that went into the current build.
pub trait ChangeSupplier: Send + Sync {
    /// Returns the build's commits in the order the SCM reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if the change history cannot be obtained.
    fn changes(&self) -> Result<Vec<ChangeEntry>, Box<dyn std::error::Error + Send + Sync>>;
}

//! Builds [`ChangeSet`]s by picking the adapter for an entry's backend.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::adapter::{
    ChangeAdapter, CvsAdapter, DefaultAdapter, GitAdapter, MercurialAdapter, NormalizedChange,
    SubversionAdapter,
};
use super::entry::{BackendKind, ChangeEntry};
use crate::ports::RepositoryBrowser;
use crate::ticket::TicketId;

/// A normalised commit paired with one ticket it references.
///
/// Serialisable so it can be carried over to the next build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Referenced ticket.
    pub ticket_id: TicketId,
    /// Adapter that normalised the commit.
    pub backend: BackendKind,
    /// The normalised commit.
    pub change: NormalizedChange,
}

/// Backends whose dedicated adapter is available in this installation.
///
/// Entries from a backend not listed here fall through to the default adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendSupport(BTreeSet<BackendKind>);

impl BackendSupport {
    /// Every dedicated adapter enabled.
    #[must_use]
    pub fn all() -> Self {
        Self::only([BackendKind::Cvs, BackendKind::Subversion, BackendKind::Mercurial, BackendKind::Git])
    }

    /// Only the given backends enabled.
    #[must_use]
    pub fn only(kinds: impl IntoIterator<Item = BackendKind>) -> Self {
        Self(kinds.into_iter().filter(|k| *k != BackendKind::Default).collect())
    }

    /// Whether the dedicated adapter for `kind` may be used.
    #[must_use]
    pub fn supports(&self, kind: BackendKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for BackendSupport {
    fn default() -> Self {
        Self::all()
    }
}

/// Selects an adapter per entry and wraps the result in a [`ChangeSet`].
#[derive(Debug, Clone, Default)]
pub struct ChangeSetFactory {
    support: BackendSupport,
}

impl ChangeSetFactory {
    /// Creates a factory honouring the given capability flags.
    #[must_use]
    pub fn new(support: BackendSupport) -> Self {
        Self { support }
    }

    /// Normalises `entry` and pairs it with `ticket_id`.
    #[must_use]
    pub fn create(
        &self,
        ticket_id: TicketId,
        entry: &ChangeEntry,
        browser: Option<&dyn RepositoryBrowser>,
    ) -> ChangeSet {
        let (backend, adapter) = self.adapter_for(entry, browser);
        ChangeSet { ticket_id, backend, change: adapter.normalize() }
    }

    fn adapter_for<'a>(
        &self,
        entry: &'a ChangeEntry,
        browser: Option<&'a dyn RepositoryBrowser>,
    ) -> (BackendKind, Box<dyn ChangeAdapter + 'a>) {
        let kind = entry.backend();
        if !self.support.supports(kind) {
            return (BackendKind::Default, Box::new(DefaultAdapter::new(entry)));
        }
        match entry {
            ChangeEntry::Cvs(c) => (kind, Box::new(CvsAdapter::new(entry, c, browser))),
            ChangeEntry::Subversion(c) => (kind, Box::new(SubversionAdapter::new(entry, c, browser))),
            ChangeEntry::Mercurial(c) => (kind, Box::new(MercurialAdapter::new(entry, c, browser))),
            ChangeEntry::Git(c) => (kind, Box::new(GitAdapter::new(entry, c, browser))),
            ChangeEntry::Other(_) => (BackendKind::Default, Box::new(DefaultAdapter::new(entry))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::entry::{EditType, GenericCommit, GitCommit, GitPath, HgCommit};

    fn id(raw: u32) -> TicketId {
        TicketId::new(raw).unwrap()
    }

    fn git_entry() -> ChangeEntry {
        ChangeEntry::Git(GitCommit {
            author: Some("alice".into()),
            message: Some("issue 5".into()),
            id: "c0ffee".into(),
            paths: vec![GitPath { path: "a.rs".into(), edit: EditType::Add }],
        })
    }

    #[test]
    fn supported_backend_gets_its_adapter() {
        let factory = ChangeSetFactory::default();
        let set = factory.create(id(5), &git_entry(), None);
        assert_eq!(set.backend, BackendKind::Git);
        assert_eq!(set.ticket_id, id(5));
        assert_eq!(set.change.revision.as_deref(), Some("c0ffee"));
        assert_eq!(set.change.affected_paths[0].mark, 'A');
    }

    #[test]
    fn disabled_backend_falls_back_to_default() {
        let factory = ChangeSetFactory::new(BackendSupport::only([BackendKind::Mercurial]));
        let set = factory.create(id(5), &git_entry(), None);
        assert_eq!(set.backend, BackendKind::Default);
        assert_eq!(set.change.revision, None);
        assert_eq!(set.change.affected_paths[0].mark, '?');
        assert_eq!(set.change.message.as_deref(), Some("issue 5"));

        let hg = ChangeEntry::Mercurial(HgCommit {
            author: None,
            message: None,
            rev: 1,
            node: "ab".into(),
            added: vec![],
            modified: vec![],
            deleted: vec![],
        });
        assert_eq!(factory.create(id(1), &hg, None).backend, BackendKind::Mercurial);
    }

    #[test]
    fn other_entries_use_default_adapter() {
        let entry = ChangeEntry::Other(GenericCommit {
            author: None,
            message: Some("quick fix".into()),
            affected_paths: vec!["src/a.txt".into()],
        });
        let set = ChangeSetFactory::default().create(id(9), &entry, None);
        assert_eq!(set.backend, BackendKind::Default);
        assert_eq!(set.change.author, None);
    }

    #[test]
    fn support_never_lists_default() {
        let support = BackendSupport::only([BackendKind::Default, BackendKind::Cvs]);
        assert!(!support.supports(BackendKind::Default));
        assert!(support.supports(BackendKind::Cvs));
    }

    #[test]
    fn change_set_survives_yaml() {
        let set = ChangeSetFactory::default().create(id(5), &git_entry(), None);
        let yaml = serde_yaml::to_string(&set).unwrap();
        let back: ChangeSet = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, set);
    }
}

//! Live adapter for the `RepositoryBrowser` port built from URL templates.

use crate::change::ChangeEntry;
use crate::config::BrowserTemplates;
use crate::ports::RepositoryBrowser;

/// Builds links by substituting `{revision}` and `{path}` into templates.
pub struct TemplateBrowser {
    templates: BrowserTemplates,
}

impl TemplateBrowser {
    /// Creates a browser from the configured templates.
    #[must_use]
    pub fn new(templates: BrowserTemplates) -> Self {
        Self { templates }
    }
}

/// The commit-wide revision an entry is addressed by, if it has one.
fn commit_revision(entry: &ChangeEntry) -> Option<String> {
    match entry {
        ChangeEntry::Subversion(c) => Some(c.revision.to_string()),
        ChangeEntry::Mercurial(c) => Some(c.node.clone()),
        ChangeEntry::Git(c) => Some(c.id.clone()),
        ChangeEntry::Cvs(_) | ChangeEntry::Other(_) => None,
    }
}

impl RepositoryBrowser for TemplateBrowser {
    fn change_set_link(
        &self,
        entry: &ChangeEntry,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(template) = &self.templates.change_set else {
            return Ok(None);
        };
        Ok(commit_revision(entry).map(|revision| template.replace("{revision}", &revision)))
    }

    fn diff_link(
        &self,
        entry: &ChangeEntry,
        path: &str,
        revision: Option<&str>,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let Some(template) = &self.templates.diff else {
            return Ok(None);
        };
        let revision = revision.map(str::to_string).or_else(|| commit_revision(entry));
        match revision {
            Some(revision) => {
                Ok(Some(template.replace("{revision}", &revision).replace("{path}", path)))
            }
            None if template.contains("{revision}") => {
                Err(format!("no revision to build a diff link for {path}").into())
            }
            None => Ok(Some(template.replace("{path}", path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::entry::{CvsCommit, GitCommit};

    fn browser() -> TemplateBrowser {
        TemplateBrowser::new(BrowserTemplates {
            change_set: Some("https://scm/commit/{revision}".into()),
            diff: Some("https://scm/diff/{revision}/{path}".into()),
        })
    }

    fn git() -> ChangeEntry {
        ChangeEntry::Git(GitCommit { author: None, message: None, id: "c0ffee".into(), paths: vec![] })
    }

    fn cvs() -> ChangeEntry {
        ChangeEntry::Cvs(CvsCommit { author: None, message: None, files: vec![] })
    }

    #[test]
    fn substitutes_commit_revision() {
        assert_eq!(browser().change_set_link(&git()).unwrap().as_deref(), Some("https://scm/commit/c0ffee"));
        assert_eq!(
            browser().diff_link(&git(), "src/a.rs", None).unwrap().as_deref(),
            Some("https://scm/diff/c0ffee/src/a.rs")
        );
    }

    #[test]
    fn explicit_revision_wins_over_commit_revision() {
        let link = browser().diff_link(&cvs(), "main.c", Some("1.4")).unwrap();
        assert_eq!(link.as_deref(), Some("https://scm/diff/1.4/main.c"));
    }

    #[test]
    fn cvs_has_no_change_set_and_no_revisionless_diff() {
        assert_eq!(browser().change_set_link(&cvs()).unwrap(), None);
        assert!(browser().diff_link(&cvs(), "main.c", None).is_err());
    }

    #[test]
    fn missing_templates_mean_no_links() {
        let browser = TemplateBrowser::new(BrowserTemplates::default());
        assert_eq!(browser.change_set_link(&git()).unwrap(), None);
        assert_eq!(browser.diff_link(&git(), "a", None).unwrap(), None);
    }
}

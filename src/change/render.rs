//! Plain-text rendering of change sets into tracker notes.

use super::adapter::DiffLink;
use super::factory::ChangeSet;

/// Rendered in place of any field the backend could not supply.
pub const UNKNOWN: &str = "unknown";

/// Renders the change-log body for one change set.
///
/// Sections, in order: revision and change-set link, author, message, then
/// one line per affected path.
#[must_use]
pub fn render_change_log(set: &ChangeSet) -> String {
    let change = &set.change;
    let mut lines = vec![
        format!(
            "Revision: {} ({})",
            change.revision.as_deref().unwrap_or(UNKNOWN),
            change.change_set_link.as_deref().unwrap_or(UNKNOWN)
        ),
        format!("Author: {}", change.author.as_deref().unwrap_or(UNKNOWN)),
        format!("Log: {}", change.message.as_deref().unwrap_or(UNKNOWN)),
        "Changed paths:".to_string(),
    ];
    for path in &change.affected_paths {
        let mut line = format!("  {} {}", path.mark, path.path);
        if let Some(revision) = &path.revision {
            line += &format!(" (rev {revision})");
        }
        match &path.diff_link {
            DiffLink::Unsupported => {}
            DiffLink::Unknown => line += &format!(" {UNKNOWN}"),
            DiffLink::Url(url) => line += &format!(" {url}"),
        }
        lines.push(line);
    }
    lines.push(String::new());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Header linking a note back to the build that integrated the change.
#[must_use]
pub fn integrated_header(job: &str, number: u32, build_url: &str) -> String {
    format!("Integrated in {job} #{number} (See [{build_url}])")
}

/// Full note text: the integration header, and the change log when requested.
#[must_use]
pub fn render_note(header: &str, set: &ChangeSet, record_changelog: bool) -> String {
    let mut text = format!("{header}\n\n");
    if record_changelog {
        text.push_str(&render_change_log(set));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::adapter::{AffectedPath, NormalizedChange};
    use crate::change::entry::{BackendKind, ChangeEntry, GenericCommit};
    use crate::change::factory::ChangeSetFactory;
    use crate::ticket::TicketId;

    #[test]
    fn default_adapter_note_uses_unknown_sentinels() {
        let entry = ChangeEntry::Other(GenericCommit {
            author: None,
            message: Some("quick fix".into()),
            affected_paths: vec!["src/a.txt".into()],
        });
        let set = ChangeSetFactory::default().create(TicketId::new(1).unwrap(), &entry, None);
        let text = render_change_log(&set);

        assert!(text.contains("Revision: unknown (unknown)"));
        assert!(text.contains("Author: unknown"));
        assert!(text.contains("Log: quick fix"));
        let path_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("  ")).collect();
        assert_eq!(path_lines, vec!["  ? src/a.txt"]);
    }

    #[test]
    fn path_lines_show_revision_and_diff_link_when_present() {
        let set = ChangeSet {
            ticket_id: TicketId::new(2).unwrap(),
            backend: BackendKind::Cvs,
            change: NormalizedChange {
                author: Some("bob".into()),
                message: None,
                affected_paths: vec![
                    AffectedPath {
                        mark: 'M',
                        path: "src/main.c".into(),
                        revision: Some("1.4".into()),
                        diff_link: DiffLink::Url("https://cvs/diff".into()),
                    },
                    AffectedPath {
                        mark: 'D',
                        path: "old.c".into(),
                        revision: None,
                        diff_link: DiffLink::Unknown,
                    },
                ],
                revision: None,
                change_set_link: None,
            },
        };
        let text = render_change_log(&set);
        assert!(text.contains("Log: unknown"));
        assert!(text.contains("  M src/main.c (rev 1.4) https://cvs/diff\n"));
        assert!(text.contains("  D old.c unknown\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn change_log_layout_is_exact() {
        let set = ChangeSet {
            ticket_id: TicketId::new(4).unwrap(),
            backend: BackendKind::Git,
            change: NormalizedChange {
                author: Some("alice".into()),
                message: Some("issue 4".into()),
                affected_paths: vec![AffectedPath {
                    mark: 'A',
                    path: "src/new.rs".into(),
                    revision: None,
                    diff_link: DiffLink::Unsupported,
                }],
                revision: Some("c0ffee".into()),
                change_set_link: None,
            },
        };
        assert_eq!(
            render_change_log(&set),
            "Revision: c0ffee (unknown)\nAuthor: alice\nLog: issue 4\nChanged paths:\n  A src/new.rs\n\n"
        );

        let empty = ChangeSet { change: NormalizedChange::default(), ..set };
        assert!(render_change_log(&empty).ends_with("Changed paths:\n\n"));
    }

    #[test]
    fn note_without_changelog_is_header_only() {
        let set = ChangeSet {
            ticket_id: TicketId::new(3).unwrap(),
            backend: BackendKind::Default,
            change: NormalizedChange::default(),
        };
        let header = integrated_header("core", 17, "https://ci/job/core/17/");
        assert_eq!(header, "Integrated in core #17 (See [https://ci/job/core/17/])");
        assert_eq!(render_note(&header, &set, false), format!("{header}\n\n"));
        assert!(render_note(&header, &set, true).contains("Changed paths:"));
    }
}

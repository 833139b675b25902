//! Ticket identifiers and the commit-message scanner that finds them.

use std::fmt;
use std::num::NonZeroU32;

use regex::{CaptureMatches, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// Identifier of a ticket in the issue tracker. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(NonZeroU32);

impl TicketId {
    /// Wraps a raw id, rejecting zero.
    #[must_use]
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TicketId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s.trim().parse().map_err(|e| format!("{s:?} is not a ticket id: {e}"))?;
        Self::new(raw).ok_or_else(|| format!("{s:?} is not a ticket id: must be positive"))
    }
}

/// Finds ticket references in commit messages with a single configured pattern.
///
/// The id is read from the pattern's first capturing group.
#[derive(Debug, Clone)]
pub struct TicketScanner {
    pattern: Regex,
}

impl TicketScanner {
    /// Compiles `pattern` into a scanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex or has no capturing group.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        Self::from_regex(Regex::new(pattern)?)
    }

    /// Wraps an already compiled pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern has no capturing group.
    pub fn from_regex(pattern: Regex) -> Result<Self, ConfigError> {
        if pattern.captures_len() < 2 {
            return Err(ConfigError::MissingCaptureGroup(pattern.as_str().to_string()));
        }
        Ok(Self { pattern })
    }

    /// The source text of the pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Lazily yields the ticket ids referenced in `message`, left to right.
    ///
    /// Matches whose capture is not a positive integer are logged and skipped.
    /// Call again to restart the scan.
    #[must_use]
    pub fn scan<'s, 'm>(&'s self, message: &'m str) -> TicketRefs<'s, 'm> {
        TicketRefs { matches: self.pattern.captures_iter(message) }
    }
}

/// Iterator over ticket ids found by [`TicketScanner::scan`].
pub struct TicketRefs<'s, 'm> {
    matches: CaptureMatches<'s, 'm>,
}

impl Iterator for TicketRefs<'_, '_> {
    type Item = TicketId;

    fn next(&mut self) -> Option<TicketId> {
        for caps in self.matches.by_ref() {
            let Some(group) = caps.get(1) else {
                warn!(matched = caps.get(0).map_or("", |m| m.as_str()), "ticket pattern matched without an id group");
                continue;
            };
            match group.as_str().parse::<TicketId>() {
                Ok(id) => return Some(id),
                Err(reason) => warn!(capture = group.as_str(), %reason, "skipping malformed ticket reference"),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(scanner: &TicketScanner, message: &str) -> Vec<u32> {
        scanner.scan(message).map(TicketId::get).collect()
    }

    #[test]
    fn finds_every_reference_in_order() {
        let scanner = TicketScanner::new(r"MANTIS-(\d+)").unwrap();
        assert_eq!(ids(&scanner, "fix: resolves MANTIS-42 and also MANTIS-7"), vec![42, 7]);
    }

    #[test]
    fn no_match_yields_nothing() {
        let scanner = TicketScanner::new(r"MANTIS-(\d+)").unwrap();
        assert!(ids(&scanner, "refactor the parser").is_empty());
        assert!(ids(&scanner, "").is_empty());
    }

    #[test]
    fn malformed_capture_is_skipped_and_scan_continues() {
        let scanner = TicketScanner::new(r"#(\w+)").unwrap();
        assert_eq!(ids(&scanner, "see #abc then #12 and #0 and #99999999999 and #5"), vec![12, 5]);
    }

    #[test]
    fn scan_is_restartable() {
        let scanner = TicketScanner::new(r"issue #?(\d+)").unwrap();
        let message = "issue #1, issue 2";
        assert_eq!(ids(&scanner, message), ids(&scanner, message));
        assert_eq!(ids(&scanner, message), vec![1, 2]);
    }

    #[test]
    fn optional_group_that_does_not_participate_is_skipped() {
        let scanner = TicketScanner::new(r"bug(?: (\d+))?").unwrap();
        assert_eq!(ids(&scanner, "bug here, bug 8"), vec![8]);
    }

    #[test]
    fn pattern_without_group_is_rejected() {
        let err = TicketScanner::new(r"MANTIS-\d+").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCaptureGroup(_)));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(matches!(TicketScanner::new(r"(\d+"), Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn ticket_id_parses_and_displays() {
        let id: TicketId = "42".parse().unwrap();
        assert_eq!(id.to_string(), "42");
        assert!("0".parse::<TicketId>().is_err());
        assert!("-3".parse::<TicketId>().is_err());
    }
}

//! Build records as seen by the updater, and the delta it hands back.
//!
//! The updater never mutates host state. It reads a [`BuildRecord`] and
//! returns an [`UpdateDelta`]; the host (see [`crate::store`]) applies it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::change::ChangeSet;
use crate::ports::Issue;
use crate::ticket::TicketId;

/// Outcome of a build, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    /// Everything passed.
    Success,
    /// Built, but tests or checks flagged problems.
    Unstable,
    /// The build failed.
    Failure,
    /// The build was interrupted.
    Aborted,
}

impl BuildResult {
    /// Whether `self` is strictly worse than `other`.
    #[must_use]
    pub fn is_worse_than(self, other: Self) -> bool {
        self > other
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "SUCCESS",
            Self::Unstable => "UNSTABLE",
            Self::Failure => "FAILURE",
            Self::Aborted => "ABORTED",
        })
    }
}

impl FromStr for BuildResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "unstable" => Ok(Self::Unstable),
            "failure" => Ok(Self::Failure),
            "aborted" => Ok(Self::Aborted),
            other => Err(format!(
                "unknown build result {other:?}; expected success, unstable, failure or aborted"
            )),
        }
    }
}

/// Change sets deferred by a build whose result did not warrant updating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CarryOverRecord {
    /// Deferred change sets, in gather order.
    pub change_sets: Vec<ChangeSet>,
}

/// The build immediately before the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorBuild {
    /// Build number.
    pub number: u32,
    /// Change sets that build deferred, if any.
    #[serde(default)]
    pub carry_over: Option<CarryOverRecord>,
}

/// The build being processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Job name.
    pub job: String,
    /// Build number within the job.
    pub number: u32,
    /// Build URL relative to the CI root URL (e.g. `job/core/17/`).
    pub url: String,
    /// Current result; `None` while the build is still running.
    #[serde(default)]
    pub result: Option<BuildResult>,
    /// One hop back, never further.
    #[serde(default)]
    pub previous: Option<PriorBuild>,
}

/// One ticket that was annotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// The ticket.
    pub ticket_id: TicketId,
    /// Ticket state fetched before the note was added.
    pub issue: Issue,
    /// Whether a note was pushed.
    pub updated: bool,
}

/// Per-build report of annotated tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Ticket pattern in effect, kept for rendering links downstream.
    pub pattern: String,
    /// Successful updates, in processing order.
    pub outcomes: Vec<UpdateOutcome>,
}

/// Changes the host should apply to the current build's record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateDelta {
    /// Result override; only ever `Some(Failure)` on a precondition failure.
    pub result: Option<BuildResult>,
    /// Carry-over to attach, replacing any existing one.
    pub carry_over: Option<CarryOverRecord>,
    /// Report to attach, replacing any existing one.
    pub report: Option<BuildReport>,
}

impl UpdateDelta {
    /// Whether applying this delta changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.result.is_none() && self.carry_over.is_none() && self.report.is_none()
    }
}

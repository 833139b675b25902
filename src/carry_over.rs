//! Carry-over of deferred change sets between consecutive builds.

use crate::build::{BuildRecord, CarryOverRecord, UpdateDelta};
use crate::change::ChangeSet;

/// Returns the change sets deferred by the build immediately before `build`.
///
/// Looks back exactly one build; older carry-overs are not consulted.
#[must_use]
pub fn read(build: &BuildRecord) -> Option<&CarryOverRecord> {
    build.previous.as_ref()?.carry_over.as_ref()
}

/// Attaches `change_sets` as the current build's carry-over.
///
/// Replaces any carry-over already in the delta.
pub fn write(delta: &mut UpdateDelta, change_sets: Vec<ChangeSet>) {
    delta.carry_over = Some(CarryOverRecord { change_sets });
}

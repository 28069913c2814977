//! Ordered track groups and the group-visit sort priority.
//!
//! Tracks are partitioned into an ordered list of groups; a track belongs to
//! exactly one group at all times. Groups are created implicitly when a
//! track targets an index past the end of the list, and an emptied group
//! stays in place so later insertions land where the caller expects.

use crate::error::{Error, Result};
use crate::track::TrackId;

#[derive(Default)]
pub(crate) struct TrackGroups {
    groups: Vec<Vec<TrackId>>,
    /// Group indices in the order they are consulted for sort tie-breaking.
    /// Need not mention every group.
    sort_priority: Vec<usize>,
}

impl TrackGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track to the given group, padding the list with empty
    /// groups until the index exists.
    pub fn push_track(&mut self, group: usize, id: TrackId) {
        while self.groups.len() <= group {
            self.groups.push(Vec::new());
        }
        self.groups[group].push(id);
    }

    /// Removes a track from its containing group. No-op when the track is
    /// unknown; the group itself stays even when it becomes empty.
    pub fn remove_track(&mut self, id: TrackId) {
        for group in &mut self.groups {
            if let Some(position) = group.iter().position(|&t| t == id) {
                group.remove(position);
                return;
            }
        }
    }

    /// Moves a group with insert-before semantics: the mover is pulled out,
    /// then reinserted immediately ahead of the group that sat at `to`
    /// before the call. `move_group(i, i)` is a no-op.
    pub fn move_group(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.groups.len();
        if from >= len {
            return Err(Error::group_index_out_of_range(from, len));
        }
        if to >= len {
            return Err(Error::group_index_out_of_range(to, len));
        }
        if from == to {
            return Ok(());
        }
        let mover = self.groups.remove(from);
        // After the removal the group originally at `to` has shifted left
        // by one when it sat past the mover.
        let insert_at = if to > from { to - 1 } else { to };
        self.groups.insert(insert_at, mover);
        Ok(())
    }

    /// Repositions a track inside its containing group. No-op when the
    /// track is unknown; positions past the end clamp to the end.
    pub fn move_track_within_group(&mut self, id: TrackId, new_position: usize) {
        for group in &mut self.groups {
            if let Some(position) = group.iter().position(|&t| t == id) {
                group.remove(position);
                let new_position = new_position.min(group.len());
                group.insert(new_position, id);
                return;
            }
        }
        tracing::debug!(%id, "move_track_within_group on unknown track; ignoring");
    }

    /// Snapshot of the group containing the track.
    pub fn containing_group(&self, id: TrackId) -> Option<Vec<TrackId>> {
        self.groups.iter().find(|g| g.contains(&id)).cloned()
    }

    /// Track ids in visiting order: groups in storage order, tracks within
    /// a group in storage order.
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.groups.iter().flatten().copied().collect()
    }

    pub fn groups(&self) -> &[Vec<TrackId>] {
        &self.groups
    }

    pub fn set_sort_priority(&mut self, priority: Vec<usize>) {
        self.sort_priority = priority;
    }

    pub fn sort_priority(&self) -> &[usize] {
        &self.sort_priority
    }
}

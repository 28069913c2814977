//! The multi-key sort across track comparators.
//!
//! Sorting walks tracks in priority order (groups per the configured sort
//! priority, tracks in intra-group order) and compares two identifiers by
//! the first track comparator that tells them apart. The sort itself is
//! stable: identifiers every comparator considers equal keep their previous
//! relative order.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::group::TrackGroups;
use crate::identifier::Identifier;
use crate::track::{TrackId, TrackStore};

/// Flattens the group sort priority into the ordered list of tracks whose
/// comparators participate in the sort. Priority entries that no longer
/// name a group (e.g. after group removal) are skipped.
fn priority_tracks(groups: &TrackGroups) -> Vec<TrackId> {
    let mut tracks = Vec::new();
    for &group_index in groups.sort_priority() {
        match groups.groups().get(group_index) {
            Some(group) => tracks.extend_from_slice(group),
            None => {
                tracing::warn!(group_index, "sort priority names a missing group; skipping");
            }
        }
    }
    tracks
}

/// Lexicographic comparison of two identifiers: the first non-equal
/// comparator result wins. A track without a record for an identifier
/// passes `None` to its comparator.
fn compare_ids(
    store: &TrackStore,
    priority: &[TrackId],
    a: &Identifier,
    b: &Identifier,
) -> Ordering {
    for &track_id in priority {
        let Some(track) = store.get(track_id) else {
            continue;
        };
        let record_a = track.id_to_record.get(a).map(Arc::as_ref);
        let record_b = track.id_to_record.get(b).map(Arc::as_ref);
        let ordering = (track.sort_cmp)(record_a, record_b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Returns the canonical order re-sorted under the current sort priority.
pub(crate) fn sorted_order(
    store: &TrackStore,
    groups: &TrackGroups,
    order: &[Identifier],
) -> Vec<Identifier> {
    let priority = priority_tracks(groups);
    let mut ids = order.to_vec();
    // slice::sort_by is stable, which is what keeps ties in place.
    ids.sort_by(|a, b| compare_ids(store, &priority, a, b));
    ids
}

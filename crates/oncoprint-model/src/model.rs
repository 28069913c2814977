//! The oncoprint model facade.
//!
//! [`OncoprintModel`] owns the canonical identifier order, per-track
//! configuration and data, the group layout, and the geometry state, and
//! keeps every derived view (position index, visible order, per-track
//! display data) consistent before any mutating call returns. The render
//! and interaction layers share one instance behind `Arc`; all queries
//! return owned snapshots, never references into the live state.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::group::TrackGroups;
use crate::identifier::{Identifier, IdentifierOrder};
use crate::sort;
use crate::track::{Record, RuleSet, TooltipFn, Track, TrackId, TrackSpec, TrackStore};

/// Initial geometry configuration for a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Unzoomed cell width in pixels.
    pub cell_width: f64,
    /// Unzoomed horizontal padding between cells, in pixels.
    pub cell_padding: f64,
    /// Whether cell padding is applied at all.
    pub cell_padding_on: bool,
    /// Horizontal zoom factor in `[0, 1]`.
    pub zoom: f64,
    /// Vertical padding above each track group, in pixels.
    pub track_group_padding: f64,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            cell_width: 10.0,
            cell_padding: 10.0,
            cell_padding_on: true,
            zoom: 1.0,
            track_group_padding: 10.0,
        }
    }
}

/// Everything behind the model's lock. Mutations happen on this plain
/// struct; the cross-component cascades live here so they run under one
/// write guard.
struct ModelState {
    order: IdentifierOrder,
    tracks: TrackStore,
    groups: TrackGroups,
    zoom: f64,
    cell_width: f64,
    cell_padding: f64,
    cell_padding_on: bool,
    track_group_padding: f64,
}

impl ModelState {
    fn recompute_all_display_data(&mut self) {
        let ModelState { order, tracks, .. } = self;
        for track in tracks.iter_mut() {
            track.compute_display_data(order);
        }
    }

    fn set_id_order(&mut self, ids: Vec<Identifier>) -> Result<()> {
        self.order.set_order(ids)?;
        self.recompute_all_display_data();
        Ok(())
    }

    /// Order replacement for internally produced sequences (permutations,
    /// deduplicated join keys) that are duplicate-free by construction.
    fn set_id_order_unchecked(&mut self, ids: Vec<Identifier>) {
        self.order.set_order_unchecked(ids);
        self.recompute_all_display_data();
    }

    fn add_track(&mut self, spec: TrackSpec) -> Result<()> {
        let track_id = spec.track_id;
        if self.tracks.contains(track_id) {
            return Err(Error::duplicate_track(track_id));
        }
        let (track, data, target_group) = Track::from_spec(spec);
        self.tracks.insert(track_id, track);
        self.groups.push_track(target_group, track_id);
        tracing::debug!(%track_id, group = target_group, "added track");
        // Initial data goes through the regular assignment path so it can
        // derive the global identifier order like any later update.
        self.set_track_data(track_id, data);
        Ok(())
    }

    fn set_track_data(&mut self, track_id: TrackId, data: Vec<Record>) {
        let derived_order = {
            let ModelState { order, tracks, .. } = self;
            let Some(track) = tracks.get_mut(track_id) else {
                tracing::debug!(%track_id, "set_track_data on unknown track; ignoring");
                return;
            };
            track.data = data.into_iter().map(Arc::new).collect();
            track.rebuild_id_lookup();
            // A track carrying more records than the canonical order has
            // entries redefines the global order from its own join keys.
            // Order-sensitive across tracks; see DESIGN.md.
            if track.data.len() > order.len() {
                Some(track.join_keys())
            } else {
                None
            }
        };
        match derived_order {
            Some(keys) => {
                tracing::warn!(
                    %track_id,
                    ids = keys.len(),
                    "track data exceeds identifier order; deriving a new global order"
                );
                self.set_id_order_unchecked(dedup_preserving_order(keys));
            }
            None => {
                let ModelState { order, tracks, .. } = self;
                if let Some(track) = tracks.get_mut(track_id) {
                    track.compute_display_data(order);
                }
            }
        }
    }

    fn set_track_data_id_key(&mut self, track_id: TrackId, key: String) {
        let ModelState { order, tracks, .. } = self;
        let Some(track) = tracks.get_mut(track_id) else {
            tracing::debug!(%track_id, "set_track_data_id_key on unknown track; ignoring");
            return;
        };
        track.data_id_key = key;
        track.rebuild_id_lookup();
        track.compute_display_data(order);
    }

    fn sort(&mut self) {
        let sorted = sort::sorted_order(&self.tracks, &self.groups, self.order.ids(true));
        self.set_id_order_unchecked(sorted);
    }

    fn track_top(&self, track_id: TrackId) -> Option<f64> {
        let mut y = 0.0;
        for group in self.groups.groups() {
            let mut found = false;
            for &id in group {
                if id == track_id {
                    found = true;
                    break;
                }
                if let Some(track) = self.tracks.get(id) {
                    y += 2.0 * track.padding + track.height;
                }
            }
            // Each group contributes its leading padding, the target's own
            // group included.
            y += self.track_group_padding;
            if found {
                return Some(y);
            }
        }
        None
    }
}

/// Removes repeated identifiers, keeping the first occurrence of each.
fn dedup_preserving_order(ids: Vec<Identifier>) -> Vec<Identifier> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if seen.insert(id.clone()) {
            unique.push(id);
        } else {
            tracing::warn!(%id, "duplicate join key while deriving identifier order; dropped");
        }
    }
    unique
}

/// The state model behind an interactive oncoprint.
///
/// Holds the authoritative identifier ordering, per-track configuration and
/// raw data, grouping and visibility, and the multi-key sort configuration,
/// and derives the filtered, ordered display data a renderer consumes.
///
/// # Example
///
/// ```
/// use oncoprint_model::{OncoprintModel, TrackId, TrackSpec};
/// use serde_json::json;
///
/// let model = OncoprintModel::new();
/// model
///     .add_track(TrackSpec::new(TrackId(1)).with_label("CNA").with_data(vec![
///         json!({"id": "S1", "value": 2}),
///         json!({"id": "S2", "value": -1}),
///     ]))
///     .unwrap();
///
/// assert_eq!(model.id_order(true).len(), 2);
/// assert_eq!(model.track_display_data(TrackId(1)).len(), 2);
/// ```
pub struct OncoprintModel {
    state: RwLock<ModelState>,
}

impl OncoprintModel {
    /// Creates an empty model with default geometry.
    pub fn new() -> Self {
        Self::with_options(ModelOptions::default())
    }

    /// Creates an empty model with the given geometry options. An
    /// out-of-range initial zoom falls back to 1.
    pub fn with_options(options: ModelOptions) -> Self {
        let zoom = if (0.0..=1.0).contains(&options.zoom) {
            options.zoom
        } else {
            tracing::warn!(zoom = options.zoom, "initial zoom outside [0, 1]; using 1");
            1.0
        };
        Self {
            state: RwLock::new(ModelState {
                order: IdentifierOrder::new(),
                tracks: TrackStore::default(),
                groups: TrackGroups::new(),
                zoom,
                cell_width: options.cell_width,
                cell_padding: options.cell_padding,
                cell_padding_on: options.cell_padding_on,
                track_group_padding: options.track_group_padding,
            }),
        }
    }

    // --- Geometry ---

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.state.read().zoom
    }

    /// Sets the zoom factor. Values outside `[0, 1]` are ignored and the
    /// prior value is retained. Returns the effective zoom.
    pub fn set_zoom(&self, zoom: f64) -> f64 {
        let mut state = self.state.write();
        if (0.0..=1.0).contains(&zoom) {
            state.zoom = zoom;
        } else {
            tracing::debug!(zoom, "zoom outside [0, 1]; keeping previous value");
        }
        state.zoom
    }

    /// Cell width scaled by zoom.
    pub fn cell_width(&self) -> f64 {
        let state = self.state.read();
        state.cell_width * state.zoom
    }

    /// Cell padding scaled by zoom; zero while the padding toggle is off.
    pub fn cell_padding(&self) -> f64 {
        let state = self.state.read();
        if state.cell_padding_on {
            state.cell_padding * state.zoom
        } else {
            0.0
        }
    }

    /// Flips the cell-padding toggle and returns the new setting.
    pub fn toggle_cell_padding(&self) -> bool {
        let mut state = self.state.write();
        state.cell_padding_on = !state.cell_padding_on;
        state.cell_padding_on
    }

    /// Vertical padding above each track group.
    pub fn track_group_padding(&self) -> f64 {
        self.state.read().track_group_padding
    }

    /// Vertical offset of a track: the heights and paddings of every track
    /// before it in visiting order, plus one group padding per group up to
    /// and including its own. `None` for an unknown track.
    pub fn track_top(&self, track_id: TrackId) -> Option<f64> {
        self.state.read().track_top(track_id)
    }

    // --- Identifier order and visibility ---

    /// Replaces the canonical identifier order and recomputes every derived
    /// view. Fails on duplicate identifiers, leaving the model untouched.
    pub fn set_id_order(&self, ids: Vec<Identifier>) -> Result<()> {
        self.state.write().set_id_order(ids)
    }

    /// Snapshot of the canonical order (`include_hidden`) or of the visible
    /// order.
    pub fn id_order(&self, include_hidden: bool) -> Vec<Identifier> {
        self.state.read().order.ids(include_hidden).to_vec()
    }

    /// Hidden identifiers, in canonical order.
    pub fn hidden_ids(&self) -> Vec<Identifier> {
        self.state.read().order.hidden_ids()
    }

    /// Hides identifiers. With `exclusive`, previously hidden identifiers
    /// are shown again first. Display data follows the visibility change
    /// for every track.
    pub fn hide_ids(&self, ids: &[Identifier], exclusive: bool) {
        let mut state = self.state.write();
        state.order.hide(ids, exclusive);
        state.recompute_all_display_data();
    }

    // --- Tracks ---

    /// Adds several tracks at once, in order.
    pub fn add_tracks(&self, specs: Vec<TrackSpec>) -> Result<()> {
        let mut state = self.state.write();
        for spec in specs {
            state.add_track(spec)?;
        }
        Ok(())
    }

    /// Adds one track. Fails when the id is already taken.
    pub fn add_track(&self, spec: TrackSpec) -> Result<()> {
        self.state.write().add_track(spec)
    }

    /// Replaces a track's raw data, rebuilding its join lookup and display
    /// view. When the data carries more records than the canonical order
    /// has entries, the global order is rebuilt from this track's join
    /// keys. No-op for an unknown track.
    pub fn set_track_data(&self, track_id: TrackId, data: Vec<Record>) {
        self.state.write().set_track_data(track_id, data);
    }

    /// Changes the record field used to join records to identifiers, then
    /// rebuilds the track's derived views. No-op for an unknown track.
    pub fn set_track_data_id_key(&self, track_id: TrackId, key: impl Into<String>) {
        self.state.write().set_track_data_id_key(track_id, key.into());
    }

    /// Removes a track and its group membership atomically. No-op for an
    /// unknown track; an emptied group stays in place.
    pub fn remove_track(&self, track_id: TrackId) {
        let mut state = self.state.write();
        if !state.tracks.remove(track_id) {
            tracing::debug!(%track_id, "remove_track on unknown track; ignoring");
        }
        state.groups.remove_track(track_id);
    }

    /// Track ids in visiting order: groups in order, tracks within each
    /// group in order.
    pub fn tracks(&self) -> Vec<TrackId> {
        self.state.read().groups.track_ids()
    }

    pub fn track_label(&self, track_id: TrackId) -> Option<String> {
        self.state.read().tracks.get(track_id).map(|t| t.label.clone())
    }

    pub fn track_height(&self, track_id: TrackId) -> Option<f64> {
        self.state.read().tracks.get(track_id).map(|t| t.height)
    }

    pub fn track_padding(&self, track_id: TrackId) -> Option<f64> {
        self.state.read().tracks.get(track_id).map(|t| t.padding)
    }

    pub fn track_data_id_key(&self, track_id: TrackId) -> Option<String> {
        self.state
            .read()
            .tracks
            .get(track_id)
            .map(|t| t.data_id_key.clone())
    }

    /// The tooltip formatter, for the renderer to invoke with a record.
    pub fn track_tooltip(&self, track_id: TrackId) -> Option<TooltipFn> {
        self.state
            .read()
            .tracks
            .get(track_id)
            .map(|t| Arc::clone(&t.tooltip))
    }

    pub fn is_track_removable(&self, track_id: TrackId) -> Option<bool> {
        self.state.read().tracks.get(track_id).map(|t| t.removable)
    }

    pub fn is_track_sort_direction_changeable(&self, track_id: TrackId) -> Option<bool> {
        self.state
            .read()
            .tracks
            .get(track_id)
            .map(|t| t.sort_direction_changeable)
    }

    /// The opaque rule set, forwarded to the renderer unchanged.
    pub fn rule_set(&self, track_id: TrackId) -> Option<RuleSet> {
        self.state
            .read()
            .tracks
            .get(track_id)
            .and_then(|t| t.rule_set.clone())
    }

    /// Replaces a track's rule set. No-op for an unknown track.
    pub fn set_rule_set(&self, track_id: TrackId, rule_set: RuleSet) {
        let mut state = self.state.write();
        match state.tracks.get_mut(track_id) {
            Some(track) => track.rule_set = Some(rule_set),
            None => tracing::debug!(%track_id, "set_rule_set on unknown track; ignoring"),
        }
    }

    /// Snapshot of a track's display data: its raw records restricted to
    /// visible identifiers, in canonical order. Empty for an unknown track.
    pub fn track_display_data(&self, track_id: TrackId) -> Vec<Arc<Record>> {
        self.state
            .read()
            .tracks
            .get(track_id)
            .map(|t| t.display_data.clone())
            .unwrap_or_default()
    }

    // --- Groups ---

    /// Snapshot of the group layout.
    pub fn track_groups(&self) -> Vec<Vec<TrackId>> {
        self.state.read().groups.groups().to_vec()
    }

    /// Snapshot of the group containing the track, or `None`.
    pub fn containing_track_group(&self, track_id: TrackId) -> Option<Vec<TrackId>> {
        self.state.read().groups.containing_group(track_id)
    }

    /// Moves a group with insert-before semantics (see
    /// [`TrackSpec::in_group`] for how groups come to exist). Returns the
    /// new layout.
    pub fn move_track_group(&self, from: usize, to: usize) -> Result<Vec<Vec<TrackId>>> {
        let mut state = self.state.write();
        state.groups.move_group(from, to)?;
        Ok(state.groups.groups().to_vec())
    }

    /// Repositions a track inside its group. No-op for an unknown track.
    pub fn move_track(&self, track_id: TrackId, new_position: usize) {
        self.state
            .write()
            .groups
            .move_track_within_group(track_id, new_position);
    }

    // --- Sorting ---

    /// Sets the group-visit order for the multi-key sort and re-sorts
    /// immediately.
    pub fn set_group_sort_priority(&self, priority: Vec<usize>) {
        let mut state = self.state.write();
        state.groups.set_sort_priority(priority);
        state.sort();
    }

    /// Re-sorts the canonical order under the current sort priority. Stable:
    /// identifiers no comparator tells apart keep their relative order.
    pub fn sort(&self) {
        self.state.write().sort();
    }
}

impl Default for OncoprintModel {
    fn default() -> Self {
        Self::new()
    }
}

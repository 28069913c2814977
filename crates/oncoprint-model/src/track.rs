//! Per-track configuration, raw data, and derived views.
//!
//! Every attribute of a track lives in a single [`Track`] record held in one
//! map keyed by [`TrackId`], so tracks are created and destroyed atomically
//! and per-track state cannot drift across parallel maps. The raw records
//! are JSON objects shared behind `Arc`, so the raw store, the id-to-record
//! lookup, and the display view all point at the same allocations.

use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::identifier::{Identifier, IdentifierOrder};

/// A raw data record attached to a track.
///
/// Records are JSON objects; the track's data-id key names the field that
/// joins a record to an identifier.
pub type Record = Value;

/// Formats a record into tooltip text. The model only stores and forwards
/// this; it never interprets the output.
pub type TooltipFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// Orders two records for the multi-key sort.
///
/// An identifier can lack a record in a given track, so comparators receive
/// `Option`s and must tolerate `None` on either side.
pub type SortCmpFn = Arc<dyn Fn(Option<&Record>, Option<&Record>) -> Ordering + Send + Sync>;

/// Opaque rendering payload mapping data values to colors and shapes.
/// Stored and handed back untouched.
pub type RuleSet = Arc<dyn Any + Send + Sync>;

/// Caller-supplied handle naming a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u32);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrackId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

const DEFAULT_LABEL: &str = "Label";
const DEFAULT_HEIGHT: f64 = 20.0;
const DEFAULT_PADDING: f64 = 5.0;
const DEFAULT_DATA_ID_KEY: &str = "id";

fn default_tooltip() -> TooltipFn {
    Arc::new(|record| record.to_string())
}

fn default_sort_cmp() -> SortCmpFn {
    Arc::new(|_, _| Ordering::Equal)
}

/// Configuration for a single track.
///
/// Only the track id is required; every other field has a default. Built in
/// the builder style:
///
/// ```
/// use oncoprint_model::{TrackSpec, TrackId};
/// use serde_json::json;
///
/// let spec = TrackSpec::new(TrackId(4))
///     .with_label("Mutations")
///     .with_height(24.0)
///     .in_group(1)
///     .with_data(vec![json!({"id": "S1", "vaf": 0.4})]);
/// ```
#[derive(Clone)]
pub struct TrackSpec {
    pub(crate) track_id: TrackId,
    pub(crate) target_group: usize,
    pub(crate) label: String,
    pub(crate) height: f64,
    pub(crate) padding: f64,
    pub(crate) data_id_key: String,
    pub(crate) tooltip: TooltipFn,
    pub(crate) removable: bool,
    pub(crate) sort_cmp: SortCmpFn,
    pub(crate) sort_direction_changeable: bool,
    pub(crate) data: Vec<Record>,
    pub(crate) rule_set: Option<RuleSet>,
}

impl TrackSpec {
    /// Creates a spec with every field at its default.
    pub fn new(track_id: TrackId) -> Self {
        Self {
            track_id,
            target_group: 0,
            label: DEFAULT_LABEL.to_string(),
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
            data_id_key: DEFAULT_DATA_ID_KEY.to_string(),
            tooltip: default_tooltip(),
            removable: false,
            sort_cmp: default_sort_cmp(),
            sort_direction_changeable: false,
            data: Vec::new(),
            rule_set: None,
        }
    }

    /// Target group index; missing groups are created on insertion.
    pub fn in_group(mut self, group: usize) -> Self {
        self.target_group = group;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Track height in pixels.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Vertical padding in pixels, applied above and below the track.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Name of the record field that joins a record to an identifier.
    pub fn with_data_id_key(mut self, key: impl Into<String>) -> Self {
        self.data_id_key = key.into();
        self
    }

    pub fn with_tooltip<F>(mut self, tooltip: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        self.tooltip = Arc::new(tooltip);
        self
    }

    pub fn removable(mut self, removable: bool) -> Self {
        self.removable = removable;
        self
    }

    /// Comparator consulted when this track participates in the multi-key
    /// sort. Defaults to always-equal, which makes the track sort-neutral.
    pub fn with_sort_cmp<F>(mut self, cmp: F) -> Self
    where
        F: Fn(Option<&Record>, Option<&Record>) -> Ordering + Send + Sync + 'static,
    {
        self.sort_cmp = Arc::new(cmp);
        self
    }

    pub fn sort_direction_changeable(mut self, changeable: bool) -> Self {
        self.sort_direction_changeable = changeable;
        self
    }

    /// Initial raw data. Routed through the model's data-assignment path on
    /// insertion, so it can derive the global identifier order the same way
    /// a later `set_track_data` would.
    pub fn with_data(mut self, data: Vec<Record>) -> Self {
        self.data = data;
        self
    }

    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set = Some(rule_set);
        self
    }
}

/// The stored form of a track: configuration plus raw data plus the two
/// derived views (id-to-record lookup and display data).
pub(crate) struct Track {
    pub label: String,
    pub height: f64,
    pub padding: f64,
    pub data_id_key: String,
    pub tooltip: TooltipFn,
    pub removable: bool,
    pub sort_cmp: SortCmpFn,
    pub sort_direction_changeable: bool,
    pub rule_set: Option<RuleSet>,
    /// Raw records, in assignment order.
    pub data: Vec<Arc<Record>>,
    /// Join-key value -> record, rebuilt whenever data or the key changes.
    pub id_to_record: HashMap<Identifier, Arc<Record>>,
    /// Raw records restricted to visible identifiers, in canonical order.
    pub display_data: Vec<Arc<Record>>,
}

impl Track {
    /// Splits a spec into the stored track, its initial data, and its
    /// target group. Data is returned separately so the model can feed it
    /// through the regular data-assignment path.
    pub fn from_spec(spec: TrackSpec) -> (Self, Vec<Record>, usize) {
        let TrackSpec {
            track_id: _,
            target_group,
            label,
            height,
            padding,
            data_id_key,
            tooltip,
            removable,
            sort_cmp,
            sort_direction_changeable,
            data,
            rule_set,
        } = spec;
        let track = Self {
            label,
            height,
            padding,
            data_id_key,
            tooltip,
            removable,
            sort_cmp,
            sort_direction_changeable,
            rule_set,
            data: Vec::new(),
            id_to_record: HashMap::new(),
            display_data: Vec::new(),
        };
        (track, data, target_group)
    }

    /// Rebuilds the join-key lookup from the raw data. Records without a
    /// usable join key are left out.
    pub fn rebuild_id_lookup(&mut self) {
        self.id_to_record.clear();
        for record in &self.data {
            match record
                .get(&self.data_id_key)
                .and_then(Identifier::from_join_value)
            {
                Some(id) => {
                    self.id_to_record.insert(id, Arc::clone(record));
                }
                None => {
                    tracing::warn!(
                        key = %self.data_id_key,
                        "record has no usable join key; excluded from lookup"
                    );
                }
            }
        }
    }

    /// Join-key values of the raw records, in record order, skipping
    /// records without a usable key.
    pub fn join_keys(&self) -> Vec<Identifier> {
        self.data
            .iter()
            .filter_map(|record| {
                record
                    .get(&self.data_id_key)
                    .and_then(Identifier::from_join_value)
            })
            .collect()
    }

    /// Recomputes the display view: raw records whose identifier is in the
    /// visible order, sorted ascending by canonical position.
    pub fn compute_display_data(&mut self, order: &IdentifierOrder) {
        let mut keyed: Vec<(usize, Arc<Record>)> = self
            .data
            .iter()
            .filter_map(|record| {
                let id = record
                    .get(&self.data_id_key)
                    .and_then(Identifier::from_join_value)?;
                if order.is_hidden(&id) {
                    return None;
                }
                let position = order.position(&id)?;
                Some((position, Arc::clone(record)))
            })
            .collect();
        keyed.sort_by_key(|(position, _)| *position);
        self.display_data = keyed.into_iter().map(|(_, record)| record).collect();
    }
}

/// All tracks, keyed by id. Accessors are permissive: unknown ids yield
/// `None` rather than an error.
#[derive(Default)]
pub(crate) struct TrackStore {
    tracks: HashMap<TrackId, Track>,
}

impl TrackStore {
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&id)
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.contains_key(&id)
    }

    pub fn insert(&mut self, id: TrackId, track: Track) {
        self.tracks.insert(id, track);
    }

    /// Removes the whole track record at once. Returns whether it existed.
    pub fn remove(&mut self, id: TrackId) -> bool {
        self.tracks.remove(&id).is_some()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_defaults() {
        let spec = TrackSpec::new(TrackId(1));
        assert_eq!(spec.label, "Label");
        assert_eq!(spec.height, 20.0);
        assert_eq!(spec.padding, 5.0);
        assert_eq!(spec.data_id_key, "id");
        assert_eq!(spec.target_group, 0);
        assert!(!spec.removable);
        assert!(!spec.sort_direction_changeable);
        assert!(spec.data.is_empty());
        assert!(spec.rule_set.is_none());
        // Default comparator is sort-neutral.
        assert_eq!((spec.sort_cmp)(None, None), Ordering::Equal);
    }

    #[test]
    fn test_default_tooltip_stringifies_record() {
        let spec = TrackSpec::new(TrackId(1));
        let text = (spec.tooltip)(&json!({"id": "S1"}));
        assert_eq!(text, r#"{"id":"S1"}"#);
    }

    #[test]
    fn test_rebuild_id_lookup_skips_unusable_keys() {
        let (mut track, _, _) = Track::from_spec(TrackSpec::new(TrackId(1)));
        track.data = vec![
            Arc::new(json!({"id": "S1", "v": 1})),
            Arc::new(json!({"v": 2})),
            Arc::new(json!({"id": null, "v": 3})),
            Arc::new(json!({"id": 7, "v": 4})),
        ];
        track.rebuild_id_lookup();

        assert_eq!(track.id_to_record.len(), 2);
        assert!(track.id_to_record.contains_key(&"S1".into()));
        assert!(track.id_to_record.contains_key(&"7".into()));
        assert_eq!(track.join_keys(), vec!["S1".into(), "7".into()]);
    }

    #[test]
    fn test_compute_display_data_filters_and_orders() {
        let mut order = IdentifierOrder::new();
        order
            .set_order(vec!["A".into(), "B".into(), "C".into()])
            .unwrap();
        order.hide(&["B".into()], false);

        let (mut track, _, _) = Track::from_spec(TrackSpec::new(TrackId(1)));
        track.data = vec![
            Arc::new(json!({"id": "C"})),
            Arc::new(json!({"id": "B"})),
            Arc::new(json!({"id": "A"})),
            Arc::new(json!({"id": "Z"})), // not in the order at all
        ];
        track.rebuild_id_lookup();
        track.compute_display_data(&order);

        let shown: Vec<_> = track
            .display_data
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(shown, vec!["A", "C"]);
    }
}

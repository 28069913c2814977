//! End-to-end scenarios exercising ordering, visibility, grouping, and
//! sorting together through the public API.

use oncoprint_model::{Identifier, OncoprintModel, TrackId, TrackSpec};
use serde_json::json;

fn ids(names: &[&str]) -> Vec<Identifier> {
    names.iter().map(|&n| Identifier::from(n)).collect()
}

#[test]
fn order_roundtrips_and_partitions_under_hiding() {
    let model = OncoprintModel::new();
    model.set_id_order(ids(&["A", "B", "C", "D", "E"])).unwrap();
    model.hide_ids(&ids(&["D", "B"]), false);

    let all = model.id_order(true);
    let visible = model.id_order(false);
    let hidden = model.hidden_ids();

    assert_eq!(all, ids(&["A", "B", "C", "D", "E"]));
    assert_eq!(visible, ids(&["A", "C", "E"]));
    assert_eq!(hidden, ids(&["B", "D"]));

    // Visible and hidden partition the canonical order: together they hold
    // every id exactly once, each in canonical relative order.
    let mut merged = Vec::new();
    let (mut v, mut h) = (visible.iter().peekable(), hidden.iter().peekable());
    for id in &all {
        if v.peek() == Some(&id) {
            merged.push(v.next().unwrap().clone());
        } else if h.peek() == Some(&id) {
            merged.push(h.next().unwrap().clone());
        }
    }
    assert_eq!(merged, all);
}

#[test]
fn display_data_stays_consistent_through_mutations() {
    let model = OncoprintModel::new();
    model
        .add_tracks(vec![
            TrackSpec::new(TrackId(1)).with_data(vec![
                json!({"id": "A", "v": 1}),
                json!({"id": "B", "v": 2}),
                json!({"id": "C", "v": 3}),
            ]),
            TrackSpec::new(TrackId(2)).with_data(vec![
                json!({"id": "C", "w": 30}),
                json!({"id": "A", "w": 10}),
            ]),
        ])
        .unwrap();

    // Track 1 derived the order A, B, C; track 2 has fewer records than the
    // order has entries, so it left the order alone.
    assert_eq!(model.id_order(true), ids(&["A", "B", "C"]));

    let shown = |track: TrackId| -> Vec<String> {
        model
            .track_display_data(track)
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    };

    // Display data follows canonical order regardless of record order.
    assert_eq!(shown(TrackId(2)), vec!["A", "C"]);

    model.set_id_order(ids(&["C", "B", "A"])).unwrap();
    assert_eq!(shown(TrackId(1)), vec!["C", "B", "A"]);
    assert_eq!(shown(TrackId(2)), vec!["C", "A"]);

    model.hide_ids(&ids(&["C"]), false);
    assert_eq!(shown(TrackId(1)), vec!["B", "A"]);
    assert_eq!(shown(TrackId(2)), vec!["A"]);

    // Every displayed record's join key is in the visible order.
    let visible = model.id_order(false);
    for track in [TrackId(1), TrackId(2)] {
        for record in model.track_display_data(track) {
            let id = Identifier::from(record["id"].as_str().unwrap());
            assert!(visible.contains(&id));
        }
    }
}

#[test]
fn longer_track_data_redefines_global_order() {
    let model = OncoprintModel::new();
    model.set_id_order(ids(&["X", "Y", "Z"])).unwrap();

    model
        .add_track(
            TrackSpec::new(TrackId(7))
                .with_data_id_key("sampleId")
                .with_data(vec![
                    json!({"sampleId": "S1"}),
                    json!({"sampleId": "S2"}),
                    json!({"sampleId": "S3"}),
                    json!({"sampleId": "S4"}),
                    json!({"sampleId": "S5"}),
                ]),
        )
        .unwrap();

    assert_eq!(model.id_order(true), ids(&["S1", "S2", "S3", "S4", "S5"]));
}

#[test]
fn multi_group_sort_and_reordering() {
    let model = OncoprintModel::new();
    let by_field = |field: &'static str| {
        move |a: Option<&oncoprint_model::Record>, b: Option<&oncoprint_model::Record>| {
            let value = |r: Option<&oncoprint_model::Record>| {
                r.and_then(|r| r[field].as_i64()).unwrap_or(i64::MAX)
            };
            value(a).cmp(&value(b))
        }
    };

    model
        .add_tracks(vec![
            TrackSpec::new(TrackId(1)).with_sort_cmp(by_field("v")).with_data(vec![
                json!({"id": "A", "v": 3}),
                json!({"id": "B", "v": 1}),
                json!({"id": "C", "v": 2}),
            ]),
            TrackSpec::new(TrackId(2))
                .in_group(1)
                .with_sort_cmp(by_field("w"))
                .with_data(vec![
                    json!({"id": "A", "w": 1}),
                    json!({"id": "B", "w": 2}),
                    json!({"id": "C", "w": 3}),
                ]),
        ])
        .unwrap();

    model.set_group_sort_priority(vec![0]);
    assert_eq!(model.id_order(true), ids(&["B", "C", "A"]));

    model.set_group_sort_priority(vec![1]);
    assert_eq!(model.id_order(true), ids(&["A", "B", "C"]));

    // Moving groups does not change identifier order, only track layout.
    let layout = model.move_track_group(1, 0).unwrap();
    assert_eq!(layout, vec![vec![TrackId(2)], vec![TrackId(1)]]);
    assert_eq!(model.id_order(true), ids(&["A", "B", "C"]));

    // Sort priority indices refer to group positions, which just changed:
    // group 0 is now the "w" track.
    model.set_group_sort_priority(vec![0]);
    assert_eq!(model.id_order(true), ids(&["A", "B", "C"]));
}

#[test]
fn move_group_round_trip_restores_layout() {
    let model = OncoprintModel::new();
    model
        .add_tracks(vec![
            TrackSpec::new(TrackId(1)),
            TrackSpec::new(TrackId(2)).in_group(1),
            TrackSpec::new(TrackId(3)).in_group(2),
        ])
        .unwrap();

    let original = model.track_groups();
    model.move_track_group(0, 2).unwrap();
    assert_eq!(
        model.track_groups(),
        vec![vec![TrackId(2)], vec![TrackId(1)], vec![TrackId(3)]]
    );
    model.move_track_group(1, 0).unwrap();
    assert_eq!(model.track_groups(), original);
}

#[test]
fn track_reordering_within_group_affects_sort_tie_break() {
    let model = OncoprintModel::new();
    let by_field = |field: &'static str| {
        move |a: Option<&oncoprint_model::Record>, b: Option<&oncoprint_model::Record>| {
            let value = |r: Option<&oncoprint_model::Record>| {
                r.and_then(|r| r[field].as_i64()).unwrap_or(i64::MAX)
            };
            value(a).cmp(&value(b))
        }
    };

    // Both tracks in one group; track 1 ties everything, track 2 orders.
    model
        .add_tracks(vec![
            TrackSpec::new(TrackId(1)).with_sort_cmp(by_field("v")).with_data(vec![
                json!({"id": "A", "v": 1}),
                json!({"id": "B", "v": 1}),
            ]),
            TrackSpec::new(TrackId(2)).with_sort_cmp(by_field("w")).with_data(vec![
                json!({"id": "A", "w": 2}),
                json!({"id": "B", "w": 1}),
            ]),
        ])
        .unwrap();

    model.set_group_sort_priority(vec![0]);
    assert_eq!(model.id_order(true), ids(&["B", "A"]));

    // Intra-group order feeds the comparator list, but here track 1 is
    // sort-neutral either way, so the result is unchanged after moving
    // track 2 to the front.
    model.move_track(TrackId(2), 0);
    assert_eq!(model.tracks(), vec![TrackId(2), TrackId(1)]);
    model.sort();
    assert_eq!(model.id_order(true), ids(&["B", "A"]));
}

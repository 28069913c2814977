//! State and model layer for interactive oncoprint grid visualizations.
//!
//! An oncoprint shows per-identifier data (samples, patients, ...) across
//! multiple grouped, orderable tracks. This crate owns the authoritative
//! model behind such a grid: identifier ordering and indexing, per-track
//! configuration and raw data, grouping and visibility, and the multi-key
//! sort engine. It derives the filtered, ordered "display data" that a
//! renderer consumes; drawing, event wiring, and tooltip content are the
//! renderer's business.
//!
//! # Core Types
//!
//! - [`OncoprintModel`]: the facade holding all state, shareable behind
//!   `Arc` between a render loop and an interaction layer
//! - [`Identifier`]: the row key the grid is organized around
//! - [`TrackSpec`] / [`TrackId`]: per-track configuration and its handle
//! - [`Record`]: a raw data record (a JSON object) attached to a track
//!
//! # Example
//!
//! ```
//! use oncoprint_model::{OncoprintModel, TrackId, TrackSpec};
//! use serde_json::json;
//!
//! let model = OncoprintModel::new();
//! model
//!     .add_track(
//!         TrackSpec::new(TrackId(0))
//!             .with_label("Mutation count")
//!             .with_sort_cmp(|a, b| {
//!                 let count = |r: Option<&oncoprint_model::Record>| {
//!                     r.and_then(|r| r["count"].as_i64()).unwrap_or(0)
//!                 };
//!                 count(a).cmp(&count(b))
//!             })
//!             .with_data(vec![
//!                 json!({"id": "S1", "count": 12}),
//!                 json!({"id": "S2", "count": 3}),
//!             ]),
//!     )
//!     .unwrap();
//!
//! model.set_group_sort_priority(vec![0]);
//! assert_eq!(model.id_order(true)[0].as_str(), "S2");
//! ```
//!
//! # Consistency
//!
//! Every mutating call leaves all derived state (position index, visible
//! order, per-track display data) consistent before it returns; there is no
//! observable "pending recompute" state. Queries return owned snapshots, so
//! callers never alias the model's internals.

mod error;
mod group;
mod identifier;
mod model;
mod sort;
mod track;

pub use error::{Error, Result};
pub use identifier::Identifier;
pub use model::{ModelOptions, OncoprintModel};
pub use track::{Record, RuleSet, SortCmpFn, TooltipFn, TrackId, TrackSpec};

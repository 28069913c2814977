//! Identifiers and the canonical identifier order.
//!
//! An oncoprint is organized around a single ordered sequence of row keys
//! (samples, patients, ...). [`IdentifierOrder`] owns that sequence together
//! with its derived state: the position index, the hidden set, and the
//! visible subsequence. The derived parts are always recomputed together
//! with the canonical order, so callers never observe them stale.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};

/// An opaque, comparable row key.
///
/// Identifiers are cheap to clone (the text is shared behind an `Arc`) and
/// can be built from string literals via `From`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Arc<str>);

impl Identifier {
    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts an identifier from a record's join-key value.
    ///
    /// Strings pass through unchanged; numbers are stringified so that a
    /// numeric `"id"` field and the string identifier `"7"` join up. Other
    /// JSON types cannot name a row and yield `None`.
    pub(crate) fn from_join_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(Arc::from(s.as_str()))),
            Value::Number(n) => Some(Self(Arc::from(n.to_string().as_str()))),
            _ => None,
        }
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(Arc::from(s.as_str()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The canonical ordered sequence of identifiers plus its derived state.
///
/// The canonical order is only ever replaced wholesale, never partially
/// mutated. Every replacement rebuilds the position index and the visible
/// subsequence in the same call.
#[derive(Default)]
pub(crate) struct IdentifierOrder {
    /// Canonical order. Contains no duplicates.
    order: Vec<Identifier>,
    /// Identifier -> position in `order`.
    index: HashMap<Identifier, usize>,
    hidden: HashSet<Identifier>,
    /// `order` with hidden identifiers filtered out, relative order kept.
    visible: Vec<Identifier>,
}

impl IdentifierOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the canonical order.
    ///
    /// Fails with [`Error::DuplicateIdentifier`] without touching any state
    /// when `ids` contains a repeat; a duplicate would make the position
    /// index ambiguous.
    pub fn set_order(&mut self, ids: Vec<Identifier>) -> Result<()> {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id.clone()) {
                return Err(Error::duplicate_identifier(id.clone()));
            }
        }
        self.set_order_unchecked(ids);
        Ok(())
    }

    /// Replaces the canonical order without the uniqueness check.
    ///
    /// Callers must pass a duplicate-free sequence, e.g. a permutation of
    /// the current order.
    pub fn set_order_unchecked(&mut self, ids: Vec<Identifier>) {
        self.order = ids;
        self.rebuild_index();
        self.rebuild_visible();
    }

    /// The canonical order, or the visible subsequence.
    pub fn ids(&self, include_hidden: bool) -> &[Identifier] {
        if include_hidden {
            &self.order
        } else {
            &self.visible
        }
    }

    /// Hidden identifiers, in canonical order.
    pub fn hidden_ids(&self) -> Vec<Identifier> {
        self.order
            .iter()
            .filter(|id| self.hidden.contains(id))
            .cloned()
            .collect()
    }

    /// Marks identifiers as hidden.
    ///
    /// With `exclusive`, the hidden set is cleared first, so exactly the
    /// given identifiers end up hidden and everything else shows.
    pub fn hide(&mut self, ids: &[Identifier], exclusive: bool) {
        if exclusive {
            self.hidden.clear();
        }
        for id in ids {
            self.hidden.insert(id.clone());
        }
        self.rebuild_visible();
    }

    pub fn position(&self, id: &Identifier) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn is_hidden(&self, id: &Identifier) -> bool {
        self.hidden.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (position, id) in self.order.iter().enumerate() {
            self.index.insert(id.clone(), position);
        }
    }

    fn rebuild_visible(&mut self) {
        self.visible = self
            .order
            .iter()
            .filter(|id| !self.hidden.contains(id))
            .cloned()
            .collect();
    }
}

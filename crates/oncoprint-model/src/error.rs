//! Error types for the oncoprint model.

use crate::identifier::Identifier;
use crate::track::TrackId;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mutating the model.
///
/// The model is deliberately permissive elsewhere: unknown track ids return
/// `None` or an empty result from accessors, mutators on unknown tracks are
/// no-ops, and out-of-range zoom values are ignored. Only mutations that
/// would corrupt derived state surface an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The same identifier appeared more than once in a new canonical order.
    #[error("duplicate identifier '{id}' in identifier order")]
    DuplicateIdentifier { id: Identifier },

    /// A track group index referred past the end of the group list.
    #[error("track group index {index} out of range ({len} groups)")]
    GroupIndexOutOfRange { index: usize, len: usize },

    /// A track was added with an id that is already in use.
    #[error("track {id} already exists")]
    DuplicateTrack { id: TrackId },
}

impl Error {
    /// Create a duplicate-identifier error.
    pub fn duplicate_identifier(id: impl Into<Identifier>) -> Self {
        Self::DuplicateIdentifier { id: id.into() }
    }

    /// Create a group-index error.
    pub fn group_index_out_of_range(index: usize, len: usize) -> Self {
        Self::GroupIndexOutOfRange { index, len }
    }

    /// Create a duplicate-track error.
    pub fn duplicate_track(id: TrackId) -> Self {
        Self::DuplicateTrack { id }
    }
}

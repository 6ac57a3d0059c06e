//! Error types
//!
//! Every error in this crate reports a broken invariant: the caller used the API
//! in a way it does not allow. None of them are meant to be retried. Operations
//! check their preconditions before touching the medium or the Range tree, so an
//! `Err` leaves both exactly as they were.

use thiserror::Error;

use crate::output::{RangeId, RangeState};

/// Violations of the Range tree structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// `commit` was called on the root Range.
    #[error("cannot commit the root range")]
    CommitRoot,

    /// `clear` was called on the root Range.
    #[error("cannot clear the root range")]
    ClearRoot,

    /// `clear` was called on a Range that was already cleared.
    #[error("range {0} was already cleared")]
    AlreadyCleared(RangeId),

    /// Content was written to a Range that is no longer open.
    #[error("range {0} is {1:?} and no longer accepts content")]
    NotOpen(RangeId, RangeState),

    /// The handle does not name a live Range in this tree.
    #[error("range {0} does not belong to this output")]
    UnknownRange(RangeId),

    /// Content or a child Range was added to a content unit.
    #[error("range {0} is a content unit and cannot hold children")]
    NotASpan(RangeId),

    /// A cursor addressed a span instead of a content unit.
    #[error("range {0} is a span, not a content unit")]
    NotAUnit(RangeId),

    /// A gap no longer points between existing children of its parent.
    #[error("gap at index {index} is outside the {len} children of range {parent}")]
    InvalidGap {
        parent: RangeId,
        index: usize,
        len: usize,
    },

    /// A span's size disagrees with the sizes of its children.
    #[error("range {range} has size {size} but its children cover {covered}")]
    SizeMismatch {
        range: RangeId,
        size: usize,
        covered: usize,
    },

    /// A child does not start where the siblings before it end.
    #[error("range {range} starts at {start} but its earlier siblings end at {expected}")]
    OffsetMismatch {
        range: RangeId,
        start: usize,
        expected: usize,
    },
}

/// Violations of the parameter binding and caching contracts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Freshness was queried before the computation ever ran.
    #[error("freshness queried before the computation ran")]
    NotComputed,

    /// A dynamic key has no value in the state dictionary.
    #[error("no value bound for key `{0}`")]
    MissingKey(String),

    /// The state dictionary has a key the parameters never declared.
    #[error("key `{0}` is not a dynamic parameter")]
    UnexpectedKey(String),

    /// The value bound to a key has a different type than the parameter expects.
    #[error("key `{key}` is not bound to a `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },
}

/// Errors reported by an output medium adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediumError {
    #[error("index {index} is out of bounds for a medium of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// The adapter found that the span it was asked to touch does not line up with
    /// its own content.
    #[error("span {start}..{end} does not match a medium of length {len}")]
    SpanMismatch { start: usize, end: usize, len: usize },
}

/// Any failure during compilation, evaluation or polling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Medium(#[from] MediumError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = RenderError> = std::result::Result<T, E>;

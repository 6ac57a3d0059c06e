//! The medium contract.

use std::fmt::Debug;
use std::ops::Range;

use crate::error::MediumError;

/// An insertion-ordered medium the core can write into.
///
/// The core addresses content by absolute position: the Range tree computes
/// where a unit lives and the medium only ever sees flat indices. An adapter
/// for a nested medium (a node tree, an attribute set) maps those indices onto
/// its own structure.
///
/// Every method checks its arguments before mutating; an `Err` must leave the
/// medium unchanged.
pub trait Medium: 'static {
    /// One unit of content.
    type Atom: Clone + PartialEq + Debug + 'static;

    /// Insert `atom` so that it ends up at `index`.
    fn insert(&mut self, index: usize, atom: Self::Atom) -> Result<(), MediumError>;

    /// Overwrite the unit at `index`.
    fn replace(&mut self, index: usize, atom: Self::Atom) -> Result<(), MediumError>;

    /// Remove the units in `span`.
    fn remove(&mut self, span: Range<usize>) -> Result<(), MediumError>;

    /// The unit inserted to anchor a region that would otherwise be empty.
    fn marker(&self) -> Self::Atom;

    /// Number of units currently in the medium.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

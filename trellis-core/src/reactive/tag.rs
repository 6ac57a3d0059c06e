//! Tags
//!
//! A Tag is the read-set of a computation: every mutable cell it touched while it
//! ran. Paired with the revision sampled before the run, it answers "could the
//! result be different now?" without re-running anything.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use super::id::CellId;
use super::revision::Revision;

/// A mutable cell whose reads can be tracked.
pub trait Tracked {
    /// The cell's unique ID.
    fn id(&self) -> CellId;

    /// The revision of the cell's last write.
    fn revision(&self) -> Revision;
}

/// The set of cells read by a computation.
///
/// An empty tag is const: the computation can never become stale.
#[derive(Clone, Default)]
pub struct Tag {
    reads: SmallVec<[Rc<dyn Tracked>; 4]>,
}

impl Tag {
    /// A tag with no reads.
    pub fn constant() -> Self {
        Self::default()
    }

    /// Record a read. Reading the same cell twice records it once.
    pub(crate) fn record(&mut self, source: Rc<dyn Tracked>) {
        let id = source.id();
        if !self.reads.iter().any(|read| read.id() == id) {
            self.reads.push(source);
        }
    }

    /// Union of two read-sets.
    pub fn combine(&self, other: &Tag) -> Tag {
        let mut combined = self.clone();
        combined.absorb(other);
        combined
    }

    pub(crate) fn absorb(&mut self, other: &Tag) {
        for source in &other.reads {
            self.record(Rc::clone(source));
        }
    }

    /// True if no mutable cell was read.
    pub fn is_const(&self) -> bool {
        self.reads.is_empty()
    }

    /// True if any cell in the read-set was written after `snapshot`.
    pub fn changed_since(&self, snapshot: Revision) -> bool {
        self.reads.iter().any(|read| read.revision() > snapshot)
    }

    /// The newest write revision among the read cells.
    pub fn latest(&self) -> Option<Revision> {
        self.reads.iter().map(|read| read.revision()).max()
    }

    /// IDs of the read cells, in first-read order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.reads.iter().map(|read| read.id())
    }

    /// Number of distinct cells read.
    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cells()).finish()
    }
}

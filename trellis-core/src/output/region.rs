//! Appending views over one Range.

use crate::error::Result;
use crate::poll::Updater;

use super::medium::Medium;
use super::output::Output;
use super::range::{Cursor, Gap, RangeId};

/// Where an evaluation writes: the Output, the Range it appends into, and the
/// list that collects the updaters it registers.
///
/// A region is only a view. Nesting a region does not create anything in the
/// Range tree; [`Region::child`] does.
pub struct Region<'a, M: Medium> {
    output: &'a mut Output<M>,
    range: RangeId,
    updaters: &'a mut Vec<Updater<M>>,
}

impl<'a, M: Medium> Region<'a, M> {
    pub fn new(
        output: &'a mut Output<M>,
        range: RangeId,
        updaters: &'a mut Vec<Updater<M>>,
    ) -> Self {
        Self {
            output,
            range,
            updaters,
        }
    }

    /// The Range this region appends into.
    pub fn range(&self) -> RangeId {
        self.range
    }

    pub fn output(&mut self) -> &mut Output<M> {
        &mut *self.output
    }

    /// The gap at the current end of this region.
    pub fn cursor(&self) -> Result<Gap> {
        self.output.cursor(self.range)
    }

    pub fn append(&mut self, atom: M::Atom) -> Result<Cursor> {
        self.output.append(self.range, atom)
    }

    /// Keep `updater` alive for later poll cycles.
    pub fn register(&mut self, updater: Updater<M>) {
        self.updaters.push(updater);
    }

    /// Open a child Range at the end of this region.
    pub fn child(&mut self) -> Result<RangeId> {
        self.output.begin(self.range)
    }

    /// A region over `range` sharing this region's Output and updater list.
    pub fn nested(&mut self, range: RangeId) -> Region<'_, M> {
        Region {
            output: &mut *self.output,
            range,
            updaters: &mut *self.updaters,
        }
    }

    /// Close this region's Range and return its parent.
    pub fn commit(self) -> Result<RangeId> {
        self.output.commit(self.range)
    }

    /// Anchor this region if it is empty, then close it.
    pub fn finalize(self) -> Result<RangeId> {
        self.output.finalize(self.range)
    }
}

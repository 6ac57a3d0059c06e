//! The updater behind a single reactive atom.

use crate::error::Result;
use crate::output::{Cursor, Medium, Output, RangeId};
use crate::reactive::Var;

use super::updater::{Poll, Update, Updater};

/// Keeps one unit of the medium equal to a Var.
///
/// Each poll reads the Var. The unit is replaced through the cursor captured at
/// append time only when the value differs from the one last written.
pub struct AtomUpdater<M: Medium> {
    var: Var<M::Atom>,
    cursor: Cursor,
    current: M::Atom,
}

impl<M: Medium> AtomUpdater<M> {
    /// `current` is the value that was written at `cursor`.
    pub fn new(var: Var<M::Atom>, cursor: Cursor, current: M::Atom) -> Self {
        Self {
            var,
            cursor,
            current,
        }
    }

    /// Append the Var's current value to `range` and return the updater for it.
    pub fn mount(
        output: &mut Output<M>,
        range: RangeId,
        var: Var<M::Atom>,
    ) -> Result<Updater<M>> {
        let current = var.current();
        let cursor = output.append(range, current.clone())?;
        Ok(Updater::new(Self::new(var, cursor, current)))
    }
}

impl<M: Medium> Update<M> for AtomUpdater<M> {
    fn poll(mut self: Box<Self>, output: &mut Output<M>) -> Result<Poll<M>> {
        let next = self.var.current();
        let settled = self.var.is_const()?;
        if next == self.current {
            return Ok(if settled {
                Poll::Const
            } else {
                Poll::Unchanged(Updater::from_box(self))
            });
        }

        output.replace(self.cursor, next.clone())?;
        self.current = next;
        Ok(if settled {
            Poll::Const
        } else {
            Poll::Replaced(Updater::from_box(self))
        })
    }
}

//! IsDirty: re-render a slot when a cached computation produces a new result.

use crate::error::Result;
use crate::output::{Medium, Output, RangeId, Region};
use crate::reactive::{Cached, Identity};

use super::updater::{Poll, Update, Updater};

/// Writes the content for one value into a region.
pub type Render<M, T> = Box<dyn Fn(&T, &mut Region<'_, M>) -> Result<()>>;

/// Owns a slot Range whose content is a function of a cached value.
///
/// Each poll recomputes the cache. While the execution identity is unchanged,
/// or a new execution produced an equal value, only the updaters created by the
/// last render are polled. Otherwise the slot is cleared, reopened at the same
/// place and rendered again, and those updaters are replaced.
///
/// This is not a plain "did it change" check. An unchanged identity still
/// polls the nested updaters, which follow cells the cache never read. And a
/// slot with no nested updaters reports `Const` only when the cache itself is
/// const; a slot over a live cache stays active even if its last render
/// registered nothing.
pub struct IsDirty<M: Medium, T> {
    cache: Cached<T>,
    value: T,
    identity: Identity,
    slot: RangeId,
    nested: Option<Updater<M>>,
    render: Render<M, T>,
}

impl<M, T> IsDirty<M, T>
where
    M: Medium,
    T: Clone + PartialEq + 'static,
{
    /// Run `cache`, render its value into a new child of `region` and return
    /// the updater that keeps that child current.
    pub fn mount(
        region: &mut Region<'_, M>,
        cache: Cached<T>,
        render: Render<M, T>,
    ) -> Result<Updater<M>> {
        let (value, identity) = cache.compute_with_identity();
        let slot = region.child()?;
        let nested = fill(region.output(), slot, &value, &render)?;
        Ok(Updater::new(Self {
            cache,
            value,
            identity,
            slot,
            nested,
            render,
        }))
    }

    /// The Range currently holding the rendered content.
    pub fn slot(&self) -> RangeId {
        self.slot
    }
}

impl<M, T> Update<M> for IsDirty<M, T>
where
    M: Medium,
    T: Clone + PartialEq + 'static,
{
    fn poll(mut self: Box<Self>, output: &mut Output<M>) -> Result<Poll<M>> {
        let (value, identity) = self.cache.compute_with_identity();
        let settled = self.cache.is_const()?;

        if identity == self.identity || value == self.value {
            self.identity = identity;
            let polled = self.nested.take().map(|nested| nested.poll(output));
            let replaced = match polled.transpose()? {
                None | Some(Poll::Const) => false,
                Some(Poll::Unchanged(next)) => {
                    self.nested = Some(next);
                    false
                }
                Some(Poll::Replaced(next)) => {
                    self.nested = Some(next);
                    true
                }
            };
            return Ok(match (self.nested.is_none() && settled, replaced) {
                (true, _) => Poll::Const,
                (false, true) => Poll::Replaced(Updater::from_box(self)),
                (false, false) => Poll::Unchanged(Updater::from_box(self)),
            });
        }

        let gap = output.clear(self.slot)?;
        let slot = output.begin_at(gap)?;
        self.nested = fill(output, slot, &value, &self.render)?;
        self.slot = slot;
        self.value = value;
        self.identity = identity;

        Ok(if self.nested.is_none() && settled {
            Poll::Const
        } else {
            Poll::Replaced(Updater::from_box(self))
        })
    }
}

fn fill<M: Medium, T>(
    output: &mut Output<M>,
    slot: RangeId,
    value: &T,
    render: &Render<M, T>,
) -> Result<Option<Updater<M>>> {
    let mut updaters = Vec::new();
    let mut region = output.region(slot, &mut updaters);
    render(value, &mut region)?;
    region.finalize()?;
    Ok(Updater::merge(updaters))
}

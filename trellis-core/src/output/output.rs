//! The Output: a medium plus the Range tree that measures it.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::error::{Result, StructuralError};
use crate::log::{Logger, TracingLogger};
use crate::options::RenderOptions;
use crate::poll::Updater;

use super::medium::Medium;
use super::range::{Cursor, Gap, RangeId, RangeKind, RangeState, RangeTree};
use super::region::Region;

/// Exclusive owner of one medium and the Range tree laid over it.
///
/// All structural operations go through here. Each one checks its
/// preconditions, then mutates the medium, then updates the Range tree, so a
/// failure at any step leaves the tree describing the medium exactly.
pub struct Output<M: Medium> {
    medium: M,
    tree: RangeTree,
    options: RenderOptions,
    logger: Rc<dyn Logger>,
}

impl<M: Medium> Output<M> {
    /// Lay a fresh Range tree over `medium`. The root starts at position 0.
    pub fn new(medium: M) -> Self {
        Self::with_options(medium, RenderOptions::default())
    }

    pub fn with_options(medium: M, options: RenderOptions) -> Self {
        Self {
            medium,
            tree: RangeTree::new(),
            options,
            logger: Rc::new(TracingLogger::new()),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn root(&self) -> RangeId {
        self.tree.root()
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn into_medium(self) -> M {
        self.medium
    }

    pub fn tree(&self) -> &RangeTree {
        &self.tree
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn logger(&self) -> Rc<dyn Logger> {
        Rc::clone(&self.logger)
    }

    pub fn size(&self, range: RangeId) -> Result<usize> {
        Ok(self.tree.size(range)?)
    }

    pub fn children(&self, range: RangeId) -> Result<&[RangeId]> {
        Ok(self.tree.children(range)?)
    }

    /// Absolute span of `range` in the medium.
    pub fn span(&self, range: RangeId) -> Result<Range<usize>> {
        Ok(self.tree.span(range)?)
    }

    /// The gap at the current end of `range`.
    pub fn cursor(&self, range: RangeId) -> Result<Gap> {
        Ok(self.tree.end(range)?)
    }

    /// Insert one unit at the end of `range`.
    ///
    /// `range` and all its ancestors grow by one. The returned cursor addresses
    /// the new unit for later replacement.
    pub fn append(&mut self, range: RangeId, atom: M::Atom) -> Result<Cursor> {
        let at = self.tree.prepare_append(range)?;
        self.medium.insert(at, atom)?;
        Ok(self.tree.push_unit(range))
    }

    /// Open a child Range at the end of `range`.
    pub fn begin(&mut self, range: RangeId) -> Result<RangeId> {
        let child = self.tree.begin(range)?;
        self.logger
            .begin(self.options.trace_level, &format!("range {child}"));
        Ok(child)
    }

    /// Open a child Range at `gap`, typically one returned by `clear`.
    pub fn begin_at(&mut self, gap: Gap) -> Result<RangeId> {
        let child = self.tree.begin_at(gap)?;
        let level = self.options.trace_level;
        self.logger.begin(level, &format!("range {child}"));
        self.logger.log(
            level,
            &format!("reopened in {} at {}", gap.parent(), gap.offset()),
        );
        Ok(child)
    }

    /// Close `range` and return its parent. Fails on the root.
    pub fn commit(&mut self, range: RangeId) -> Result<RangeId> {
        let parent = self.tree.close(range)?;
        self.logger
            .end(self.options.trace_level, &format!("range {range}"));
        Ok(parent)
    }

    /// Close a region whose content is complete.
    ///
    /// An empty region gets the medium's marker unit first (unless
    /// `anchor_empty` is off). The root is anchored but stays open.
    pub fn finalize(&mut self, range: RangeId) -> Result<RangeId> {
        if self.options.anchor_empty && self.tree.size(range)? == 0 {
            let marker = self.medium.marker();
            self.append(range, marker)?;
        }
        if range != self.tree.root() {
            self.commit(range)?;
        }
        Ok(range)
    }

    /// Remove everything `range` covers and reset it to size zero.
    ///
    /// A Range can be cleared once; the root never. The returned gap marks
    /// where the content was, for `begin_at`. Until then the cleared Range
    /// stays in the tree as a tombstone; it is freed by `begin_at` on that
    /// gap or when its parent is cleared.
    ///
    /// Clearing a Range that is still open closes its log bracket, and those
    /// of any open Ranges inside it.
    pub fn clear(&mut self, range: RangeId) -> Result<Gap> {
        let plan = self.tree.prepare_clear(range)?;
        let span = plan.span();
        let open = self.tree.open_spans(range)?;
        self.medium.remove(span.clone())?;

        let level = self.options.trace_level;
        self.logger.log(
            level,
            &format!("cleared range {range} ({}..{})", span.start, span.end),
        );
        let gap = self.tree.clear(range, plan);
        for id in open.iter().rev() {
            self.logger.end(level, &format!("range {id}"));
        }
        Ok(gap)
    }

    /// Overwrite the unit addressed by `cursor`.
    pub fn replace(&mut self, cursor: Cursor, atom: M::Atom) -> Result<()> {
        let unit = cursor.range();
        match self.tree.state(unit)? {
            RangeState::Cleared => {
                return Err(StructuralError::AlreadyCleared(unit).into());
            }
            RangeState::Open | RangeState::Closed => {}
        }
        match self.tree.kind(unit)? {
            RangeKind::Unit => {}
            RangeKind::Span => return Err(StructuralError::NotAUnit(unit).into()),
        }
        let at = self.tree.absolute_start(unit)?;
        self.medium.replace(at, atom)?;
        Ok(())
    }

    /// An appending view over `range` that collects updaters into `updaters`.
    pub fn region<'a>(
        &'a mut self,
        range: RangeId,
        updaters: &'a mut Vec<Updater<M>>,
    ) -> Region<'a, M> {
        Region::new(self, range, updaters)
    }

    /// Check the size invariant over the whole tree.
    pub fn verify(&self) -> Result<()> {
        Ok(self.tree.verify()?)
    }

    #[cfg(test)]
    pub(crate) fn tree_mut(&mut self) -> &mut RangeTree {
        &mut self.tree
    }
}

impl<M: Medium + fmt::Debug> fmt::Debug for Output<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("medium", &self.medium)
            .field("ranges", &self.tree.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::output::ArrayMedium;

    fn output() -> Output<ArrayMedium<i32>> {
        Output::new(ArrayMedium::new(0))
    }

    #[test]
    fn append_writes_at_the_end_of_the_range() {
        let mut out = output();
        let root = out.root();
        let first = out.begin(root).unwrap();
        let second = out.begin(root).unwrap();

        out.append(second, 3).unwrap();
        out.append(first, 1).unwrap();
        out.append(first, 2).unwrap();

        assert_eq!(out.medium().items(), &[1, 2, 3]);
        assert_eq!(out.size(root), Ok(3));
        assert_eq!(out.span(second), Ok(2..3));
        out.verify().unwrap();
    }

    #[test]
    fn replace_tracks_shifted_units() {
        let mut out = output();
        let root = out.root();
        let head = out.begin(root).unwrap();
        let cursor = out.append(root, 9).unwrap();
        out.append(head, 1).unwrap();

        out.replace(cursor, 10).unwrap();
        assert_eq!(out.medium().items(), &[1, 10]);
    }

    #[test]
    fn clear_removes_the_span() {
        let mut out = output();
        let root = out.root();
        let block = out.begin(root).unwrap();
        out.append(block, 1).unwrap();
        let middle = out.append(block, 2).unwrap();
        out.append(block, 3).unwrap();
        out.commit(block).unwrap();

        out.clear(middle.range()).unwrap();
        assert_eq!(out.medium().items(), &[1, 3]);
        assert_eq!(out.size(root), Ok(2));
        assert_eq!(
            out.clear(middle.range()),
            Err(RenderError::Structural(StructuralError::AlreadyCleared(
                middle.range()
            )))
        );
        assert_eq!(
            out.replace(middle, 7),
            Err(RenderError::Structural(StructuralError::AlreadyCleared(
                middle.range()
            )))
        );
    }

    #[test]
    fn root_cannot_be_cleared_or_committed() {
        let mut out = output();
        let root = out.root();
        assert_eq!(
            out.clear(root),
            Err(RenderError::Structural(StructuralError::ClearRoot))
        );
        assert_eq!(
            out.commit(root),
            Err(RenderError::Structural(StructuralError::CommitRoot))
        );
    }

    #[test]
    fn finalize_anchors_empty_regions() {
        let mut out = output();
        let root = out.root();
        let empty = out.begin(root).unwrap();
        out.finalize(empty).unwrap();

        assert_eq!(out.medium().items(), &[0]);
        assert_eq!(out.size(empty), Ok(1));
        assert_eq!(out.tree().state(empty), Ok(RangeState::Closed));
    }

    #[test]
    fn finalize_without_anchoring_leaves_empty_regions_empty() {
        let mut out = Output::with_options(
            ArrayMedium::new(0),
            RenderOptions::default().with_anchor_empty(false),
        );
        let root = out.root();
        let empty = out.begin(root).unwrap();
        out.finalize(empty).unwrap();
        assert!(out.medium().items().is_empty());
    }

    #[test]
    fn replace_needs_a_unit() {
        let mut out = output();
        let root = out.root();
        let block = out.begin(root).unwrap();
        let leaf = out.append(block, 1).unwrap().range();

        assert_eq!(
            out.replace(Cursor::at(block), 2),
            Err(RenderError::Structural(StructuralError::NotAUnit(block)))
        );
        assert_eq!(
            out.append(leaf, 2),
            Err(RenderError::Structural(StructuralError::NotASpan(leaf)))
        );
        assert_eq!(out.medium().items(), &[1]);
    }

    #[test]
    fn clearing_an_open_range_closes_its_brackets() {
        let logger = Rc::new(TracingLogger::new());
        let mut out = output().with_logger(logger.clone());
        let root = out.root();
        let block = out.begin(root).unwrap();
        let nested = out.begin(block).unwrap();
        out.append(nested, 1).unwrap();
        assert_eq!(logger.depth(), 2);

        out.clear(block).unwrap();
        assert_eq!(logger.depth(), 0);

        // Later brackets still pair up.
        let next = out.begin(root).unwrap();
        out.commit(next).unwrap();
        assert_eq!(logger.depth(), 0);
    }

    #[test]
    fn failed_medium_call_leaves_the_tree_alone() {
        let mut out = output();
        let root = out.root();
        let block = out.begin(root).unwrap();
        out.append(block, 1).unwrap();

        // The medium loses the content behind the tree's back.
        out.medium.remove(0..1).unwrap();

        assert!(matches!(out.clear(block), Err(RenderError::Medium(_))));
        assert_eq!(out.size(root), Ok(1));
        assert_eq!(out.tree().state(block), Ok(RangeState::Open));
    }
}

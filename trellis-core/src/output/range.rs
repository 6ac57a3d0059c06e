//! The Range tree.
//!
//! Ranges live in an arena and refer to each other by [`RangeId`]. Each node
//! stores its parent's id, its start relative to that parent and its size; a
//! parent lists its children in document order.
//!
//! Every unit of content is a leaf Range of kind [`RangeKind::Unit`] with size
//! 1, so a span's size is always the sum of its children's sizes and a child's
//! start is always the sum of the sizes of the siblings before it. Size changes
//! travel upward through `RangeTree::notify_size_delta`, which also shifts the
//! later siblings at every level.

use std::fmt;
use std::ops::Range;

use slab::Slab;

use crate::error::StructuralError;

/// Handle to a Range in one [`RangeTree`].
///
/// The serial number guards against a freed slot being reused: a stale handle
/// never resolves to the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeId {
    key: usize,
    serial: u64,
}

impl fmt::Display for RangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.serial)
    }
}

/// Lifecycle of a Range.
///
/// `Open -> Closed` on commit, `Open | Closed -> Cleared` on clear. `Cleared`
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeState {
    /// Accepts appended content.
    Open,
    /// Committed; content can still be replaced or cleared.
    Closed,
    /// Content removed.
    Cleared,
}

impl RangeState {
    fn close(self, id: RangeId) -> Result<Self, StructuralError> {
        match self {
            RangeState::Open => Ok(RangeState::Closed),
            RangeState::Closed | RangeState::Cleared => Err(StructuralError::NotOpen(id, self)),
        }
    }

    fn clear(self, id: RangeId) -> Result<Self, StructuralError> {
        match self {
            RangeState::Open | RangeState::Closed => Ok(RangeState::Cleared),
            RangeState::Cleared => Err(StructuralError::AlreadyCleared(id)),
        }
    }
}

/// What a Range holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// A span of child Ranges.
    Span,
    /// Exactly one unit of content.
    Unit,
}

#[derive(Debug, Clone)]
struct RangeNode {
    serial: u64,
    parent: Option<RangeId>,
    start: usize,
    size: usize,
    state: RangeState,
    kind: RangeKind,
    children: Vec<RangeId>,
    /// Cleared children not yet reopened by `begin_at`.
    tombstones: Vec<RangeId>,
}

/// Addresses one unit of content for later in-place replacement.
///
/// The unit's absolute position is recomputed on every use, so a cursor stays
/// valid while content before it grows or shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    unit: RangeId,
}

impl Cursor {
    /// The unit Range this cursor addresses.
    pub fn range(&self) -> RangeId {
        self.unit
    }

    #[cfg(test)]
    pub(crate) fn at(unit: RangeId) -> Self {
        Self { unit }
    }
}

/// An insertion point between two children of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    parent: RangeId,
    index: usize,
    offset: usize,
    vacated: Option<RangeId>,
}

impl Gap {
    pub fn parent(&self) -> RangeId {
        self.parent
    }

    /// Position among the parent's children.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Offset relative to the parent's start.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// What a validated clear will do.
#[derive(Debug, Clone)]
pub(crate) struct ClearPlan {
    parent: RangeId,
    index: usize,
    span: Range<usize>,
}

impl ClearPlan {
    pub(crate) fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// Arena of Ranges for one render root.
#[derive(Debug, Clone)]
pub struct RangeTree {
    nodes: Slab<RangeNode>,
    root: RangeId,
    next_serial: u64,
}

impl Default for RangeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeTree {
    /// A tree holding only an empty, open root.
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let key = nodes.insert(RangeNode {
            serial: 0,
            parent: None,
            start: 0,
            size: 0,
            state: RangeState::Open,
            kind: RangeKind::Span,
            children: Vec::new(),
            tombstones: Vec::new(),
        });
        Self {
            nodes,
            root: RangeId { key, serial: 0 },
            next_serial: 1,
        }
    }

    pub fn root(&self) -> RangeId {
        self.root
    }

    /// Number of Ranges in the arena, cleared ones included until reused.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: RangeId) -> Result<&RangeNode, StructuralError> {
        self.nodes
            .get(id.key)
            .filter(|node| node.serial == id.serial)
            .ok_or(StructuralError::UnknownRange(id))
    }

    pub fn parent(&self, id: RangeId) -> Result<Option<RangeId>, StructuralError> {
        Ok(self.node(id)?.parent)
    }

    /// Start relative to the parent.
    pub fn start(&self, id: RangeId) -> Result<usize, StructuralError> {
        Ok(self.node(id)?.start)
    }

    pub fn size(&self, id: RangeId) -> Result<usize, StructuralError> {
        Ok(self.node(id)?.size)
    }

    pub fn state(&self, id: RangeId) -> Result<RangeState, StructuralError> {
        Ok(self.node(id)?.state)
    }

    pub fn kind(&self, id: RangeId) -> Result<RangeKind, StructuralError> {
        Ok(self.node(id)?.kind)
    }

    pub fn children(&self, id: RangeId) -> Result<&[RangeId], StructuralError> {
        Ok(&self.node(id)?.children)
    }

    /// Start in the medium: the sum of starts from `id` up to the root.
    pub fn absolute_start(&self, id: RangeId) -> Result<usize, StructuralError> {
        let mut node = self.node(id)?;
        let mut at = node.start;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            at += node.start;
        }
        Ok(at)
    }

    /// Absolute span covered by `id`.
    pub fn span(&self, id: RangeId) -> Result<Range<usize>, StructuralError> {
        let start = self.absolute_start(id)?;
        Ok(start..start + self.node(id)?.size)
    }

    /// The gap at the end of `id`.
    pub fn end(&self, id: RangeId) -> Result<Gap, StructuralError> {
        let node = self.node(id)?;
        Ok(Gap {
            parent: id,
            index: node.children.len(),
            offset: node.size,
            vacated: None,
        })
    }

    /// Check that `id` is an open span and return the absolute position of its
    /// end.
    pub(crate) fn prepare_append(&self, id: RangeId) -> Result<usize, StructuralError> {
        let node = self.node(id)?;
        if node.kind == RangeKind::Unit {
            return Err(StructuralError::NotASpan(id));
        }
        if node.state != RangeState::Open {
            return Err(StructuralError::NotOpen(id, node.state));
        }
        Ok(self.absolute_start(id)? + node.size)
    }

    /// Append a unit to a span already checked by `prepare_append`.
    pub(crate) fn push_unit(&mut self, parent: RangeId) -> Cursor {
        let index = self.nodes[parent.key].children.len();
        let start = self.nodes[parent.key].size;
        let unit = self.insert_child(parent, index, start, RangeKind::Unit, RangeState::Closed);
        self.resize(unit, 1);
        Cursor { unit }
    }

    /// Open an empty child span at the end of `parent`.
    pub(crate) fn begin(&mut self, parent: RangeId) -> Result<RangeId, StructuralError> {
        self.prepare_append(parent)?;
        let index = self.nodes[parent.key].children.len();
        let start = self.nodes[parent.key].size;
        Ok(self.insert_child(parent, index, start, RangeKind::Span, RangeState::Open))
    }

    /// Open an empty child span at `gap`, releasing the Range the gap was
    /// vacated by.
    ///
    /// The parent may be closed: this is how committed content is re-rendered.
    pub(crate) fn begin_at(&mut self, gap: Gap) -> Result<RangeId, StructuralError> {
        let parent = self.node(gap.parent)?;
        if parent.kind == RangeKind::Unit {
            return Err(StructuralError::NotASpan(gap.parent));
        }
        if parent.state == RangeState::Cleared {
            return Err(StructuralError::NotOpen(gap.parent, parent.state));
        }
        let len = parent.children.len();
        let expected = match gap.index.checked_sub(1).map(|before| parent.children.get(before)) {
            None => Some(0),
            Some(Some(before)) => {
                let before = self.node(*before)?;
                Some(before.start + before.size)
            }
            Some(None) => None,
        };
        if expected != Some(gap.offset) {
            return Err(StructuralError::InvalidGap {
                parent: gap.parent,
                index: gap.index,
                len,
            });
        }

        if let Some(vacated) = gap.vacated {
            if self.node(vacated).map(|n| n.state) == Ok(RangeState::Cleared) {
                self.nodes.remove(vacated.key);
                self.nodes[gap.parent.key]
                    .tombstones
                    .retain(|tombstone| *tombstone != vacated);
            }
        }
        Ok(self.insert_child(gap.parent, gap.index, gap.offset, RangeKind::Span, RangeState::Open))
    }

    /// Close a non-root span and return its parent.
    pub(crate) fn close(&mut self, id: RangeId) -> Result<RangeId, StructuralError> {
        if id == self.root {
            return Err(StructuralError::CommitRoot);
        }
        let node = self.node(id)?;
        let state = node.state.close(id)?;
        let parent = node.parent.ok_or(StructuralError::CommitRoot)?;
        self.nodes[id.key].state = state;
        Ok(parent)
    }

    /// Check that `id` can be cleared and work out what clearing it removes.
    pub(crate) fn prepare_clear(&self, id: RangeId) -> Result<ClearPlan, StructuralError> {
        if id == self.root {
            return Err(StructuralError::ClearRoot);
        }
        let node = self.node(id)?;
        node.state.clear(id)?;
        let parent = node.parent.ok_or(StructuralError::ClearRoot)?;
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|child| *child == id)
            .ok_or(StructuralError::UnknownRange(id))?;
        Ok(ClearPlan {
            parent,
            index,
            span: self.span(id)?,
        })
    }

    /// `id` and every open span below it, parents before children.
    pub(crate) fn open_spans(&self, id: RangeId) -> Result<Vec<RangeId>, StructuralError> {
        let mut open = Vec::new();
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let node = self.node(id)?;
            if node.kind == RangeKind::Span && node.state == RangeState::Open {
                open.push(id);
            }
            pending.extend(node.children.iter().rev().copied());
        }
        Ok(open)
    }

    /// Apply a clear checked by `prepare_clear`.
    ///
    /// The cleared Range stays in the arena as a tombstone so a second clear is
    /// reported as such; its descendants are released. The tombstone is freed by
    /// `begin_at` on the returned gap, or together with its parent.
    pub(crate) fn clear(&mut self, id: RangeId, plan: ClearPlan) -> Gap {
        let size = self.nodes[id.key].size;
        self.resize(id, -(size as isize));

        let node = &mut self.nodes[id.key];
        node.state = RangeState::Cleared;
        let offset = node.start;
        let children = std::mem::take(&mut node.children);
        let tombstones = std::mem::take(&mut node.tombstones);
        let parent = &mut self.nodes[plan.parent.key];
        parent.children.remove(plan.index);
        parent.tombstones.push(id);
        for child in children.into_iter().chain(tombstones) {
            self.release(child);
        }

        Gap {
            parent: plan.parent,
            index: plan.index,
            offset,
            vacated: Some(id),
        }
    }

    /// Parent-side bookkeeping for a child whose size changed by `delta`: every
    /// ancestor grows by `delta` and every later sibling on the way up moves by
    /// `delta`.
    pub(crate) fn notify_size_delta(&mut self, child: RangeId, delta: isize) {
        let mut current = child;
        while let Some(parent) = self.nodes[current.key].parent {
            let siblings = &self.nodes[parent.key].children;
            if let Some(index) = siblings.iter().position(|sibling| *sibling == current) {
                for later in (index + 1)..siblings.len() {
                    let sibling = self.nodes[parent.key].children[later];
                    let node = &mut self.nodes[sibling.key];
                    node.start = shift(node.start, delta);
                }
            }
            let node = &mut self.nodes[parent.key];
            node.size = shift(node.size, delta);
            current = parent;
        }
    }

    /// Check the size and offset invariants over the whole tree.
    pub fn verify(&self) -> Result<(), StructuralError> {
        for (key, node) in self.nodes.iter() {
            let id = RangeId {
                key,
                serial: node.serial,
            };
            let mut covered = 0;
            for child in &node.children {
                let child_node = self.node(*child)?;
                if child_node.start != covered {
                    return Err(StructuralError::OffsetMismatch {
                        range: *child,
                        start: child_node.start,
                        expected: covered,
                    });
                }
                covered += child_node.size;
            }
            let expected = match node.kind {
                RangeKind::Span => covered,
                RangeKind::Unit => 1,
            };
            if node.state != RangeState::Cleared && node.size != expected {
                return Err(StructuralError::SizeMismatch {
                    range: id,
                    size: node.size,
                    covered: expected,
                });
            }
        }
        Ok(())
    }

    /// Overwrite a size without any bookkeeping.
    #[cfg(test)]
    pub(crate) fn force_size(&mut self, id: RangeId, size: usize) {
        self.nodes[id.key].size = size;
    }

    fn insert_child(
        &mut self,
        parent: RangeId,
        index: usize,
        start: usize,
        kind: RangeKind,
        state: RangeState,
    ) -> RangeId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let key = self.nodes.insert(RangeNode {
            serial,
            parent: Some(parent),
            start,
            size: 0,
            state,
            kind,
            children: Vec::new(),
            tombstones: Vec::new(),
        });
        let id = RangeId { key, serial };
        self.nodes[parent.key].children.insert(index, id);
        id
    }

    fn resize(&mut self, id: RangeId, delta: isize) {
        let node = &mut self.nodes[id.key];
        node.size = shift(node.size, delta);
        self.notify_size_delta(id, delta);
    }

    fn release(&mut self, id: RangeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if self.node(id).is_ok() {
                let node = self.nodes.remove(id.key);
                pending.extend(node.children);
                pending.extend(node.tombstones);
            }
        }
    }
}

fn shift(value: usize, delta: isize) -> usize {
    debug_assert!(
        value.checked_add_signed(delta).is_some(),
        "range bookkeeping underflow: {value} + {delta}"
    );
    value.saturating_add_signed(delta)
}

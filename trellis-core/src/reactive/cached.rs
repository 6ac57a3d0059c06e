//! Cached computations
//!
//! A `Cached` owns a callback, its last value and the Freshness of that value.
//!
//! # How it works
//!
//! 1. The first `compute` samples the revision clock, runs the callback inside a
//!    tracking frame and stores the value with the resulting `(tag, snapshot)`.
//!
//! 2. Later calls return the stored value as long as no cell in the tag has been
//!    written since the snapshot.
//!
//! 3. Once a cell is written, the next `compute` runs the callback again and
//!    replaces both the value and the Freshness.
//!
//! A callback that reads no cell produces a const tag and never runs again.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug};

use crate::error::BindingError;

use super::context::ReactiveContext;
use super::id::Identity;
use super::revision::Revision;
use super::tag::Tag;

/// The `(tag, snapshot)` pair recorded when a computation last ran.
#[derive(Debug, Clone)]
pub struct Freshness {
    tag: Tag,
    snapshot: Revision,
}

impl Freshness {
    pub fn new(tag: Tag, snapshot: Revision) -> Self {
        Self { tag, snapshot }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn snapshot(&self) -> Revision {
        self.snapshot
    }

    /// True if a read cell was written after the snapshot.
    pub fn is_stale(&self) -> bool {
        self.tag.changed_since(self.snapshot)
    }

    /// True if the computation read no mutable cell.
    pub fn is_const(&self) -> bool {
        self.tag.is_const()
    }
}

struct Computed<T> {
    value: T,
    freshness: Freshness,
    identity: Identity,
}

/// A memoized zero-argument computation.
pub struct Cached<T> {
    callback: Box<dyn Fn() -> T>,
    computed: RefCell<Option<Computed<T>>>,
    runs: Cell<usize>,
}

impl<T> Cached<T>
where
    T: Clone + 'static,
{
    /// Wrap a callback. It does not run until the first `compute`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            callback: Box::new(callback),
            computed: RefCell::new(None),
            runs: Cell::new(0),
        }
    }

    /// Return the cached value, re-running the callback if it is stale.
    pub fn compute(&self) -> T {
        self.compute_with_identity().0
    }

    /// Like `compute`, also returning the identity of the execution that
    /// produced the value.
    pub fn compute_with_identity(&self) -> (T, Identity) {
        {
            let computed = self.computed.borrow();
            if let Some(computed) = computed.as_ref().filter(|c| !c.freshness.is_stale()) {
                ReactiveContext::track_tag(&computed.freshness.tag);
                return (computed.value.clone(), computed.identity);
            }
        }

        let snapshot = Revision::now();
        let frame = ReactiveContext::enter();
        let value = (self.callback)();
        let tag = frame.finish();
        ReactiveContext::track_tag(&tag);

        let identity = Identity::mint();
        self.runs.set(self.runs.get() + 1);
        tracing::trace!(reads = tag.len(), %snapshot, "cached computation ran");

        *self.computed.borrow_mut() = Some(Computed {
            value: value.clone(),
            freshness: Freshness::new(tag, snapshot),
            identity,
        });
        (value, identity)
    }
}

impl<T> Cached<T> {
    /// True if the last run read no mutable cell.
    ///
    /// Fails if the computation never ran.
    pub fn is_const(&self) -> Result<bool, BindingError> {
        self.with_freshness(Freshness::is_const)
    }

    /// True if a cell read by the last run was written since.
    ///
    /// Fails if the computation never ran.
    pub fn is_stale(&self) -> Result<bool, BindingError> {
        self.with_freshness(Freshness::is_stale)
    }

    /// Freshness of the last run, if any.
    pub fn freshness(&self) -> Option<Freshness> {
        self.computed.borrow().as_ref().map(|c| c.freshness.clone())
    }

    /// Identity of the last run, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.computed.borrow().as_ref().map(|c| c.identity)
    }

    /// Number of times the callback has run.
    pub fn run_count(&self) -> usize {
        self.runs.get()
    }

    fn with_freshness(&self, f: impl FnOnce(&Freshness) -> bool) -> Result<bool, BindingError> {
        self.computed
            .borrow()
            .as_ref()
            .map(|c| f(&c.freshness))
            .ok_or(BindingError::NotComputed)
    }
}

impl<T> Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("runs", &self.runs.get())
            .field("freshness", &self.freshness())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

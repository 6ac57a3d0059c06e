//! Signal Implementation
//!
//! A Signal is the mutable root cell of the reactive system. Everything else
//! (derived Vars, cached computations, updaters) eventually reads Signals.
//!
//! # How Signals Work
//!
//! 1. When a signal is read inside a tracking frame, the frame records it.
//!
//! 2. When a signal is written, it advances the global revision clock and
//!    stamps itself with the new revision.
//!
//! 3. Any computation whose snapshot predates that stamp is now stale. Nothing
//!    is notified; staleness is discovered the next time someone asks.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug};
use std::rc::Rc;

use super::context::ReactiveContext;
use super::id::CellId;
use super::revision::Revision;
use super::tag::Tracked;

struct SignalCell<T> {
    id: CellId,
    value: RefCell<T>,
    revision: Cell<Revision>,
}

impl<T> Tracked for SignalCell<T> {
    fn id(&self) -> CellId {
        self.id
    }

    fn revision(&self) -> Revision {
        self.revision.get()
    }
}

/// A reactive cell holding a value of type T.
///
/// Clones share the same cell.
///
/// # Example
///
/// ```rust
/// use trellis_core::reactive::Signal;
///
/// let count = Signal::new(0);
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Signal<T> {
    cell: Rc<SignalCell<T>>,
}

impl<T> Signal<T>
where
    T: Clone + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(SignalCell {
                id: CellId::new(),
                value: RefCell::new(value),
                revision: Cell::new(Revision::now()),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> CellId {
        self.cell.id
    }

    /// Revision of the last write.
    pub fn revision(&self) -> Revision {
        self.cell.revision.get()
    }

    /// Get the current value, recording the read in the active frame.
    pub fn get(&self) -> T {
        ReactiveContext::track(Rc::clone(&self.cell) as Rc<dyn Tracked>);
        self.get_untracked()
    }

    /// Get the current value without recording a dependency.
    pub fn get_untracked(&self) -> T {
        self.cell.value.borrow().clone()
    }

    /// Store a new value and advance the revision clock.
    pub fn set(&self, value: T) {
        *self.cell.value.borrow_mut() = value;
        let revision = Revision::advance();
        self.cell.revision.set(revision);
        tracing::trace!(cell = %self.cell.id, %revision, "signal written");
    }

    /// Update the value using a function of the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.cell.value.borrow());
        self.set(next);
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Debug> Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.cell.id)
            .field("value", &*self.cell.value.borrow())
            .field("revision", &self.cell.revision.get())
            .finish()
    }
}

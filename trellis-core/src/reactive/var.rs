//! Live reactive cells.
//!
//! A `Var` is what a Param becomes once it is hydrated against a state: a
//! constant, a Signal supplied by the host, or a cached derivation over other
//! Vars.

use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::error::BindingError;

use super::cached::Cached;
use super::signal::Signal;

enum Source<T> {
    Constant(T),
    Signal(Signal<T>),
    Derived(Rc<Cached<T>>),
}

/// A live, readable reactive cell.
///
/// Clones share the same underlying cell or cache.
pub struct Var<T> {
    source: Source<T>,
}

impl<T> Var<T>
where
    T: Clone + 'static,
{
    /// A Var that never changes.
    pub fn constant(value: T) -> Self {
        Self {
            source: Source::Constant(value),
        }
    }

    /// A Var backed by a host-owned Signal.
    pub fn from_signal(signal: Signal<T>) -> Self {
        Self {
            source: Source::Signal(signal),
        }
    }

    /// A Var computed from other reactive reads, cached until one of them is
    /// written.
    pub fn derived<F>(compute: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            source: Source::Derived(Rc::new(Cached::new(compute))),
        }
    }

    /// The current value. Reading a derived Var may recompute it.
    pub fn current(&self) -> T {
        match &self.source {
            Source::Constant(value) => value.clone(),
            Source::Signal(signal) => signal.get(),
            Source::Derived(cached) => cached.compute(),
        }
    }

    /// True if the value can never change again.
    ///
    /// A derived Var must have been read at least once.
    pub fn is_const(&self) -> Result<bool, BindingError> {
        match &self.source {
            Source::Constant(_) => Ok(true),
            Source::Signal(_) => Ok(false),
            Source::Derived(cached) => cached.is_const(),
        }
    }
}

impl<T> Clone for Var<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let source = match &self.source {
            Source::Constant(value) => Source::Constant(value.clone()),
            Source::Signal(signal) => Source::Signal(signal.clone()),
            Source::Derived(cached) => Source::Derived(Rc::clone(cached)),
        };
        Self { source }
    }
}

impl<T: Debug> Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Constant(value) => f.debug_tuple("Var::Constant").field(value).finish(),
            Source::Signal(signal) => f.debug_tuple("Var::Signal").field(signal).finish(),
            Source::Derived(cached) => f.debug_tuple("Var::Derived").field(cached).finish(),
        }
    }
}

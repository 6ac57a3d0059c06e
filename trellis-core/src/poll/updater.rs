//! Updater handles and the poll protocol.

use std::fmt;

use crate::error::Result;
use crate::output::{Medium, Output};

/// Work that may have to be redone on a later cycle.
///
/// `poll` consumes the handle. It reads its dependencies first and mutates the
/// medium last, then hands back whatever should be polled next time.
pub trait Update<M: Medium> {
    fn poll(self: Box<Self>, output: &mut Output<M>) -> Result<Poll<M>>;
}

/// Outcome of one poll.
pub enum Poll<M: Medium> {
    /// Nothing changed; the medium was not touched.
    Unchanged(Updater<M>),
    /// The medium was updated; poll this handle next cycle.
    Replaced(Updater<M>),
    /// The site can never change again. Stop polling.
    Const,
}

impl<M: Medium> Poll<M> {
    /// The handle to keep, if any.
    pub fn into_updater(self) -> Option<Updater<M>> {
        match self {
            Poll::Unchanged(updater) | Poll::Replaced(updater) => Some(updater),
            Poll::Const => None,
        }
    }

    pub fn is_const(&self) -> bool {
        matches!(self, Poll::Const)
    }
}

impl<M: Medium> fmt::Debug for Poll<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Poll::Unchanged(_) => f.write_str("Unchanged"),
            Poll::Replaced(_) => f.write_str("Replaced"),
            Poll::Const => f.write_str("Const"),
        }
    }
}

/// A boxed [`Update`].
pub struct Updater<M: Medium>(Box<dyn Update<M>>);

impl<M: Medium> Updater<M> {
    pub fn new(update: impl Update<M> + 'static) -> Self {
        Self(Box::new(update))
    }

    pub(crate) fn from_box(update: Box<dyn Update<M>>) -> Self {
        Self(update)
    }

    pub fn poll(self, output: &mut Output<M>) -> Result<Poll<M>> {
        self.0.poll(output)
    }

    /// Combine updaters into one handle.
    ///
    /// No updaters gives `None`, one is returned as-is, more are polled
    /// together in order until every member is const.
    pub fn merge(mut updaters: Vec<Updater<M>>) -> Option<Updater<M>> {
        match updaters.len() {
            0 => None,
            1 => updaters.pop(),
            _ => Some(Updater::new(Group { members: updaters })),
        }
    }
}

impl<M: Medium> fmt::Debug for Updater<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Updater")
    }
}

struct Group<M: Medium> {
    members: Vec<Updater<M>>,
}

impl<M: Medium> Update<M> for Group<M> {
    fn poll(self: Box<Self>, output: &mut Output<M>) -> Result<Poll<M>> {
        let mut replaced = false;
        let mut survivors = Vec::with_capacity(self.members.len());
        for member in self.members {
            match member.poll(output)? {
                Poll::Unchanged(next) => survivors.push(next),
                Poll::Replaced(next) => {
                    replaced = true;
                    survivors.push(next);
                }
                Poll::Const => {}
            }
        }
        Ok(match Updater::merge(survivors) {
            None => Poll::Const,
            Some(next) if replaced => Poll::Replaced(next),
            Some(next) => Poll::Unchanged(next),
        })
    }
}

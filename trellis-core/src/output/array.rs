//! An array medium.
//!
//! The simplest possible adapter: content lives in a `Vec`. It also counts the
//! mutations it receives, which makes it handy for checking that a poll did (or
//! did not) touch the output.

use std::ops::Range;

use crate::error::MediumError;

use super::medium::Medium;

/// A `Vec`-backed medium.
#[derive(Debug, Clone)]
pub struct ArrayMedium<T> {
    items: Vec<T>,
    marker: T,
    mutations: usize,
}

impl<T> ArrayMedium<T>
where
    T: Clone + PartialEq + std::fmt::Debug + 'static,
{
    /// An empty array that anchors empty regions with `marker`.
    pub fn new(marker: T) -> Self {
        Self {
            items: Vec::new(),
            marker,
            mutations: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of successful insert, replace and remove calls so far.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn check_index(&self, index: usize, len: usize) -> Result<(), MediumError> {
        if index < len {
            Ok(())
        } else {
            Err(MediumError::OutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }
}

impl<T> Medium for ArrayMedium<T>
where
    T: Clone + PartialEq + std::fmt::Debug + 'static,
{
    type Atom = T;

    fn insert(&mut self, index: usize, atom: T) -> Result<(), MediumError> {
        // Inserting at the end is allowed.
        self.check_index(index, self.items.len() + 1)?;
        self.items.insert(index, atom);
        self.mutations += 1;
        Ok(())
    }

    fn replace(&mut self, index: usize, atom: T) -> Result<(), MediumError> {
        self.check_index(index, self.items.len())?;
        self.items[index] = atom;
        self.mutations += 1;
        Ok(())
    }

    fn remove(&mut self, span: Range<usize>) -> Result<(), MediumError> {
        if span.start > span.end || span.end > self.items.len() {
            return Err(MediumError::SpanMismatch {
                start: span.start,
                end: span.end,
                len: self.items.len(),
            });
        }
        self.items.drain(span);
        self.mutations += 1;
        Ok(())
    }

    fn marker(&self) -> T {
        self.marker.clone()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

//! The global revision clock.
//!
//! Every write to a mutable cell advances the clock and stamps the cell with the
//! new revision. A computation samples the clock before it runs; it is stale as
//! soon as any cell it read carries a later stamp.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static CLOCK: AtomicU64 = AtomicU64::new(1);

/// A point on the global revision clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision(u64);

impl Revision {
    /// The current revision. Does not advance the clock.
    pub fn now() -> Self {
        Self(CLOCK.load(Ordering::Acquire))
    }

    /// Advance the clock and return the new revision.
    pub(crate) fn advance() -> Self {
        Self(CLOCK.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Get the raw counter value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_past_now() {
        let before = Revision::now();
        let next = Revision::advance();
        assert!(next > before);
        assert!(Revision::now() >= next);
    }
}

//! Update Scheduler
//!
//! The scheduler owns the active updaters of one render root and drives them
//! one cycle at a time. It never decides when a cycle runs; the host calls
//! [`UpdateScheduler::poll`] whenever it wants the output brought up to date.
//!
//! # Algorithm
//!
//! 1. Take the whole active list.
//! 2. Poll every updater once, in registration order.
//! 3. Keep the handle each poll hands back; drop the ones that reported
//!    `Const`.
//! 4. Optionally check the size invariant of the Range tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output::{Medium, Output};

use super::updater::{Poll, Updater};

/// What happened during one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// Updaters that left the medium alone.
    pub unchanged: usize,
    /// Updaters that mutated the medium.
    pub replaced: usize,
    /// Updaters that became const and were dropped.
    pub finished: usize,
}

impl CycleReport {
    /// Number of updaters polled.
    pub fn polled(&self) -> usize {
        self.unchanged + self.replaced + self.finished
    }
}

/// The active updater chain of one render root.
pub struct UpdateScheduler<M: Medium> {
    active: Vec<Updater<M>>,
    cycle: u64,
}

impl<M: Medium> Default for UpdateScheduler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Medium> UpdateScheduler<M> {
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            cycle: 0,
        }
    }

    /// Keep `updater` active from the next cycle on.
    pub fn register(&mut self, updater: Updater<M>) {
        self.active.push(updater);
    }

    pub fn extend(&mut self, updaters: impl IntoIterator<Item = Updater<M>>) {
        self.active.extend(updaters);
    }

    /// Number of updaters that will be polled next cycle.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// True when nothing can change any more.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Poll every active updater once.
    ///
    /// On error the failing updater is lost and the ones not yet polled stay
    /// active; the render root should be considered broken.
    pub fn poll(&mut self, output: &mut Output<M>) -> Result<CycleReport> {
        self.cycle += 1;
        let logger = output.logger();
        let level = output.options().trace_level;
        let mut report = CycleReport {
            cycle: self.cycle,
            ..CycleReport::default()
        };

        let label = format!("poll cycle {}", self.cycle);
        let result = logger.indent(level, &label, || -> Result<()> {
            let mut pending = std::mem::take(&mut self.active).into_iter();
            let mut next = Vec::with_capacity(pending.len());
            while let Some(updater) = pending.next() {
                match updater.poll(output) {
                    Ok(Poll::Unchanged(updater)) => {
                        report.unchanged += 1;
                        next.push(updater);
                    }
                    Ok(Poll::Replaced(updater)) => {
                        report.replaced += 1;
                        next.push(updater);
                    }
                    Ok(Poll::Const) => report.finished += 1,
                    Err(err) => {
                        next.extend(pending);
                        self.active = next;
                        return Err(err);
                    }
                }
            }
            self.active = next;
            if output.options().verify_sizes {
                output.verify()?;
            }
            Ok(())
        });
        result?;

        Ok(logger.log_result(level, "cycle", report))
    }
}

impl<M: Medium> fmt::Debug for UpdateScheduler<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("active", &self.active.len())
            .field("cycle", &self.cycle)
            .finish()
    }
}

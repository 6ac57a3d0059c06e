//! Render configuration.

use tracing::Level;

/// Knobs for one render root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Level of the structural log (ranges opened/committed, poll cycles).
    pub trace_level: Level,

    /// Insert the medium's marker unit when a region is finalized empty, so it
    /// always occupies at least one unit.
    pub anchor_empty: bool,

    /// Check the size invariant of the whole Range tree after every poll cycle.
    pub verify_sizes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            trace_level: Level::DEBUG,
            anchor_empty: true,
            verify_sizes: cfg!(debug_assertions),
        }
    }
}

impl RenderOptions {
    pub fn with_trace_level(mut self, level: Level) -> Self {
        self.trace_level = level;
        self
    }

    pub fn with_anchor_empty(mut self, anchor: bool) -> Self {
        self.anchor_empty = anchor;
        self
    }

    pub fn with_verify_sizes(mut self, verify: bool) -> Self {
        self.verify_sizes = verify;
        self
    }
}

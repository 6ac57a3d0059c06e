//! Logging capability.
//!
//! The core reports structure (ranges opened and committed, poll cycles) through
//! a [`Logger`]. The default [`TracingLogger`] forwards to `tracing`, so a host
//! that installs a subscriber sees nested begin/end pairs as nested spans.
//! Nothing in the core depends on a logger being present.

use std::cell::RefCell;
use std::fmt::Debug;

use tracing::span::EnteredSpan;
pub use tracing::Level;

/// Sink for the core's structural log.
pub trait Logger {
    /// A single message.
    fn log(&self, level: Level, message: &str);

    /// Open a bracket. Must be matched by `end`.
    fn begin(&self, level: Level, message: &str);

    /// Close the innermost bracket.
    fn end(&self, level: Level, message: &str);
}

impl dyn Logger + '_ {
    /// Run `body` inside a `begin`/`end` bracket.
    pub fn indent<R>(&self, level: Level, message: &str, body: impl FnOnce() -> R) -> R {
        self.begin(level, message);
        let result = body();
        self.end(level, message);
        result
    }

    /// Log `message => value` and hand `value` back.
    pub fn log_result<T: Debug>(&self, level: Level, message: &str, value: T) -> T {
        self.log(level, &format!("{message} => {value:?}"));
        value
    }
}

/// Forwards to `tracing` events and spans.
///
/// `end` closes the innermost bracket opened with the same message, and any
/// bracket left open inside it.
#[derive(Default)]
pub struct TracingLogger {
    open: RefCell<Vec<(String, EnteredSpan)>>,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of brackets currently open.
    pub fn depth(&self) -> usize {
        self.open.borrow().len()
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str) {
        if level == Level::ERROR {
            tracing::error!("{message}");
        } else if level == Level::WARN {
            tracing::warn!("{message}");
        } else if level == Level::INFO {
            tracing::info!("{message}");
        } else if level == Level::DEBUG {
            tracing::debug!("{message}");
        } else {
            tracing::trace!("{message}");
        }
    }

    fn begin(&self, level: Level, message: &str) {
        let span = if level == Level::ERROR {
            tracing::span!(Level::ERROR, "bracket", label = message)
        } else if level == Level::WARN {
            tracing::span!(Level::WARN, "bracket", label = message)
        } else if level == Level::INFO {
            tracing::span!(Level::INFO, "bracket", label = message)
        } else if level == Level::DEBUG {
            tracing::span!(Level::DEBUG, "bracket", label = message)
        } else {
            tracing::span!(Level::TRACE, "bracket", label = message)
        };
        self.open
            .borrow_mut()
            .push((message.to_string(), span.entered()));
    }

    fn end(&self, _level: Level, message: &str) {
        let mut open = self.open.borrow_mut();
        if let Some(at) = open.iter().rposition(|(label, _)| label == message) {
            while open.len() > at {
                open.pop();
            }
        }
    }
}

//! Updater poll loop
//!
//! Every rendered site that can change leaves an [`Updater`] behind. The host
//! polls them once per cycle through an [`UpdateScheduler`]; each poll hands
//! back the handle to use next time, or reports `Const` when the site can
//! never change again.

mod atom;
mod dirty;
mod scheduler;
mod updater;

pub use atom::AtomUpdater;
pub use dirty::{IsDirty, Render};
pub use scheduler::{CycleReport, UpdateScheduler};
pub use updater::{Poll, Update, Updater};

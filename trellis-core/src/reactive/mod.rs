//! Dependency Tracking
//!
//! This module implements the dependency tracker: mutable cells, the read-sets
//! (Tags) that computations collect, and the cache that uses them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. Writing it advances the global
//! revision clock and stamps the signal with the new revision.
//!
//! ## Tags and Freshness
//!
//! A computation runs inside a tracking frame that records every Signal it
//! reads. The resulting Tag, together with the revision sampled before the run,
//! is the computation's Freshness. It is stale once any read Signal carries a
//! newer stamp, and const if it read nothing at all.
//!
//! ## Cached computations and Vars
//!
//! A `Cached` re-runs its callback only when its Freshness is stale. A `Var` is
//! the live cell a Param hydrates into: constant, Signal-backed or derived.
//!
//! # Implementation Notes
//!
//! Nothing is pushed on write. Staleness is pulled: whoever holds a Freshness
//! compares its snapshot against the stamps of the cells in its Tag. The core is
//! single-threaded, so cells use `Rc` and `RefCell`; only the id and revision
//! counters are process-wide atomics.

mod cached;
mod context;
mod id;
mod revision;
mod signal;
mod tag;
mod var;

pub use cached::{Cached, Freshness};
pub use context::ReactiveContext;
pub use id::{CellId, Identity};
pub use revision::Revision;
pub use signal::Signal;
pub use tag::{Tag, Tracked};
pub use var::Var;

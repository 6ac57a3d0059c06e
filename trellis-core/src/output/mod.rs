//! Output medium abstraction
//!
//! The core writes into any insertion-ordered medium through the [`Medium`]
//! trait and keeps a [`RangeTree`] of measured spans over it. [`Output`] owns
//! both and is the only place either is mutated; [`Region`] and
//! [`BlockBuffer`] are views that append through it.

mod array;
mod buffer;
mod medium;
#[allow(clippy::module_inception)]
mod output;
mod range;
mod region;

pub use array::ArrayMedium;
pub use buffer::BlockBuffer;
pub use medium::Medium;
pub use output::Output;
pub use range::{Cursor, Gap, RangeId, RangeKind, RangeState, RangeTree};
pub use region::Region;

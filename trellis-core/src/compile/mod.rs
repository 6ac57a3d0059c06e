//! Compiler
//!
//! A [`Node`] tree is compiled once against a [`ReactiveState`]: every Param
//! is hydrated and the resulting Vars are captured by an [`Evaluate`]. Running
//! the Evaluate against a region writes the content and registers the
//! updaters for it; the Node tree itself is never consulted again.
//!
//! [`ReactiveState`]: crate::params::ReactiveState

mod evaluate;
mod node;

pub use evaluate::{compile, Compile, Evaluate};
pub use node::Node;

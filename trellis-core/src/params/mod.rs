//! Reactive Parameter Binding
//!
//! Render trees are described against Params, placeholders for values that do
//! not exist yet. Hydration resolves them against one concrete state:
//!
//! 1. The host supplies a [`StateDict`] with a Signal or value for every dynamic
//!    key the [`ReactiveParameters`] declared.
//!
//! 2. `ReactiveParameters::hydrate` checks the key set and produces an
//!    immutable [`ReactiveState`], binding named inputs along the way.
//!
//! 3. Compilation calls `Param::hydrate` for every Param in the tree and closes
//!    over the resulting Vars.
//!
//! The same tree can be hydrated against another state to get an independent
//! set of Vars.

mod param;
mod parameters;
mod state;

pub use param::{call, constant, Inputs, Param};
pub use parameters::ReactiveParameters;
pub use state::{ReactiveState, StateDict};

//! Trellis Core
//!
//! This crate provides the incremental core of the Trellis rendering runtime.
//! It implements:
//!
//! - Dependency tracking (signals, tags, cached computations)
//! - Two-phase reactive parameters (Params hydrated against a state)
//! - A medium-independent Range tree over any insertion-ordered output
//! - A compiler from render descriptions to evaluation functions
//! - The updater poll loop that keeps the output current in place
//!
//! The core decides nothing about *when* to update: the host renders once and
//! then calls `poll` whenever it wants the output brought up to date.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Signals, Tags, Freshness, `Cached` and `Var`
//! - `params`: Params, `ReactiveParameters`, `StateDict` and `ReactiveState`
//! - `output`: the `Medium` contract, the Range tree, `Output` and its views
//! - `compile`: `Node` descriptions and `Evaluate`
//! - `poll`: updaters, `IsDirty` and the `UpdateScheduler`
//!
//! # Example
//!
//! ```rust
//! use trellis_core::compile::Node;
//! use trellis_core::output::ArrayMedium;
//! use trellis_core::params::{call, Param, ReactiveParameters, StateDict};
//! use trellis_core::reactive::Signal;
//! use trellis_core::Renderer;
//!
//! let params = ReactiveParameters::new();
//! let count: Param<i32> = params.param("count").unwrap();
//! let doubled = call(count.clone(), |n| n * 2);
//!
//! let signal = Signal::new(1);
//! let state = params.hydrate(StateDict::new().with("count", signal.clone())).unwrap();
//!
//! let mut renderer = Renderer::new(ArrayMedium::new(0));
//! let tree = Node::block(vec![Node::atom(count), Node::atom(doubled)]);
//! renderer.render(&tree, &state).unwrap();
//! assert_eq!(renderer.output().medium().items(), &[1, 2]);
//!
//! signal.set(5);
//! renderer.poll().unwrap();
//! assert_eq!(renderer.output().medium().items(), &[5, 10]);
//! ```

pub mod compile;
pub mod error;
pub mod log;
pub mod options;
pub mod output;
pub mod params;
pub mod poll;
pub mod reactive;
pub mod render;

pub use error::{BindingError, MediumError, RenderError, Result, StructuralError};
pub use options::RenderOptions;
pub use render::Renderer;

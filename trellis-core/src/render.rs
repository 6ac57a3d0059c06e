//! Render roots.

use std::rc::Rc;

use crate::compile::{compile, Evaluate, Node};
use crate::error::Result;
use crate::log::Logger;
use crate::options::RenderOptions;
use crate::output::{Medium, Output};
use crate::params::ReactiveState;
use crate::poll::{CycleReport, UpdateScheduler};

/// One render root: an Output and the updaters that keep it current.
///
/// ```rust
/// use trellis_core::compile::Node;
/// use trellis_core::output::ArrayMedium;
/// use trellis_core::params::{Param, StateDict, ReactiveState};
/// use trellis_core::reactive::Signal;
/// use trellis_core::Renderer;
///
/// let count = Signal::new(1);
/// let state = ReactiveState::from_dict(StateDict::new().with("count", count.clone()));
///
/// let mut renderer = Renderer::new(ArrayMedium::new(0));
/// renderer.render(&Node::block(vec![Node::atom(Param::dynamic("count"))]), &state).unwrap();
/// assert_eq!(renderer.output().medium().items(), &[1]);
///
/// count.set(2);
/// renderer.poll().unwrap();
/// assert_eq!(renderer.output().medium().items(), &[2]);
/// ```
pub struct Renderer<M: Medium> {
    output: Output<M>,
    scheduler: UpdateScheduler<M>,
}

impl<M: Medium> Renderer<M> {
    pub fn new(medium: M) -> Self {
        Self::with_options(medium, RenderOptions::default())
    }

    pub fn with_options(medium: M, options: RenderOptions) -> Self {
        Self {
            output: Output::with_options(medium, options),
            scheduler: UpdateScheduler::new(),
        }
    }

    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.output = self.output.with_logger(logger);
        self
    }

    /// Compile `node` against `state` and append it to the root.
    pub fn render(&mut self, node: &Node<M::Atom>, state: &ReactiveState) -> Result<()> {
        let evaluate = compile::<M, _>(node, state)?;
        self.mount(&evaluate)
    }

    /// Append already compiled content to the root.
    pub fn mount(&mut self, evaluate: &Evaluate<M>) -> Result<()> {
        let root = self.output.root();
        let mut updaters = Vec::new();
        evaluate.run(&mut self.output.region(root, &mut updaters))?;
        self.scheduler.extend(updaters);
        Ok(())
    }

    /// Run one poll cycle.
    pub fn poll(&mut self) -> Result<CycleReport> {
        self.scheduler.poll(&mut self.output)
    }

    /// True once no rendered site can change any more.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    pub fn output(&self) -> &Output<M> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut Output<M> {
        &mut self.output
    }

    pub fn scheduler(&self) -> &UpdateScheduler<M> {
        &self.scheduler
    }

    pub fn into_medium(self) -> M {
        self.output.into_medium()
    }
}

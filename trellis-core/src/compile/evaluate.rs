//! Compilation: Node + ReactiveState -> Evaluate.

use std::fmt;
use std::rc::Rc;

use crate::error::{BindingError, Result};
use crate::output::{BlockBuffer, Medium, Region};
use crate::params::ReactiveState;
use crate::poll::{AtomUpdater, IsDirty};
use crate::reactive::Cached;

use super::node::Node;

type Body<M> = dyn Fn(&mut Region<'_, M>) -> Result<()>;

/// A compiled description, ready to write into a region.
///
/// Running it appends content and registers the updaters that keep that
/// content current. An Evaluate holds hydrated Vars only and can be run any
/// number of times; each run produces independent content.
pub struct Evaluate<M: Medium>(Rc<Body<M>>);

impl<M: Medium> Evaluate<M> {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Region<'_, M>) -> Result<()> + 'static,
    {
        Self(Rc::new(body))
    }

    /// Write into `region`.
    pub fn run(&self, region: &mut Region<'_, M>) -> Result<()> {
        (self.0)(region)
    }
}

impl<M: Medium> Clone for Evaluate<M> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<M: Medium> fmt::Debug for Evaluate<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Evaluate")
    }
}

/// Something that compiles against a state.
pub trait Compile<M: Medium> {
    /// Hydrate every Param and close over the resulting Vars.
    fn compile(&self, state: &ReactiveState) -> Result<Evaluate<M>, BindingError>;
}

/// Compile `node` against `state`.
pub fn compile<M, C>(node: &C, state: &ReactiveState) -> Result<Evaluate<M>, BindingError>
where
    M: Medium,
    C: Compile<M> + ?Sized,
{
    node.compile(state)
}

impl<M: Medium> Compile<M> for Node<M::Atom> {
    fn compile(&self, state: &ReactiveState) -> Result<Evaluate<M>, BindingError> {
        match self {
            Node::Atom(param) => {
                let var = param.hydrate(state)?;
                Ok(Evaluate::new(move |region| {
                    let range = region.range();
                    let updater = AtomUpdater::mount(region.output(), range, var.clone())?;
                    region.register(updater);
                    Ok(())
                }))
            }

            Node::Block { head, children } => {
                let head = head.clone();
                let children = children
                    .iter()
                    .map(|child| compile::<M, _>(child, state))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Evaluate::new(move |region| {
                    let range = region.child()?;
                    let mut block = region.nested(range);
                    if let Some(head) = &head {
                        block.append(head.clone())?;
                    }
                    for child in &children {
                        child.run(&mut block)?;
                    }
                    block.commit()?;
                    Ok(())
                }))
            }

            Node::When {
                condition,
                then,
                otherwise,
            } => {
                let condition = condition.hydrate(state)?;
                let then = compile::<M, _>(&**then, state)?;
                let otherwise = compile::<M, _>(&**otherwise, state)?;
                Ok(Evaluate::new(move |region| {
                    let condition = condition.clone();
                    let then = then.clone();
                    let otherwise = otherwise.clone();
                    let updater = IsDirty::mount(
                        region,
                        Cached::new(move || condition.current()),
                        Box::new(move |selected: &bool, slot: &mut Region<'_, M>| -> Result<()> {
                            if *selected {
                                then.run(slot)
                            } else {
                                otherwise.run(slot)
                            }
                        }),
                    )?;
                    region.register(updater);
                    Ok(())
                }))
            }

            Node::List(items) => {
                let items = items.hydrate(state)?;
                Ok(Evaluate::new(move |region| {
                    let items = items.clone();
                    let updater = IsDirty::mount(
                        region,
                        Cached::new(move || items.current()),
                        Box::new(|items: &Vec<M::Atom>, slot: &mut Region<'_, M>| -> Result<()> {
                            let range = slot.range();
                            let mut block = BlockBuffer::open(slot.output(), range)?;
                            for item in items {
                                block.push(item.clone());
                            }
                            block.close()?;
                            Ok(())
                        }),
                    )?;
                    region.register(updater);
                    Ok(())
                }))
            }
        }
    }
}

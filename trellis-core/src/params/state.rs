//! Concrete state: the values Params are hydrated against.

use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::BindingError;
use crate::reactive::{Signal, Var};

type Slot = Rc<dyn Any>;

/// Host-supplied values for the dynamic keys of a parameter set.
///
/// Each entry holds a type-erased `Var<T>`.
#[derive(Clone, Default)]
pub struct StateDict {
    entries: IndexMap<String, Slot>,
}

impl StateDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to a live Signal.
    pub fn with<T>(mut self, key: impl Into<String>, signal: Signal<T>) -> Self
    where
        T: Clone + 'static,
    {
        self.insert(key, Var::from_signal(signal));
        self
    }

    /// Bind `key` to a fixed value.
    pub fn with_value<T>(mut self, key: impl Into<String>, value: T) -> Self
    where
        T: Clone + 'static,
    {
        self.insert(key, Var::constant(value));
        self
    }

    /// Bind `key` to an existing Var.
    pub fn insert<T>(&mut self, key: impl Into<String>, var: Var<T>)
    where
        T: Clone + 'static,
    {
        self.entries.insert(key.into(), Rc::new(var));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for StateDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

/// Immutable map from key to live Var, shared by every hydration of one render
/// root.
///
/// Cloning is cheap; clones share the map.
#[derive(Clone, Default)]
pub struct ReactiveState {
    vars: Rc<IndexMap<String, Slot>>,
}

impl ReactiveState {
    /// Wrap a dictionary as-is, without checking it against any parameter set.
    pub fn from_dict(dict: StateDict) -> Self {
        Self {
            vars: Rc::new(dict.entries),
        }
    }

    /// Look up the Var bound to `key`.
    pub fn get<T>(&self, key: &str) -> Result<Var<T>, BindingError>
    where
        T: Clone + 'static,
    {
        let slot = self
            .vars
            .get(key)
            .ok_or_else(|| BindingError::MissingKey(key.to_string()))?;
        slot.downcast_ref::<Var<T>>()
            .cloned()
            .ok_or_else(|| BindingError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Add a binding while the state is still being built.
    pub(crate) fn bind(&mut self, key: String, slot: Slot) {
        Rc::make_mut(&mut self.vars).insert(key, slot);
    }
}

impl fmt::Debug for ReactiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

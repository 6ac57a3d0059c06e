//! Parameter sets.
//!
//! A `ReactiveParameters` collects every key a render tree refers to. Keys are
//! either dynamic (supplied by the host at hydration time) or named inputs
//! defined here in terms of other Params.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::BindingError;

use super::param::Param;
use super::state::{ReactiveState, StateDict};

type Binder = Box<dyn Fn(&ReactiveState) -> Result<Rc<dyn Any>, BindingError>>;

enum Input {
    Dynamic,
    Named(Binder),
}

struct Entry {
    /// The keyed `Param<T>` handed out for this entry, type-erased.
    param: Rc<dyn Any>,
    input: Input,
}

/// The Params of one render tree, keyed by name.
///
/// Accessing an undeclared key creates a dynamic Param for it. Repeated access
/// returns the same Param.
#[derive(Default)]
pub struct ReactiveParameters {
    entries: RefCell<IndexMap<String, Entry>>,
}

impl ReactiveParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Param for `key`, declaring it as dynamic on first access.
    pub fn param<T>(&self, key: &str) -> Result<Param<T>, BindingError>
    where
        T: Clone + 'static,
    {
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            param: Rc::new(Param::<T>::dynamic(key)),
            input: Input::Dynamic,
        });
        downcast_param(key, &entry.param)
    }

    /// Declare `key` as a named input computed by `param`.
    ///
    /// Named inputs hydrate in definition order, after all dynamic keys, so
    /// `param` may refer to dynamic keys and to earlier named inputs. Returns the
    /// keyed Param every reference should use.
    pub fn define<T>(&self, key: &str, param: Param<T>) -> Result<Param<T>, BindingError>
    where
        T: Clone + 'static,
    {
        let binder: Binder = Box::new(move |state: &ReactiveState| {
            let var = param.hydrate(state)?;
            Ok(Rc::new(var) as Rc<dyn Any>)
        });

        let mut entries = self.entries.borrow_mut();
        // An earlier access keeps its handle, if the type agrees.
        let keyed = match entries.get(key) {
            Some(existing) => downcast_param::<T>(key, &existing.param)?,
            None => Param::dynamic(key),
        };
        entries.insert(
            key.to_string(),
            Entry {
                param: Rc::new(keyed.clone()),
                input: Input::Named(binder),
            },
        );
        Ok(keyed)
    }

    /// Keys the host must supply at hydration time.
    pub fn dynamic_keys(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, entry)| matches!(entry.input, Input::Dynamic))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Bind every key against `dict`.
    ///
    /// `dict` must supply exactly the dynamic keys: a missing key or an extra
    /// one is an error.
    pub fn hydrate(&self, dict: StateDict) -> Result<ReactiveState, BindingError> {
        let entries = self.entries.borrow();

        for (key, entry) in entries.iter() {
            if matches!(entry.input, Input::Dynamic) && !dict.contains(key) {
                return Err(BindingError::MissingKey(key.clone()));
            }
        }
        if let Some(extra) = dict
            .keys()
            .find(|key| !matches!(entries.get(*key), Some(Entry { input: Input::Dynamic, .. })))
        {
            return Err(BindingError::UnexpectedKey(extra.to_string()));
        }

        let mut state = ReactiveState::from_dict(dict);
        for (key, entry) in entries.iter() {
            if let Input::Named(bind) = &entry.input {
                let slot = bind(&state)?;
                state.bind(key.clone(), slot);
            }
        }

        tracing::debug!(keys = state.len(), "parameters hydrated");
        Ok(state)
    }
}

impl fmt::Debug for ReactiveParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        let mut map = f.debug_map();
        for (key, entry) in entries.iter() {
            let kind = match entry.input {
                Input::Dynamic => "dynamic",
                Input::Named(_) => "named",
            };
            map.entry(key, &kind);
        }
        map.finish()
    }
}

fn downcast_param<T>(key: &str, param: &Rc<dyn Any>) -> Result<Param<T>, BindingError>
where
    T: Clone + 'static,
{
    param
        .downcast_ref::<Param<T>>()
        .cloned()
        .ok_or_else(|| BindingError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        })
}

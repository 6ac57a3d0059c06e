//! Params: unbound references to future reactive values.

use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::error::BindingError;
use crate::reactive::Var;

use super::state::ReactiveState;

type Hydrator<T> = Box<dyn Fn(&ReactiveState) -> Result<Var<T>, BindingError>>;

enum Source<T> {
    Constant(T),
    Call(Hydrator<T>),
    Dynamic(String),
}

/// An unbound reference to a value of type `T`.
///
/// A Param owns no live value. `hydrate` resolves it against a
/// [`ReactiveState`] into a [`Var`]. Clones refer to the same Param.
pub struct Param<T> {
    source: Rc<Source<T>>,
}

impl<T> Param<T>
where
    T: Clone + 'static,
{
    /// A Param that hydrates to a constant Var.
    pub fn constant(value: T) -> Self {
        Self::from_source(Source::Constant(value))
    }

    /// A Param bound to `key` in the state it is hydrated against.
    pub fn dynamic(key: impl Into<String>) -> Self {
        Self::from_source(Source::Dynamic(key.into()))
    }

    fn from_source(source: Source<T>) -> Self {
        Self {
            source: Rc::new(source),
        }
    }

    /// Resolve against `state`.
    pub fn hydrate(&self, state: &ReactiveState) -> Result<Var<T>, BindingError> {
        match &*self.source {
            Source::Constant(value) => Ok(Var::constant(value.clone())),
            Source::Call(hydrate) => hydrate(state),
            Source::Dynamic(key) => state.get(key),
        }
    }

    /// The state key, for dynamic Params.
    pub fn key(&self) -> Option<&str> {
        match &*self.source {
            Source::Dynamic(key) => Some(key),
            Source::Constant(_) | Source::Call(_) => None,
        }
    }

    /// Derive a Param by applying `f` to this one's value.
    pub fn map<U, F>(&self, f: F) -> Param<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + 'static,
    {
        call(self.clone(), f)
    }

    /// True if both handles refer to the same Param.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
    }
}

impl<T> Clone for Param<T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
        }
    }
}

impl<T: Debug> Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.source {
            Source::Constant(value) => f.debug_tuple("Param::Constant").field(value).finish(),
            Source::Call(_) => f.write_str("Param::Call"),
            Source::Dynamic(key) => f.debug_tuple("Param::Dynamic").field(key).finish(),
        }
    }
}

/// A Param that hydrates to a constant Var.
pub fn constant<T>(value: T) -> Param<T>
where
    T: Clone + 'static,
{
    Param::constant(value)
}

/// A Param derived by applying `f` to the values of `inputs`.
///
/// `inputs` is a single Param or a tuple of up to four. Each hydration creates
/// one cached derivation, so `f` only runs again after an input changed.
///
/// ```rust
/// use trellis_core::params::{call, constant, ReactiveState};
///
/// let sum = call((constant(2), constant(3)), |(a, b)| a + b);
/// let var = sum.hydrate(&ReactiveState::default()).unwrap();
/// assert_eq!(var.current(), 5);
/// ```
pub fn call<I, T, F>(inputs: I, f: F) -> Param<T>
where
    I: Inputs,
    T: Clone + 'static,
    F: Fn(I::Values) -> T + 'static,
{
    let f = Rc::new(f);
    Param::from_source(Source::Call(Box::new(move |state: &ReactiveState| {
        let vars = inputs.hydrate(state)?;
        let f = Rc::clone(&f);
        Ok(Var::derived(move || f(I::read(&vars))))
    })))
}

/// One or more Params usable as the inputs of [`call`].
pub trait Inputs: 'static {
    /// The hydrated Vars.
    type Vars: 'static;
    /// The values read from them.
    type Values;

    fn hydrate(&self, state: &ReactiveState) -> Result<Self::Vars, BindingError>;

    fn read(vars: &Self::Vars) -> Self::Values;
}

impl<A> Inputs for Param<A>
where
    A: Clone + 'static,
{
    type Vars = Var<A>;
    type Values = A;

    fn hydrate(&self, state: &ReactiveState) -> Result<Self::Vars, BindingError> {
        Param::hydrate(self, state)
    }

    fn read(vars: &Self::Vars) -> Self::Values {
        vars.current()
    }
}

macro_rules! impl_inputs {
    ($($name:ident: $idx:tt),+) => {
        impl<$($name),+> Inputs for ($(Param<$name>,)+)
        where
            $($name: Clone + 'static),+
        {
            type Vars = ($(Var<$name>,)+);
            type Values = ($($name,)+);

            fn hydrate(&self, state: &ReactiveState) -> Result<Self::Vars, BindingError> {
                Ok(($(self.$idx.hydrate(state)?,)+))
            }

            fn read(vars: &Self::Vars) -> Self::Values {
                ($(vars.$idx.current(),)+)
            }
        }
    };
}

impl_inputs!(A: 0);
impl_inputs!(A: 0, B: 1);
impl_inputs!(A: 0, B: 1, C: 2);
impl_inputs!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::StateDict;
    use crate::reactive::Signal;
    use std::cell::Cell;

    #[test]
    fn constant_hydrates_to_constant_var() {
        let var = constant(9).hydrate(&ReactiveState::default()).unwrap();
        assert_eq!(var.current(), 9);
        assert_eq!(var.is_const(), Ok(true));
    }

    #[test]
    fn dynamic_param_reads_the_state() {
        let signal = Signal::new(4);
        let state = ReactiveState::from_dict(StateDict::new().with("n", signal.clone()));
        let var = Param::<i32>::dynamic("n").hydrate(&state).unwrap();

        assert_eq!(var.current(), 4);
        signal.set(8);
        assert_eq!(var.current(), 8);
    }

    #[test]
    fn dynamic_param_without_binding_fails() {
        let err = Param::<i32>::dynamic("missing")
            .hydrate(&ReactiveState::default())
            .unwrap_err();
        assert_eq!(err, BindingError::MissingKey("missing".into()));
    }

    #[test]
    fn call_recomputes_only_when_an_input_changes() {
        let left = Signal::new(1);
        let right = Signal::new(10);
        let state = ReactiveState::from_dict(
            StateDict::new()
                .with("left", left.clone())
                .with("right", right.clone()),
        );

        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let sum = call(
            (Param::<i32>::dynamic("left"), Param::<i32>::dynamic("right")),
            move |(l, r)| {
                counter.set(counter.get() + 1);
                l + r
            },
        );

        let var = sum.hydrate(&state).unwrap();
        assert_eq!(var.current(), 11);
        assert_eq!(var.current(), 11);
        assert_eq!(runs.get(), 1);

        right.set(20);
        assert_eq!(var.current(), 21);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn map_derives_from_one_input() {
        let label = constant(3).map(|n| format!("#{n}"));
        let var = label.hydrate(&ReactiveState::default()).unwrap();
        assert_eq!(var.current(), "#3");
        assert_eq!(var.is_const(), Ok(true));
    }

    #[test]
    fn clones_are_the_same_param() {
        let a = Param::<u8>::dynamic("a");
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Param::dynamic("a")));
        assert_eq!(a.key(), Some("a"));
    }
}

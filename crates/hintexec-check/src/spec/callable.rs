//! Predicates and hooks: the opaque user callables a pipeline runs.
//!
//! Both carry a name (their identity in diagnostics and traces) and the
//! names of the sibling parameters they want to see. When invoked they
//! receive the bound value first and the sibling values after it, in the
//! declared order.

use std::fmt;
use std::sync::Arc;

use hintexec_core::{Flow, Raised, Value};

type PredicateFn = dyn Fn(&Value, &[Value]) -> Result<bool, Raised> + Send + Sync;
type HookFn = dyn Fn(Value, &[Value]) -> Result<Flow, Raised> + Send + Sync;

/// A check that must hold for the bound value.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    siblings: Vec<String>,
    func: Arc<PredicateFn>,
}

impl Predicate {
    /// A predicate over the bound value alone.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Predicate {
            name: name.into(),
            siblings: Vec::new(),
            func: Arc::new(move |value: &Value, _: &[Value]| Ok(func(value))),
        }
    }

    /// A predicate over the bound value that may raise its own error.
    pub fn try_new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, Raised> + Send + Sync + 'static,
    {
        Predicate {
            name: name.into(),
            siblings: Vec::new(),
            func: Arc::new(move |value: &Value, _: &[Value]| func(value)),
        }
    }

    /// A predicate that also receives the named sibling parameters.
    pub fn with_siblings<I, S, F>(name: impl Into<String>, siblings: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Value, &[Value]) -> Result<bool, Raised> + Send + Sync + 'static,
    {
        Predicate {
            name: name.into(),
            siblings: siblings.into_iter().map(Into::into).collect(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sibling parameter names, in the order their values are passed.
    pub fn siblings(&self) -> &[String] {
        &self.siblings
    }

    /// Number of values the predicate is invoked with.
    pub fn arity(&self) -> usize {
        1 + self.siblings.len()
    }

    pub(crate) fn call(&self, value: &Value, siblings: &[Value]) -> Result<bool, Raised> {
        (self.func)(value, siblings)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("siblings", &self.siblings)
            .finish_non_exhaustive()
    }
}

/// A rewrite of the bound value.
///
/// A hook returns [`Flow::Continue`] with the value the next stage should
/// see, or [`Flow::Return`] to end the call with that payload.
#[derive(Clone)]
pub struct Hook {
    name: String,
    siblings: Vec<String>,
    func: Arc<HookFn>,
}

impl Hook {
    /// A hook with full control over the flow.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Result<Flow, Raised> + Send + Sync + 'static,
    {
        Hook {
            name: name.into(),
            siblings: Vec::new(),
            func: Arc::new(move |value: Value, _: &[Value]| func(value)),
        }
    }

    /// An infallible value mapping that always continues.
    pub fn map<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Hook::new(name, move |value| Ok(Flow::Continue(func(value))))
    }

    /// A value mapping that always continues but may raise its own error.
    pub fn try_map<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, Raised> + Send + Sync + 'static,
    {
        Hook::new(name, move |value| func(value).map(Flow::Continue))
    }

    /// A hook that also receives the named sibling parameters.
    pub fn with_siblings<I, S, F>(name: impl Into<String>, siblings: I, func: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(Value, &[Value]) -> Result<Flow, Raised> + Send + Sync + 'static,
    {
        Hook {
            name: name.into(),
            siblings: siblings.into_iter().map(Into::into).collect(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn siblings(&self) -> &[String] {
        &self.siblings
    }

    pub fn arity(&self) -> usize {
        1 + self.siblings.len()
    }

    pub(crate) fn call(&self, value: Value, siblings: &[Value]) -> Result<Flow, Raised> {
        (self.func)(value, siblings)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("siblings", &self.siblings)
            .finish_non_exhaustive()
    }
}

//! Specification objects attached to parameters and return values.
//!
//! Three kinds compose into a per-parameter pipeline:
//! - [`Assert`]: predicates that must all hold for the bound value.
//! - [`Modify`]: hooks that replace the bound value, in order.
//! - [`Sequence`]: an ordered mix of the above (and of nested sequences).
//!
//! Each kind is built from a payload of [`SpecItem`]s: an optional leading
//! [`TypeHint`] followed by steps. Construction is forgiving (see
//! [`parse`](parse::parse)) and the result is immutable.

pub mod callable;
pub mod parse;

pub use callable::{Hook, Predicate};

use hintexec_core::{TypeHint, Value};

/// One element of a specification payload.
#[derive(Debug, Clone)]
pub enum SpecItem {
    Hint(TypeHint),
    Predicate(Predicate),
    Hook(Hook),
    Spec(Spec),
    /// A plain value. Never usable as a step; the parser drops it.
    Value(Value),
}

impl SpecItem {
    /// Whether this item is a plain type declaration.
    pub fn is_type_hint(&self) -> bool {
        matches!(self, SpecItem::Hint(_))
    }

    /// Whether this item is a user callable (predicate or hook).
    pub fn is_callable(&self) -> bool {
        matches!(self, SpecItem::Predicate(_) | SpecItem::Hook(_))
    }

    /// Whether this item can be a step of a [`Sequence`].
    pub fn is_spec(&self) -> bool {
        matches!(self, SpecItem::Spec(_))
    }
}

impl From<TypeHint> for SpecItem {
    fn from(hint: TypeHint) -> Self {
        SpecItem::Hint(hint)
    }
}

impl From<Predicate> for SpecItem {
    fn from(p: Predicate) -> Self {
        SpecItem::Predicate(p)
    }
}

impl From<Hook> for SpecItem {
    fn from(h: Hook) -> Self {
        SpecItem::Hook(h)
    }
}

impl From<Spec> for SpecItem {
    fn from(s: Spec) -> Self {
        SpecItem::Spec(s)
    }
}

impl From<Assert> for SpecItem {
    fn from(a: Assert) -> Self {
        SpecItem::Spec(Spec::Assert(a))
    }
}

impl From<Modify> for SpecItem {
    fn from(m: Modify) -> Self {
        SpecItem::Spec(Spec::Modify(m))
    }
}

impl From<Sequence> for SpecItem {
    fn from(s: Sequence) -> Self {
        SpecItem::Spec(Spec::Sequence(s))
    }
}

impl From<Value> for SpecItem {
    fn from(v: Value) -> Self {
        SpecItem::Value(v)
    }
}

/// Predicates that must hold for the bound value.
#[derive(Debug, Clone)]
pub struct Assert {
    typehint: Option<TypeHint>,
    predicates: Option<Vec<Predicate>>,
}

impl Assert {
    pub fn new(items: impl IntoIterator<Item = SpecItem>) -> Self {
        let (typehint, predicates) = parse::parse(items.into_iter().collect(), |item| match item {
            SpecItem::Predicate(p) => Some(p),
            _ => None,
        });
        Assert {
            typehint,
            predicates,
        }
    }

    pub fn typehint(&self) -> Option<&TypeHint> {
        self.typehint.as_ref()
    }

    /// `None` means there is nothing to check.
    pub fn predicates(&self) -> Option<&[Predicate]> {
        self.predicates.as_deref()
    }
}

/// Hooks that rewrite the bound value in declared order.
#[derive(Debug, Clone)]
pub struct Modify {
    typehint: Option<TypeHint>,
    hooks: Option<Vec<Hook>>,
}

impl Modify {
    pub fn new(items: impl IntoIterator<Item = SpecItem>) -> Self {
        let (typehint, hooks) = parse::parse(items.into_iter().collect(), |item| match item {
            SpecItem::Hook(h) => Some(h),
            _ => None,
        });
        Modify { typehint, hooks }
    }

    pub fn typehint(&self) -> Option<&TypeHint> {
        self.typehint.as_ref()
    }

    pub fn hooks(&self) -> Option<&[Hook]> {
        self.hooks.as_deref()
    }
}

/// Ordered composition of specifications.
#[derive(Debug, Clone)]
pub struct Sequence {
    typehint: Option<TypeHint>,
    steps: Option<Vec<Spec>>,
}

impl Sequence {
    pub fn new(items: impl IntoIterator<Item = SpecItem>) -> Self {
        let (typehint, steps) = parse::parse(items.into_iter().collect(), |item| match item {
            SpecItem::Spec(s) => Some(s),
            _ => None,
        });
        Sequence { typehint, steps }
    }

    pub fn typehint(&self) -> Option<&TypeHint> {
        self.typehint.as_ref()
    }

    pub fn steps(&self) -> Option<&[Spec]> {
        self.steps.as_deref()
    }
}

/// A specification of any kind.
#[derive(Debug, Clone)]
pub enum Spec {
    Assert(Assert),
    Modify(Modify),
    Sequence(Sequence),
}

impl Spec {
    /// The plain type hint this specification carries, if any.
    pub fn typehint(&self) -> Option<&TypeHint> {
        match self {
            Spec::Assert(a) => a.typehint(),
            Spec::Modify(m) => m.typehint(),
            Spec::Sequence(s) => s.typehint(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Spec::Assert(_) => "Assert",
            Spec::Modify(_) => "Modify",
            Spec::Sequence(_) => "Sequence",
        }
    }

    /// Number of steps at this level (`0` for a no-op).
    pub fn step_count(&self) -> usize {
        match self {
            Spec::Assert(a) => a.predicates().map_or(0, <[_]>::len),
            Spec::Modify(m) => m.hooks().map_or(0, <[_]>::len),
            Spec::Sequence(s) => s.steps().map_or(0, <[_]>::len),
        }
    }
}

impl From<Assert> for Spec {
    fn from(a: Assert) -> Self {
        Spec::Assert(a)
    }
}

impl From<Modify> for Spec {
    fn from(m: Modify) -> Self {
        Spec::Modify(m)
    }
}

impl From<Sequence> for Spec {
    fn from(s: Sequence) -> Self {
        Spec::Sequence(s)
    }
}

//! Executable parameter annotations.
//!
//! A function declares, per parameter and for its return value, a pipeline
//! of assertions ([`Assert`]) and value rewrites ([`Modify`]), optionally
//! composed in order ([`Sequence`]). [`enforce`] wraps the function body so
//! that every call runs those pipelines against the values actually bound to
//! each parameter, whether they were passed by position, by keyword, or came
//! from a default.
//!
//! # Usage
//!
//! ```ignore
//! let div = enforce(
//!     Signature::new("div")
//!         .param(Param::new("a"))
//!         .param(Param::new("b").annotate(checks![
//!             TypeHint::float(),
//!             Predicate::new("b != 0", |b| b.as_float() != Some(0.0)),
//!         ])),
//!     |args| Ok(Value::Float(args.arg("a")?.expect_float()? / args.arg("b")?.expect_float()?)),
//! )?;
//! let div = cleanup_annotations(div);
//! div.call(CallArgs::new().arg(1.0).arg(2.0))?;
//! ```

pub mod binding;
pub mod engine;
pub mod normalize;
pub mod spec;

pub use binding::args::{Bound, CallArgs, UnknownParameter};
pub use binding::{Annotation, Annotations, BindingContext, FunctionInfo, Param, ParamKind, Signature, SignatureError};
pub use engine::error::{EnforceError, Violation};
pub use engine::trace::{StepOutcome, TraceEntry};
pub use engine::{enforce, EnforceConfig, Enforced, TracedCall};
pub use normalize::{cleanup_annotations, normalize_annotations};
pub use spec::{Assert, Hook, Modify, Predicate, Sequence, Spec, SpecItem};

pub use hintexec_core::{Flow, Raised, TypeHint, Value, ValueKind};

/// Builds an [`Assert`] from a leading optional type hint and predicates.
///
/// Items that are neither are dropped.
#[macro_export]
macro_rules! checks {
    ($($item:expr),* $(,)?) => {
        $crate::spec::Assert::new(::std::vec![$($crate::spec::SpecItem::from($item)),*])
    };
}

/// Builds a [`Modify`] from a leading optional type hint and hooks.
#[macro_export]
macro_rules! modify {
    ($($item:expr),* $(,)?) => {
        $crate::spec::Modify::new(::std::vec![$($crate::spec::SpecItem::from($item)),*])
    };
}

/// Builds a [`Sequence`] from a leading optional type hint and nested specs.
#[macro_export]
macro_rules! sequence {
    ($($item:expr),* $(,)?) => {
        $crate::spec::Sequence::new(::std::vec![$($crate::spec::SpecItem::from($item)),*])
    };
}

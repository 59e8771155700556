//! Plain type hints.
//!
//! A [`TypeHint`] is the declaration "this parameter should be of type T".
//! The engine classifies hints (they are never pipeline steps) but never
//! checks values against them; that is left to whatever external checker
//! consumes the normalized annotations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// A plain type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeHint {
    /// One of the built-in value kinds (`int`, `float`, ...).
    Concrete(ValueKind),
    /// A user-defined nominal type, identified by name.
    Named(String),
    /// Any of the listed hints, e.g. `Union[int, float]`.
    Union(Vec<TypeHint>),
    /// A parametric type, e.g. `list[int]` or `Mapping[str, int]`.
    Generic { base: String, args: Vec<TypeHint> },
}

/// Classification of a [`TypeHint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    Concrete,
    Union,
    Parametric,
}

impl TypeHint {
    pub fn none() -> Self {
        TypeHint::Concrete(ValueKind::None)
    }

    pub fn bool() -> Self {
        TypeHint::Concrete(ValueKind::Bool)
    }

    pub fn int() -> Self {
        TypeHint::Concrete(ValueKind::Int)
    }

    pub fn float() -> Self {
        TypeHint::Concrete(ValueKind::Float)
    }

    pub fn str() -> Self {
        TypeHint::Concrete(ValueKind::Str)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeHint::Named(name.into())
    }

    pub fn union(members: impl IntoIterator<Item = TypeHint>) -> Self {
        TypeHint::Union(members.into_iter().collect())
    }

    pub fn generic(base: impl Into<String>, args: impl IntoIterator<Item = TypeHint>) -> Self {
        TypeHint::Generic {
            base: base.into(),
            args: args.into_iter().collect(),
        }
    }

    /// `Optional[T]`, i.e. `Union[T, None]`.
    pub fn optional(inner: TypeHint) -> Self {
        TypeHint::Union(vec![inner, TypeHint::none()])
    }

    pub fn kind(&self) -> HintKind {
        match self {
            TypeHint::Concrete(_) | TypeHint::Named(_) => HintKind::Concrete,
            TypeHint::Union(_) => HintKind::Union,
            TypeHint::Generic { .. } => HintKind::Parametric,
        }
    }

    /// `true` for unions and parametric hints.
    pub fn is_composite(&self) -> bool {
        self.kind() != HintKind::Concrete
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[TypeHint]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Concrete(kind) => write!(f, "{}", kind),
            TypeHint::Named(name) => f.write_str(name),
            TypeHint::Union(members) => {
                f.write_str("Union[")?;
                write_args(f, members)?;
                f.write_str("]")
            }
            TypeHint::Generic { base, args } => {
                write!(f, "{}[", base)?;
                write_args(f, args)?;
                f.write_str("]")
            }
        }
    }
}

impl From<ValueKind> for TypeHint {
    fn from(kind: ValueKind) -> Self {
        TypeHint::Concrete(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_of_hint_kinds() {
        assert_eq!(TypeHint::int().kind(), HintKind::Concrete);
        assert_eq!(TypeHint::named("Path").kind(), HintKind::Concrete);
        assert_eq!(
            TypeHint::union([TypeHint::int(), TypeHint::float()]).kind(),
            HintKind::Union
        );
        assert_eq!(
            TypeHint::generic("list", [TypeHint::int()]).kind(),
            HintKind::Parametric
        );
        assert!(!TypeHint::str().is_composite());
        assert!(TypeHint::optional(TypeHint::int()).is_composite());
    }

    #[test]
    fn display_matches_annotation_syntax() {
        assert_eq!(TypeHint::float().to_string(), "float");
        assert_eq!(
            TypeHint::union([TypeHint::int(), TypeHint::float()]).to_string(),
            "Union[int, float]"
        );
        assert_eq!(
            TypeHint::generic("Mapping", [TypeHint::str(), TypeHint::optional(TypeHint::int())])
                .to_string(),
            "Mapping[str, Union[int, None]]"
        );
    }

    #[test]
    fn serde_roundtrip_generic_hint() {
        let hint = TypeHint::generic("list", [TypeHint::named("Point")]);
        let json = serde_json::to_string(&hint).unwrap();
        let back: TypeHint = serde_json::from_str(&json).unwrap();
        assert_eq!(hint, back);
    }
}

//! Formal signatures and the parameter-binding resolver.
//!
//! A [`Signature`] is the explicit registration of a callable's formal
//! parameters: name, kind, annotation, default. [`BindingContext`] is the
//! normalized view built from it once at wrap time: which specification
//! applies to which position and which name, and which parameters have
//! defaults. The context is read-only afterwards and shared by every call.

pub mod args;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use hintexec_core::{Flow, TypeHint, Value};

use crate::spec::{Assert, Modify, Sequence, Spec};

/// Key under which the return annotation is recorded.
pub const RETURN_KEY: &str = "return";

/// Identity of a wrapped callable, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub qualname: String,
    pub module: String,
}

impl FunctionInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        FunctionInfo {
            qualname: name.clone(),
            name,
            module: String::new(),
        }
    }
}

impl fmt::Display for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            f.write_str(&self.qualname)
        } else {
            write!(f, "{}.{}", self.module, self.qualname)
        }
    }
}

/// How a formal parameter may be supplied.
///
/// Variants are listed in the only order they may appear in a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    /// Only by position (`a, /`).
    PositionalOnly,
    /// By position or by keyword.
    PositionalOrKeyword,
    /// Collects surplus positional arguments (`*rest`).
    VarPositional,
    /// Only by keyword (after `*` or `*rest`).
    KeywordOnly,
    /// Collects surplus keyword arguments (`**extra`).
    VarKeyword,
}

impl ParamKind {
    pub fn accepts_position(self) -> bool {
        matches!(self, ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
    }

    pub fn accepts_keyword(self) -> bool {
        matches!(self, ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly)
    }

    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// What a parameter (or the return value) is annotated with.
#[derive(Debug, Clone)]
pub enum Annotation {
    /// A plain type hint: passed through, never enforced.
    Hint(TypeHint),
    /// A pipeline the engine runs on every call.
    Spec(Spec),
}

impl Annotation {
    /// The plain type hint this annotation stands for, if any.
    pub fn typehint(&self) -> Option<&TypeHint> {
        match self {
            Annotation::Hint(hint) => Some(hint),
            Annotation::Spec(spec) => spec.typehint(),
        }
    }

    pub fn as_spec(&self) -> Option<&Spec> {
        match self {
            Annotation::Spec(spec) => Some(spec),
            Annotation::Hint(_) => None,
        }
    }
}

impl From<TypeHint> for Annotation {
    fn from(hint: TypeHint) -> Self {
        Annotation::Hint(hint)
    }
}

impl From<Spec> for Annotation {
    fn from(spec: Spec) -> Self {
        Annotation::Spec(spec)
    }
}

impl From<Assert> for Annotation {
    fn from(a: Assert) -> Self {
        Annotation::Spec(Spec::Assert(a))
    }
}

impl From<Modify> for Annotation {
    fn from(m: Modify) -> Self {
        Annotation::Spec(Spec::Modify(m))
    }
}

impl From<Sequence> for Annotation {
    fn from(s: Sequence) -> Self {
        Annotation::Spec(Spec::Sequence(s))
    }
}

/// Declared annotations keyed by parameter name (or [`RETURN_KEY`]), in
/// declaration order.
pub type Annotations = IndexMap<String, Annotation>;

/// One formal parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub annotation: Option<Annotation>,
    /// `Flow::Return` marks an early-return default.
    pub default: Option<Flow>,
}

impl Param {
    fn with_kind(name: impl Into<String>, kind: ParamKind) -> Self {
        Param {
            name: name.into(),
            kind,
            annotation: None,
            default: None,
        }
    }

    /// A positional-or-keyword parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Param::with_kind(name, ParamKind::PositionalOrKeyword)
    }

    pub fn positional_only(name: impl Into<String>) -> Self {
        Param::with_kind(name, ParamKind::PositionalOnly)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Param::with_kind(name, ParamKind::KeywordOnly)
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Param::with_kind(name, ParamKind::VarPositional)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Param::with_kind(name, ParamKind::VarKeyword)
    }

    pub fn annotate(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// A default used when the caller omits the parameter.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(Flow::Continue(value.into()));
        self
    }

    /// An early-return default: omitting the parameter ends the call with
    /// `value` without running the body.
    pub fn default_return(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(Flow::Return(value.into()));
        self
    }
}

/// The registered formal signature of a callable.
#[derive(Debug, Clone)]
pub struct Signature {
    pub info: FunctionInfo,
    pub params: Vec<Param>,
    pub returns: Option<Annotation>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            info: FunctionInfo::new(name),
            params: Vec::new(),
            returns: None,
        }
    }

    pub fn qualname(mut self, qualname: impl Into<String>) -> Self {
        self.info.qualname = qualname.into();
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.info.module = module.into();
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, annotation: impl Into<Annotation>) -> Self {
        self.returns = Some(annotation.into());
        self
    }

    /// Declared annotations in declaration order, return last.
    ///
    /// Unannotated parameters are absent.
    pub fn annotations(&self) -> Annotations {
        let mut annotations: Annotations = self
            .params
            .iter()
            .filter_map(|p| p.annotation.clone().map(|a| (p.name.clone(), a)))
            .collect();
        if let Some(returns) = &self.returns {
            annotations.insert(RETURN_KEY.to_string(), returns.clone());
        }
        annotations
    }
}

/// A signature that cannot describe a real callable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("duplicate parameter '{name}' in {callable}")]
    DuplicateParameter { callable: String, name: String },

    #[error("parameter name '{name}' is reserved in {callable}")]
    ReservedName { callable: String, name: String },

    #[error("parameter '{name}' of kind {kind:?} is out of order in {callable}")]
    OutOfOrder {
        callable: String,
        name: String,
        kind: ParamKind,
    },

    #[error("more than one {kind:?} parameter in {callable}")]
    RepeatedVariadic { callable: String, kind: ParamKind },

    #[error("variadic parameter '{name}' cannot have a default in {callable}")]
    DefaultOnVariadic { callable: String, name: String },

    #[error("parameter '{name}' without a default follows a parameter with one in {callable}")]
    RequiredAfterDefault { callable: String, name: String },
}

/// Default of one formal parameter.
#[derive(Debug, Clone)]
pub struct DefaultSlot {
    pub name: String,
    pub position: usize,
    pub kind: ParamKind,
    pub value: Flow,
}

/// Normalized, call-independent view of a signature.
#[derive(Debug, Clone)]
pub struct BindingContext {
    info: FunctionInfo,
    names: Vec<String>,
    kinds: Vec<ParamKind>,
    /// name -> position, for parameters that accept a position.
    positions: HashMap<String, usize>,
    /// Defaults in declaration order.
    defaults: Vec<DefaultSlot>,
    positional_specs: BTreeMap<usize, Spec>,
    keyword_specs: HashMap<String, Spec>,
    return_spec: Option<Spec>,
    positional_count: usize,
    has_var_positional: bool,
    has_var_keyword: bool,
}

impl BindingContext {
    /// Validates `signature` and indexes its parameters.
    pub fn from_signature(signature: &Signature) -> Result<Self, SignatureError> {
        validate(signature)?;

        let mut context = BindingContext {
            info: signature.info.clone(),
            names: Vec::with_capacity(signature.params.len()),
            kinds: Vec::with_capacity(signature.params.len()),
            positions: HashMap::new(),
            defaults: Vec::new(),
            positional_specs: BTreeMap::new(),
            keyword_specs: HashMap::new(),
            return_spec: signature
                .returns
                .as_ref()
                .and_then(Annotation::as_spec)
                .cloned(),
            positional_count: 0,
            has_var_positional: false,
            has_var_keyword: false,
        };

        for (position, param) in signature.params.iter().enumerate() {
            context.names.push(param.name.clone());
            context.kinds.push(param.kind);

            match param.kind {
                ParamKind::VarPositional => context.has_var_positional = true,
                ParamKind::VarKeyword => context.has_var_keyword = true,
                kind if kind.accepts_position() => {
                    context.positions.insert(param.name.clone(), position);
                    context.positional_count += 1;
                }
                _ => {}
            }

            if let Some(default) = &param.default {
                context.defaults.push(DefaultSlot {
                    name: param.name.clone(),
                    position,
                    kind: param.kind,
                    value: default.clone(),
                });
            }

            // Plain hints pass straight through; only specs are indexed.
            let Some(spec) = param.annotation.as_ref().and_then(Annotation::as_spec) else {
                continue;
            };
            if param.kind.accepts_position() {
                context.positional_specs.insert(position, spec.clone());
            }
            if param.kind.accepts_keyword() {
                context.keyword_specs.insert(param.name.clone(), spec.clone());
            }
        }

        Ok(context)
    }

    pub fn info(&self) -> &FunctionInfo {
        &self.info
    }

    /// Formal parameter names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn kind_of(&self, position: usize) -> Option<ParamKind> {
        self.kinds.get(position).copied()
    }

    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// Position of a parameter that can be supplied positionally.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn defaults(&self) -> &[DefaultSlot] {
        &self.defaults
    }

    pub fn default_of(&self, name: &str) -> Option<&Flow> {
        self.defaults
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| &slot.value)
    }

    /// Specs indexed by position, in ascending position order.
    pub fn positional_specs(&self) -> impl Iterator<Item = (usize, &Spec)> {
        self.positional_specs.iter().map(|(p, s)| (*p, s))
    }

    pub fn positional_spec(&self, position: usize) -> Option<&Spec> {
        self.positional_specs.get(&position)
    }

    pub fn keyword_spec(&self, name: &str) -> Option<&Spec> {
        self.keyword_specs.get(name)
    }

    pub fn return_spec(&self) -> Option<&Spec> {
        self.return_spec.as_ref()
    }

    /// Number of parameters that accept a position.
    pub fn positional_count(&self) -> usize {
        self.positional_count
    }

    pub fn has_var_positional(&self) -> bool {
        self.has_var_positional
    }

    pub fn has_var_keyword(&self) -> bool {
        self.has_var_keyword
    }
}

fn validate(signature: &Signature) -> Result<(), SignatureError> {
    let callable = signature.info.to_string();
    let mut seen = HashSet::new();
    let mut last_kind = ParamKind::PositionalOnly;
    let mut positional_default_seen = false;

    for param in &signature.params {
        if param.name == RETURN_KEY {
            return Err(SignatureError::ReservedName {
                callable,
                name: param.name.clone(),
            });
        }
        if !seen.insert(param.name.as_str()) {
            return Err(SignatureError::DuplicateParameter {
                callable,
                name: param.name.clone(),
            });
        }
        if param.kind < last_kind {
            return Err(SignatureError::OutOfOrder {
                callable,
                name: param.name.clone(),
                kind: param.kind,
            });
        }
        if param.kind == last_kind && param.kind.is_variadic() {
            return Err(SignatureError::RepeatedVariadic {
                callable,
                kind: param.kind,
            });
        }
        last_kind = param.kind;

        if param.kind.is_variadic() && param.default.is_some() {
            return Err(SignatureError::DefaultOnVariadic {
                callable,
                name: param.name.clone(),
            });
        }
        if param.kind.accepts_position() {
            if param.default.is_some() {
                positional_default_seen = true;
            } else if positional_default_seen {
                return Err(SignatureError::RequiredAfterDefault {
                    callable,
                    name: param.name.clone(),
                });
            }
        }
    }

    Ok(())
}

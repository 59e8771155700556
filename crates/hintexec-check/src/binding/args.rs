//! Call-time arguments and their binding to formal parameters.
//!
//! [`CallArgs`] is what a caller passes: positional values and keyword
//! values, exactly as supplied. After the pipelines have run, the engine
//! binds the effective arguments to the formal parameters and hands the
//! body a [`Bound`] view.

use indexmap::IndexMap;

use hintexec_core::Value;

use super::{BindingContext, ParamKind};
use crate::engine::error::EnforceError;

/// Arguments of one call, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        CallArgs::default()
    }

    /// Only positional arguments.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        CallArgs {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: IndexMap::new(),
        }
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument. A repeated name keeps the last value.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional_values(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword_values(&self) -> &IndexMap<String, Value> {
        &self.keyword
    }

    pub fn into_parts(self) -> (Vec<Value>, IndexMap<String, Value>) {
        (self.positional, self.keyword)
    }
}

/// Lookup of a name the signature does not declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no parameter named '{0}'")]
pub struct UnknownParameter(pub String);

/// Arguments bound to formal parameters, as the function body sees them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bound {
    values: IndexMap<String, Value>,
    rest: Vec<Value>,
    extra: IndexMap<String, Value>,
}

impl Bound {
    /// Value of a named (non-variadic) parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Like [`get`](Self::get), for use with `?` inside a body.
    pub fn arg(&self, name: &str) -> Result<&Value, UnknownParameter> {
        self.values
            .get(name)
            .ok_or_else(|| UnknownParameter(name.to_string()))
    }

    /// Surplus positional values collected by `*rest`.
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Surplus keyword values collected by `**extra`.
    pub fn extra_keywords(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// Named parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl BindingContext {
    /// Binds effective arguments to the formal parameters.
    ///
    /// Fails the way a direct call with the same arguments would: missing
    /// required parameters, a value given twice, unknown keywords, or too
    /// many positionals.
    pub fn bind(
        &self,
        positional: &[Value],
        keyword: &IndexMap<String, Value>,
    ) -> Result<Bound, EnforceError> {
        let mut keyword = keyword.clone();
        let mut supplied = positional.iter();
        let mut bound = Bound::default();

        for (name, kind) in self.names.iter().zip(&self.kinds) {
            match kind {
                ParamKind::PositionalOnly => {
                    let value = supplied.next().ok_or_else(|| self.missing(name))?;
                    bound.values.insert(name.clone(), value.clone());
                }
                ParamKind::PositionalOrKeyword => match supplied.next() {
                    Some(value) => {
                        if keyword.contains_key(name) {
                            return Err(EnforceError::DuplicateArgument {
                                callable: self.info.clone(),
                                parameter: name.clone(),
                            });
                        }
                        bound.values.insert(name.clone(), value.clone());
                    }
                    None => {
                        let value = keyword
                            .shift_remove(name)
                            .ok_or_else(|| self.missing(name))?;
                        bound.values.insert(name.clone(), value);
                    }
                },
                ParamKind::VarPositional => {
                    bound.rest = supplied.by_ref().cloned().collect();
                }
                ParamKind::KeywordOnly => {
                    let value = keyword
                        .shift_remove(name)
                        .ok_or_else(|| self.missing(name))?;
                    bound.values.insert(name.clone(), value);
                }
                ParamKind::VarKeyword => {}
            }
        }

        if supplied.next().is_some() {
            return Err(EnforceError::TooManyPositional {
                callable: self.info.clone(),
                expected: self.positional_count,
                got: positional.len(),
            });
        }

        if self.has_var_keyword {
            bound.extra = keyword;
        } else if let Some(name) = keyword.keys().next() {
            return Err(EnforceError::UnexpectedKeyword {
                callable: self.info.clone(),
                name: name.clone(),
            });
        }

        Ok(bound)
    }

    fn missing(&self, name: &str) -> EnforceError {
        EnforceError::MissingArgument {
            callable: self.info.clone(),
            parameter: name.to_string(),
        }
    }
}

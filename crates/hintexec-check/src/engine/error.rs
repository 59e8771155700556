//! Errors raised while enforcing a call.
//!
//! Validation and sibling-resolution failures carry enough context to say
//! which callable, which step and which parameter were involved. Errors
//! raised by user code travel through [`EnforceError::Raised`] untouched.

use serde::{Deserialize, Serialize};

use hintexec_core::{Raised, Value};

use crate::binding::FunctionInfo;

#[derive(Debug, thiserror::Error)]
pub enum EnforceError {
    /// A predicate returned `false`.
    #[error(
        "check failed in {callable}: predicate '{predicate}' rejected parameter '{parameter}' with value {value}"
    )]
    ValidationFailed {
        callable: FunctionInfo,
        predicate: String,
        parameter: String,
        value: Value,
    },

    /// A predicate or hook asked for a sibling parameter the call does not have.
    #[error("cannot resolve parameter '{name}' requested by '{step}' in {callable}")]
    UnresolvedSibling {
        callable: FunctionInfo,
        step: String,
        name: String,
    },

    #[error("{callable} missing required argument '{parameter}'")]
    MissingArgument {
        callable: FunctionInfo,
        parameter: String,
    },

    #[error("{callable} got multiple values for argument '{parameter}'")]
    DuplicateArgument {
        callable: FunctionInfo,
        parameter: String,
    },

    #[error("{callable} got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { callable: FunctionInfo, name: String },

    #[error("{callable} takes {expected} positional argument(s) but {got} were given")]
    TooManyPositional {
        callable: FunctionInfo,
        expected: usize,
        got: usize,
    },

    /// An error raised by a predicate, a hook or the function body.
    #[error(transparent)]
    Raised(#[from] Raised),
}

/// Machine-readable summary of a failed check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub callable: FunctionInfo,
    pub predicate: String,
    pub parameter: String,
    pub value: Value,
}

impl EnforceError {
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, EnforceError::ValidationFailed { .. })
    }

    /// The failed check, for [`ValidationFailed`](Self::ValidationFailed) only.
    pub fn violation(&self) -> Option<Violation> {
        match self {
            EnforceError::ValidationFailed {
                callable,
                predicate,
                parameter,
                value,
            } => Some(Violation {
                callable: callable.clone(),
                predicate: predicate.clone(),
                parameter: parameter.clone(),
                value: value.clone(),
            }),
            _ => None,
        }
    }

    /// The user error, for [`Raised`](Self::Raised) only.
    pub fn raised(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            EnforceError::Raised(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> EnforceError {
        EnforceError::ValidationFailed {
            callable: FunctionInfo {
                name: "div".into(),
                qualname: "div".into(),
                module: "calc".into(),
            },
            predicate: "b != 0".into(),
            parameter: "b".into(),
            value: Value::Int(0),
        }
    }

    #[test]
    fn validation_failure_message() {
        insta::assert_snapshot!(
            failure().to_string(),
            @"check failed in calc.div: predicate 'b != 0' rejected parameter 'b' with value 0"
        );
    }

    #[test]
    fn violation_serializes_for_consumers() {
        let violation = failure().violation().unwrap();
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["predicate"], "b != 0");
        assert_eq!(json["callable"]["module"], "calc");
        assert_eq!(json["value"], serde_json::json!({ "Int": 0 }));
    }

    #[test]
    fn raised_errors_are_transparent() {
        let err = EnforceError::from(Raised::from("hook failed"));
        assert_eq!(err.to_string(), "hook failed");
        assert!(!err.is_validation_failure());
        assert!(err.violation().is_none());
        assert_eq!(err.raised().unwrap().to_string(), "hook failed");
    }
}

//! Explicit continue/return control for pipeline stages.
//!
//! Every hook and every pipeline stage produces a [`Flow`]. `Continue`
//! carries the (possibly replaced) value on to the next stage; `Return`
//! ends the whole call and its payload becomes the call's result.

use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Flow {
    /// Keep going with this value.
    Continue(Value),
    /// Stop the call and return this value.
    Return(Value),
}

impl Flow {
    pub fn is_return(&self) -> bool {
        matches!(self, Flow::Return(_))
    }

    /// The carried value, regardless of direction.
    pub fn value(&self) -> &Value {
        match self {
            Flow::Continue(v) | Flow::Return(v) => v,
        }
    }

    /// Unwraps the carried value, regardless of direction.
    pub fn into_value(self) -> Value {
        match self {
            Flow::Continue(v) | Flow::Return(v) => v,
        }
    }
}

impl From<Value> for Flow {
    fn from(v: Value) -> Self {
        Flow::Continue(v)
    }
}

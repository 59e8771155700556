//! The call wrapper.
//!
//! [`enforce`] turns a [`Signature`] and a body into an [`Enforced`]
//! callable. Every call goes through the same steps:
//!
//! 1. Omitted parameters get their defaults. An early-return default ends
//!    the call right there, without running the body.
//! 2. Positional arguments run the pipeline indexed at their position.
//! 3. Keyword arguments run the pipeline indexed under their name, in
//!    declaration order whatever order the caller used.
//! 4. The effective arguments are bound to the formal parameters and the
//!    body runs.
//! 5. The result runs the return pipeline.
//!
//! A [`Flow::Return`] from any pipeline ends the call with its payload.
//! The [`BindingContext`] is built once and shared, so an `Enforced` can be
//! cloned and called from many threads at once.

pub mod error;
mod pipeline;
pub mod trace;

use std::sync::Arc;

use hintexec_core::{Flow, Raised, Value};

use crate::binding::args::{Bound, CallArgs};
use crate::binding::{
    Annotation, Annotations, BindingContext, FunctionInfo, ParamKind, Signature, SignatureError,
    RETURN_KEY,
};
use error::EnforceError;
use pipeline::Pipeline;
use trace::TraceEntry;

type Body = dyn Fn(&Bound) -> Result<Value, Raised> + Send + Sync;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EnforceConfig {
    /// Whether [`Enforced::call_traced`] records execution traces.
    pub trace_enabled: bool,
    /// Whether the return pipeline runs. Default: `true`.
    pub enforce_returns: bool,
}

impl Default for EnforceConfig {
    fn default() -> Self {
        EnforceConfig {
            trace_enabled: false,
            enforce_returns: true,
        }
    }
}

/// Result of [`Enforced::call_traced`].
#[derive(Debug)]
pub struct TracedCall {
    pub result: Result<Value, EnforceError>,
    /// `None` when tracing is disabled.
    pub trace: Option<Vec<TraceEntry>>,
}

/// A function body wrapped with its parameter pipelines.
#[derive(Clone)]
pub struct Enforced {
    context: Arc<BindingContext>,
    body: Arc<Body>,
    pub(crate) annotations: Annotations,
    config: EnforceConfig,
}

/// Wraps `body` so that every call enforces the pipelines of `signature`.
///
/// The signature is validated and indexed here, once.
pub fn enforce<F>(signature: Signature, body: F) -> Result<Enforced, SignatureError>
where
    F: Fn(&Bound) -> Result<Value, Raised> + Send + Sync + 'static,
{
    let context = BindingContext::from_signature(&signature)?;
    let annotations = signature.annotations();
    tracing::debug!(
        callable = %context.info(),
        params = context.names().len(),
        annotated = annotations.len(),
        "wrapped callable"
    );

    Ok(Enforced {
        context: Arc::new(context),
        body: Arc::new(body),
        annotations,
        config: EnforceConfig::default(),
    })
}

impl Enforced {
    pub fn with_config(mut self, config: EnforceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EnforceConfig {
        &self.config
    }

    pub fn info(&self) -> &FunctionInfo {
        self.context.info()
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn qualname(&self) -> &str {
        &self.info().qualname
    }

    pub fn module(&self) -> &str {
        &self.info().module
    }

    pub fn context(&self) -> &BindingContext {
        &self.context
    }

    /// Externally visible annotations, parameter name (or `return`) to
    /// annotation, in declaration order.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// The annotations as JSON: hints render as their annotation text,
    /// specifications as a small descriptor object.
    pub fn annotations_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .annotations
            .iter()
            .map(|(name, annotation)| {
                let value = match annotation {
                    Annotation::Hint(hint) => serde_json::Value::String(hint.to_string()),
                    Annotation::Spec(spec) => serde_json::json!({
                        "spec": spec.kind_name(),
                        "typehint": spec.typehint().map(ToString::to_string),
                        "steps": spec.step_count(),
                    }),
                };
                (name.clone(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }

    /// Calls the wrapped function.
    pub fn call(&self, args: CallArgs) -> Result<Value, EnforceError> {
        self.execute(args, None)
    }

    /// Calls the wrapped function, recording a trace when enabled.
    pub fn call_traced(&self, args: CallArgs) -> TracedCall {
        if !self.config.trace_enabled {
            return TracedCall {
                result: self.execute(args, None),
                trace: None,
            };
        }
        let mut trace = Vec::new();
        let result = self.execute(args, Some(&mut trace));
        TracedCall {
            result,
            trace: Some(trace),
        }
    }

    fn execute(
        &self,
        args: CallArgs,
        mut trace: Option<&mut Vec<TraceEntry>>,
    ) -> Result<Value, EnforceError> {
        let context = &*self.context;
        let (mut positional, mut keyword) = args.into_parts();

        // Defaults
        for slot in context.defaults() {
            let by_position = slot.kind.accepts_position() && slot.position < positional.len();
            if by_position || keyword.contains_key(&slot.name) {
                continue;
            }
            match &slot.value {
                Flow::Return(payload) => {
                    tracing::debug!(
                        callable = %context.info(),
                        parameter = %slot.name,
                        "early return from default"
                    );
                    return Ok(payload.clone());
                }
                Flow::Continue(value) if slot.kind == ParamKind::PositionalOnly => {
                    // Only when it lands on its own slot; otherwise an earlier
                    // positional is missing and binding reports it.
                    if positional.len() == slot.position {
                        positional.push(value.clone());
                    }
                }
                Flow::Continue(value) => {
                    keyword.insert(slot.name.clone(), value.clone());
                }
            }
        }

        // Positional arguments
        for (position, spec) in context.positional_specs() {
            let Some(value) = positional.get(position).cloned() else {
                break;
            };
            let parameter = context.name_at(position).unwrap_or_default();
            let flow = Pipeline {
                context,
                parameter,
                positional: &positional,
                keyword: &keyword,
                trace: trace.as_deref_mut(),
            }
            .run(spec, value)?;
            match flow {
                Flow::Continue(value) => positional[position] = value,
                Flow::Return(payload) => return Ok(self.early_return(parameter, payload)),
            }
        }

        // Keyword arguments, in declaration order
        for name in context.names() {
            let Some(spec) = context.keyword_spec(name) else {
                continue;
            };
            let Some(value) = keyword.get(name).cloned() else {
                continue;
            };
            let flow = Pipeline {
                context,
                parameter: name,
                positional: &positional,
                keyword: &keyword,
                trace: trace.as_deref_mut(),
            }
            .run(spec, value)?;
            match flow {
                Flow::Continue(value) => {
                    if let Some(slot) = keyword.get_mut(name) {
                        *slot = value;
                    }
                }
                Flow::Return(payload) => return Ok(self.early_return(name, payload)),
            }
        }

        // Body
        let bound = context.bind(&positional, &keyword)?;
        let result = (self.body)(&bound)?;

        // Return value
        let Some(spec) = context.return_spec().filter(|_| self.config.enforce_returns) else {
            return Ok(result);
        };
        let flow = Pipeline {
            context,
            parameter: RETURN_KEY,
            positional: &positional,
            keyword: &keyword,
            trace: trace.as_deref_mut(),
        }
        .run(spec, result)?;
        Ok(flow.into_value())
    }

    fn early_return(&self, parameter: &str, payload: Value) -> Value {
        tracing::debug!(callable = %self.info(), parameter, "early return from pipeline");
        payload
    }
}

impl std::fmt::Debug for Enforced {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enforced")
            .field("info", self.info())
            .field("annotations", &self.annotations.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

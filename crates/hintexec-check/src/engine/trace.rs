//! Execution trace recording for enforced calls.
//!
//! When tracing is enabled via [`EnforceConfig::trace_enabled`], the engine
//! records a [`TraceEntry`] for every predicate and hook it runs, capturing
//! the parameter, the step's name, the input value and what the step did.
//!
//! [`EnforceConfig::trace_enabled`]: super::EnforceConfig::trace_enabled

use serde::{Deserialize, Serialize};

use hintexec_core::Value;

/// What a single step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// A predicate held.
    Passed,
    /// A predicate did not hold.
    Failed,
    /// A hook produced the value for the next step.
    Continued(Value),
    /// A hook ended the call with this payload.
    Returned(Value),
}

/// A single entry in the execution trace, recording one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Parameter name, or `return` for the return pipeline.
    pub parameter: String,
    /// Name of the predicate or hook.
    pub step: String,
    /// Value the step was invoked with.
    pub input: Value,
    pub outcome: StepOutcome,
}

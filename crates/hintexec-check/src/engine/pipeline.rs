//! Runs one specification against one bound value.
//!
//! Assertions check, hooks rewrite, sequences thread the value through
//! their steps. A [`Flow::Return`] from any hook stops everything after it
//! and is handed back to the engine unchanged.

use indexmap::IndexMap;
use smallvec::SmallVec;

use hintexec_core::{Flow, Value};

use crate::binding::BindingContext;
use crate::engine::error::EnforceError;
use crate::engine::trace::{StepOutcome, TraceEntry};
use crate::spec::{Assert, Modify, Sequence, Spec};

type Siblings = SmallVec<[Value; 4]>;

/// Per-parameter view of the current call.
pub(crate) struct Pipeline<'a> {
    pub context: &'a BindingContext,
    pub parameter: &'a str,
    pub positional: &'a [Value],
    pub keyword: &'a IndexMap<String, Value>,
    pub trace: Option<&'a mut Vec<TraceEntry>>,
}

impl Pipeline<'_> {
    pub fn run(&mut self, spec: &Spec, value: Value) -> Result<Flow, EnforceError> {
        match spec {
            Spec::Assert(assert) => self.run_assert(assert, value),
            Spec::Modify(modify) => self.run_modify(modify, value),
            Spec::Sequence(sequence) => self.run_sequence(sequence, value),
        }
    }

    fn run_assert(&mut self, assert: &Assert, value: Value) -> Result<Flow, EnforceError> {
        let Some(predicates) = assert.predicates() else {
            return Ok(Flow::Continue(value));
        };
        // Absent values are not checked.
        if value.is_none() {
            return Ok(Flow::Continue(value));
        }

        for predicate in predicates {
            let siblings = self.resolve_siblings(predicate.siblings(), predicate.name())?;
            let passed = predicate.call(&value, &siblings)?;
            let outcome = if passed {
                StepOutcome::Passed
            } else {
                StepOutcome::Failed
            };
            self.record(predicate.name(), &value, outcome);

            if !passed {
                tracing::debug!(
                    callable = %self.context.info(),
                    parameter = self.parameter,
                    predicate = predicate.name(),
                    "check failed"
                );
                return Err(EnforceError::ValidationFailed {
                    callable: self.context.info().clone(),
                    predicate: predicate.name().to_string(),
                    parameter: self.parameter.to_string(),
                    value,
                });
            }
        }

        Ok(Flow::Continue(value))
    }

    fn run_modify(&mut self, modify: &Modify, value: Value) -> Result<Flow, EnforceError> {
        let Some(hooks) = modify.hooks() else {
            return Ok(Flow::Continue(value));
        };

        let mut value = value;
        for hook in hooks {
            let siblings = self.resolve_siblings(hook.siblings(), hook.name())?;
            let input = self.trace.is_some().then(|| value.clone());
            let flow = hook.call(value, &siblings)?;
            if let Some(input) = input {
                let outcome = match &flow {
                    Flow::Continue(v) => StepOutcome::Continued(v.clone()),
                    Flow::Return(v) => StepOutcome::Returned(v.clone()),
                };
                self.record(hook.name(), &input, outcome);
            }

            match flow {
                Flow::Continue(next) => value = next,
                Flow::Return(payload) => return Ok(Flow::Return(payload)),
            }
        }

        Ok(Flow::Continue(value))
    }

    fn run_sequence(&mut self, sequence: &Sequence, value: Value) -> Result<Flow, EnforceError> {
        let Some(steps) = sequence.steps() else {
            return Ok(Flow::Continue(value));
        };

        let mut value = value;
        for step in steps {
            match self.run(step, value)? {
                Flow::Continue(next) => value = next,
                ret @ Flow::Return(_) => return Ok(ret),
            }
        }

        Ok(Flow::Continue(value))
    }

    /// Looks siblings up in the call's keyword arguments, then its positional
    /// arguments, then the recorded defaults.
    fn resolve_siblings(&self, names: &[String], step: &str) -> Result<Siblings, EnforceError> {
        names
            .iter()
            .map(|name| {
                self.resolve(name)
                    .cloned()
                    .ok_or_else(|| EnforceError::UnresolvedSibling {
                        callable: self.context.info().clone(),
                        step: step.to_string(),
                        name: name.clone(),
                    })
            })
            .collect()
    }

    fn resolve(&self, name: &str) -> Option<&Value> {
        self.keyword
            .get(name)
            .or_else(|| {
                self.context
                    .position_of(name)
                    .and_then(|position| self.positional.get(position))
            })
            .or_else(|| self.context.default_of(name).map(Flow::value))
    }

    fn record(&mut self, step: &str, input: &Value, outcome: StepOutcome) {
        tracing::trace!(parameter = self.parameter, step, ?outcome, "step");
        if let Some(trace) = self.trace.as_deref_mut() {
            trace.push(TraceEntry {
                parameter: self.parameter.to_string(),
                step: step.to_string(),
                input: input.clone(),
                outcome,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Param, Signature};
    use crate::spec::{Hook, Predicate};
    use crate::{checks, modify, sequence};

    fn context() -> BindingContext {
        let sig = Signature::new("f")
            .param(Param::new("a"))
            .param(Param::new("b").default(10))
            .param(Param::keyword_only("k").default(100));
        BindingContext::from_signature(&sig).unwrap()
    }

    fn run(spec: impl Into<Spec>, value: Value, positional: &[Value]) -> Result<Flow, EnforceError> {
        let ctx = context();
        let keyword = IndexMap::from([("k".to_string(), Value::Int(7))]);
        let mut pipeline = Pipeline {
            context: &ctx,
            parameter: "a",
            positional,
            keyword: &keyword,
            trace: None,
        };
        pipeline.run(&spec.into(), value)
    }

    #[test]
    fn first_failing_predicate_is_reported() {
        let spec = checks![
            Predicate::new("always", |_| true),
            Predicate::new("first", |_| false),
            Predicate::new("second", |_| false),
        ];
        let err = run(spec, Value::Int(1), &[]).unwrap_err();
        assert_eq!(err.violation().unwrap().predicate, "first");
    }

    #[test]
    fn none_skips_assertions_but_not_hooks() {
        let reject = checks![Predicate::new("reject", |_| false)];
        assert_eq!(run(reject, Value::None, &[]).unwrap(), Flow::Continue(Value::None));

        let fill = modify![Hook::map("fill", |v| if v.is_none() { Value::Int(1) } else { v })];
        assert_eq!(run(fill, Value::None, &[]).unwrap(), Flow::Continue(Value::Int(1)));
    }

    #[test]
    fn siblings_resolve_keyword_then_positional_then_default() {
        let sum = |names: &'static [&'static str]| {
            modify![Hook::with_siblings("sum", names.iter().copied(), |v, sib| {
                let total = sib.iter().chain([&v]).filter_map(Value::as_int).sum::<i64>();
                Ok(Flow::Continue(Value::Int(total)))
            })]
        };

        // k comes from keywords, a from positionals, b from its default.
        let flow = run(sum(&["k", "a", "b"]), Value::Int(1), &[Value::Int(2)]).unwrap();
        assert_eq!(flow, Flow::Continue(Value::Int(1 + 7 + 2 + 10)));

        let err = run(sum(&["missing"]), Value::Int(1), &[]).unwrap_err();
        assert!(matches!(
            err,
            EnforceError::UnresolvedSibling { ref name, ref step, .. } if name == "missing" && step == "sum"
        ));
    }

    #[test]
    fn return_inside_sequence_skips_later_steps() {
        let spec = sequence![
            modify![Hook::new("stop", |v| Ok(Flow::Return(v)))],
            checks![Predicate::new("never runs", |_| false)],
        ];
        assert_eq!(run(spec, Value::Int(0), &[]).unwrap(), Flow::Return(Value::Int(0)));
    }

    #[test]
    fn trace_records_each_step() {
        let ctx = context();
        let keyword = IndexMap::new();
        let mut trace = Vec::new();
        let mut pipeline = Pipeline {
            context: &ctx,
            parameter: "a",
            positional: &[],
            keyword: &keyword,
            trace: Some(&mut trace),
        };
        let spec = sequence![
            checks![Predicate::new("positive", |v| v > &Value::Int(0))],
            modify![Hook::map("double", |v| Value::Int(v.as_int().unwrap_or(0) * 2))],
        ];
        pipeline.run(&spec.into(), Value::Int(3)).unwrap();

        let steps: Vec<_> = trace.iter().map(|e| (e.step.as_str(), &e.outcome)).collect();
        assert_eq!(
            steps,
            vec![
                ("positive", &StepOutcome::Passed),
                ("double", &StepOutcome::Continued(Value::Int(6))),
            ]
        );
        assert_eq!(trace[1].input, Value::Int(3));
    }
}

//! Step-transformer pipeline.
//!
//! A pipeline is an ordered list of named steps resolved against a step table
//! once, at construction. Running it threads a [`Payload`] through the steps:
//!
//! - a step returning `None` aborts the run with [`PipelineError::StepFailed`]
//!   naming that step;
//! - a step returning an empty payload ends the run early with that payload;
//! - anything else feeds the next step.

pub mod resource;
pub mod response;

use crate::error::PipelineError;
use serde_json::Value;

/// Value carried between steps.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Tag text, possibly partly rewritten.
    Text(String),
    /// Decoded JSON.
    Json(Value),
}

impl Payload {
    /// Empty-but-present: short-circuits the pipeline successfully.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Text(s) => s.is_empty(),
            Payload::Json(Value::String(s)) => s.is_empty(),
            Payload::Json(Value::Array(a)) => a.is_empty(),
            Payload::Json(Value::Object(o)) => o.is_empty(),
            Payload::Json(_) => false,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }
}

/// One transformation. `None` means the content could not be transformed.
pub type Step = fn(Payload) -> Option<Payload>;

/// An ordered, validated chain of steps.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: &'static str,
    steps: Vec<(&'static str, Step)>,
}

impl Pipeline {
    /// Resolve `order` against `table`. Every ordered name must be registered.
    pub fn new(
        name: &'static str,
        order: &[&'static str],
        table: &[(&'static str, Step)],
    ) -> Result<Self, PipelineError> {
        let steps = order
            .iter()
            .map(|&step| {
                table
                    .iter()
                    .find(|(registered, _)| *registered == step)
                    .map(|&(_, f)| (step, f))
                    .ok_or(PipelineError::UnknownStep {
                        pipeline: name,
                        step,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pipeline { name, steps })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|(name, _)| *name)
    }

    /// Run the pipeline over raw tag content.
    pub fn run(&self, content: &str) -> Result<Payload, PipelineError> {
        let mut payload = Payload::Text(content.to_string());

        for &(step, f) in &self.steps {
            payload = f(payload).ok_or(PipelineError::StepFailed {
                pipeline: self.name,
                step,
            })?;

            if payload.is_empty() {
                return Ok(payload);
            }
        }

        Ok(payload)
    }
}

/// Lift a text-to-text function into a [`Step`] body.
pub(crate) fn text_step(payload: Payload, f: impl FnOnce(&str) -> String) -> Option<Payload> {
    payload.into_text().map(|s| Payload::Text(f(&s)))
}

/// JSON-decode the text payload. Invalid JSON and a bare `null` yield `None`.
pub(crate) fn decode(payload: Payload) -> Option<Payload> {
    let text = payload.into_text()?;
    serde_json::from_str::<Value>(&text)
        .ok()
        .filter(|v| !v.is_null())
        .map(Payload::Json)
}

//! `@response` shorthand parser.
//!
//! Rewrites the compact response grammar into JSON and decodes it:
//!
//! ```text
//! int[]                         -> [{"$ref": "int"}]
//! { year :: int }               -> {"year": {"$ref": "int"}}
//! [ :: { id :: int } ]          -> [{"$ref": {"id": {"$ref": "int"}}}]
//! { nested: { array: [] } }     -> {"nested": {"array": []}}
//! ```
//!
//! Everything inside double quotes is left as written.

use super::{decode, text_step, Payload, Pipeline, Step};
use crate::error::{DocError, PipelineError};
use crate::quote::replace_unquoted;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_SHORT_ARRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\[\]").unwrap());

// Single or double colon; double colons are handed back untouched.
static RE_KEY_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)\s*(::?)").unwrap());

static RE_VAR_OF_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*::\s*(\w+)").unwrap());

static RE_REPEATED_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::\s*\{(.*)\}").unwrap());

static RE_TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*::\s*(\w+)").unwrap());

// -- Pipeline -----------------------------------------------------------------

const STEP_ORDER: &[&str] = &[
    "newlines",
    "shortArray",
    "keyNames",
    "varsOfType",
    "repeatedObject",
    "types",
    "decode",
];

const STEPS: &[(&str, Step)] = &[
    ("newlines", newlines),
    ("shortArray", short_array),
    ("keyNames", key_names),
    ("varsOfType", vars_of_type),
    ("repeatedObject", repeated_object),
    ("types", types),
    ("decode", decode),
];

static PIPELINE: LazyLock<Pipeline> =
    LazyLock::new(|| Pipeline::new("response", STEP_ORDER, STEPS).unwrap());

/// The response pipeline, built once.
pub fn pipeline() -> &'static Pipeline {
    &PIPELINE
}

/// Parse one `@response` tag body.
///
/// `Ok(None)` when the tag has no content, so there is no body to document.
pub fn parse(content: &str) -> Result<Option<Value>, DocError> {
    let payload = PIPELINE.run(content).map_err(|e| match e {
        PipelineError::StepFailed { step, .. } | PipelineError::UnknownStep { step, .. } => {
            DocError::UnresolvedShorthand {
                step,
                content: content.trim().to_string(),
            }
        }
    })?;

    if payload.is_empty() {
        return Ok(None);
    }
    Ok(payload.into_json())
}

// -- Steps --------------------------------------------------------------------

/// Collapse whitespace runs (newlines included) and trim.
///
/// Not quote-aware: a raw newline inside a JSON string would fail decoding
/// anyway.
fn newlines(p: Payload) -> Option<Payload> {
    text_step(p, collapse_whitespace)
}

/// `TYPE[]` -> `[ :: TYPE ]`
fn short_array(p: Payload) -> Option<Payload> {
    text_step(p, |s| replace_unquoted(&RE_SHORT_ARRAY, s, "[ :: $1 ]"))
}

/// `name:` -> `"name":`
fn key_names(p: Payload) -> Option<Payload> {
    text_step(p, |s| {
        replace_unquoted(&RE_KEY_NAME, s, |caps: &Captures| {
            if &caps[2] == "::" {
                caps[0].to_string()
            } else {
                format!("\"{}\":", &caps[1])
            }
        })
    })
}

/// `name :: Type` -> `"name": {"$ref": "Type"}`
fn vars_of_type(p: Payload) -> Option<Payload> {
    text_step(p, |s| {
        replace_unquoted(&RE_VAR_OF_TYPE, s, r#""$1": {"$$ref": "$2"}"#)
    })
}

/// `:: { ... }` -> `{"$ref": { ... }}`
fn repeated_object(p: Payload) -> Option<Payload> {
    text_step(p, |s| {
        replace_unquoted(&RE_REPEATED_OBJECT, s, r#"{"$$ref": {${1}}}"#)
    })
}

/// `:: Type` -> `{"$ref": "Type"}`
fn types(p: Payload) -> Option<Payload> {
    text_step(p, |s| replace_unquoted(&RE_TYPE, s, r#"{"$$ref": "$1"}"#))
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

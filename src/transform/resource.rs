//! `@resource` tag parser: scalar-or-list content to an ordered list of names.
//!
//! ```text
//! Some resource                        -> ["Some resource"]
//! "Quoted"                             -> ["Quoted"]
//! "General", "Sub-category", "Last"    -> ["General", "Sub-category", "Last"]
//! ```

use super::{decode, text_step, Payload, Pipeline, Step};
use crate::error::DocError;
use serde_json::Value;
use std::sync::LazyLock;

const STEP_ORDER: &[&str] = &["wrapInQuotes", "wrapInArrayBrackets", "decode"];

const STEPS: &[(&str, Step)] = &[
    ("wrapInQuotes", wrap_in_quotes),
    ("wrapInArrayBrackets", wrap_in_array_brackets),
    ("decode", decode_strings),
];

static PIPELINE: LazyLock<Pipeline> =
    LazyLock::new(|| Pipeline::new("resource", STEP_ORDER, STEPS).unwrap());

/// Parse the content of a `@resource` tag. Empty content is an error.
pub fn parse(content: &str) -> Result<Vec<String>, DocError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DocError::invalid_tag("resource", "resource name not specified"));
    }

    let payload = PIPELINE
        .run(content)
        .map_err(|e| DocError::invalid_tag("resource", e.to_string()))?;

    let Some(Value::Array(items)) = payload.into_json() else {
        return Err(DocError::invalid_tag("resource", "expected a list of names"));
    };

    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// Quote and escape content that is not already a quoted string.
fn wrap_in_quotes(p: Payload) -> Option<Payload> {
    text_step(p, |s| {
        if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
            s.to_string()
        } else {
            Value::String(s.to_string()).to_string()
        }
    })
}

fn wrap_in_array_brackets(p: Payload) -> Option<Payload> {
    text_step(p, |s| {
        if s.starts_with('[') && s.ends_with(']') {
            s.to_string()
        } else {
            format!("[{}]", s)
        }
    })
}

/// Decode, accepting only a list of strings.
fn decode_strings(p: Payload) -> Option<Payload> {
    match decode(p)? {
        Payload::Json(Value::Array(items)) if items.iter().all(Value::is_string) => {
            Some(Payload::Json(Value::Array(items)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_phrase() {
        assert_eq!(parse("Some resource").unwrap(), ["Some resource"]);
    }

    #[test]
    fn single_quoted_string() {
        assert_eq!(parse(r#""Quoted one""#).unwrap(), ["Quoted one"]);
    }

    #[test]
    fn quoted_list() {
        assert_eq!(
            parse(r#""General", "Sub-category", "Last one""#).unwrap(),
            ["General", "Sub-category", "Last one"]
        );
    }

    #[test]
    fn phrase_with_quotes_is_escaped() {
        assert_eq!(parse(r#"The "best" one"#).unwrap(), [r#"The "best" one"#]);
    }

    #[test]
    fn empty_content_is_invalid() {
        assert!(matches!(
            parse("  ").unwrap_err(),
            DocError::InvalidTagFormat { .. }
        ));
    }

    #[test]
    fn malformed_quoted_list_is_invalid() {
        assert!(matches!(
            parse(r#""A", B""#).unwrap_err(),
            DocError::InvalidTagFormat { .. }
        ));
    }
}

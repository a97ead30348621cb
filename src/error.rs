//! Error kinds raised while documenting a single endpoint.

use thiserror::Error;

/// Failure while building the summary of one endpoint.
///
/// Every variant is attributable to exactly one endpoint; the batch driver
/// catches it, records it and moves on to the next endpoint.
#[derive(Debug, Error)]
pub enum DocError {
    /// A tag's content does not match the grammar its name requires.
    #[error("invalid @{tag} tag: {reason}")]
    InvalidTagFormat { tag: String, reason: String },
    /// The response shorthand pipeline stopped at a named step.
    #[error("response tag format is invalid, failed at step `{step}`: {content}")]
    UnresolvedShorthand { step: &'static str, content: String },
    /// The endpoint has no documentable handler (inline or anonymous callback).
    #[error("unsupported handler for {action}: use a named handler method")]
    UnsupportedHandler { action: String },
    /// A path placeholder is bound to a handler parameter without a declared type.
    #[error("no type declared for path parameter `{parameter}`")]
    TypeNotDeclared { parameter: String },
    /// The host's query-rule capability failed.
    #[error("failed to compute query validation rules")]
    RuleSource(#[source] anyhow::Error),
}

impl DocError {
    pub(crate) fn invalid_tag(tag: &str, reason: impl Into<String>) -> Self {
        DocError::InvalidTagFormat {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the batch driver should skip the endpoint without a warning.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            DocError::UnsupportedHandler { .. } | DocError::TypeNotDeclared { .. }
        )
    }
}

/// Failure of the step pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The step order names a step that has no registered function.
    #[error("pipeline `{pipeline}` has no step named `{step}`")]
    UnknownStep {
        pipeline: &'static str,
        step: &'static str,
    },
    /// A step produced no value.
    #[error("format is invalid, pipeline `{pipeline}` failed at step `{step}`")]
    StepFailed {
        pipeline: &'static str,
        step: &'static str,
    },
}

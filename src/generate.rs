//! Batch driver over a whole route table.
//!
//! Selects endpoints by mask, drops hidden and anonymous ones, summarizes the
//! rest one at a time and groups the results by resource. A failing endpoint
//! is recorded in the [`Report`] and never stops the batch.

use crate::config::GeneratorConfig;
use crate::error::DocError;
use crate::facts::{Endpoint, QueryRuleSource};
use crate::model::{ResourceGroup, RouteSummary};
use crate::route::RouteDoc;
use anyhow::{Context, Result};
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Why an endpoint was left out before summarizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Skip {
    /// Neither the URI nor the route name matches a mask.
    Masked,
    /// A doc comment carries the hide marker.
    Hidden,
}

/// One endpoint that could not be documented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// `[METHODS] uri at Owner@method`
    pub endpoint: String,
    pub error: String,
    /// Expected kind (unsupported handler, untyped parameter); not warned about.
    pub silent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Resource groups, sorted by name.
    pub groups: Vec<ResourceGroup>,
    pub failures: Vec<Failure>,
    /// Endpoints dropped by masks or the hide marker.
    pub skipped: usize,
}

impl Report {
    pub fn routes(&self) -> impl Iterator<Item = &RouteSummary> {
        self.groups.iter().flat_map(|g| g.routes.iter())
    }

    /// Failures worth showing to the user.
    pub fn warnings(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|f| !f.silent)
    }
}

pub struct Generator {
    config: GeneratorConfig,
    masks: Vec<Pattern>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let masks = config.compile_masks().context("invalid generator config")?;
        Ok(Generator { config, masks })
    }

    /// Whether any mask matches the URI (with or without its leading `/`)
    /// or the route name.
    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        let uri = endpoint.uri.as_str();
        let bare = uri.trim_start_matches('/');
        self.masks.iter().any(|mask| {
            mask.matches(uri)
                || mask.matches(bare)
                || endpoint.name.as_deref().is_some_and(|name| mask.matches(name))
        })
    }

    /// Whether the handler method or its declaring type carries the hide marker.
    pub fn is_hidden(&self, endpoint: &Endpoint) -> bool {
        endpoint.handler_ref().is_some_and(|handler| {
            handler
                .docs()
                .iter()
                .any(|doc| doc.has_tag(&self.config.hide_tag))
        })
    }

    /// Gating that runs before any tag is parsed.
    pub fn skip_reason(&self, endpoint: &Endpoint) -> Option<Skip> {
        if !self.matches(endpoint) {
            Some(Skip::Masked)
        } else if self.is_hidden(endpoint) {
            Some(Skip::Hidden)
        } else {
            None
        }
    }

    /// Summarize one endpoint, ignoring masks and the hide marker.
    pub fn summarize(
        &self,
        endpoint: &Endpoint,
        rules: &dyn QueryRuleSource,
    ) -> Result<RouteSummary, DocError> {
        RouteDoc::new(endpoint, &self.config)?.summary(rules)
    }

    pub fn generate(&self, endpoints: &[Endpoint], rules: &dyn QueryRuleSource) -> Report {
        let mut summaries = Vec::new();
        let mut failures = Vec::new();
        let mut skipped = 0;

        for endpoint in endpoints {
            if let Some(reason) = self.skip_reason(endpoint) {
                debug!(uri = %endpoint.uri, ?reason, "skipping endpoint");
                skipped += 1;
                continue;
            }

            match self.summarize(endpoint, rules) {
                Ok(summary) => {
                    debug!(uri = %endpoint.uri, id = %summary.id, "documented endpoint");
                    summaries.push(summary);
                }
                Err(err) => {
                    let silent = err.is_silent();
                    if silent {
                        debug!(uri = %endpoint.uri, error = %err, "skipping endpoint");
                    } else {
                        warn!(
                            uri = %endpoint.uri,
                            methods = %endpoint.methods().join(","),
                            error = %err,
                            "failed to document endpoint"
                        );
                    }
                    failures.push(Failure {
                        endpoint: endpoint.label(),
                        error: error_chain(&err),
                        silent,
                    });
                }
            }
        }

        info!(
            documented = summaries.len(),
            skipped,
            failed = failures.len(),
            "route documentation generated"
        );

        Report {
            groups: group_by_resource(summaries),
            failures,
            skipped,
        }
    }
}

/// Group summaries by resource name, alphabetically. Within a group the
/// input order is kept.
pub fn group_by_resource(summaries: Vec<RouteSummary>) -> Vec<ResourceGroup> {
    let mut groups: BTreeMap<String, Vec<RouteSummary>> = BTreeMap::new();
    for summary in summaries {
        groups.entry(summary.resource_name()).or_default().push(summary);
    }
    groups
        .into_iter()
        .map(|(name, routes)| ResourceGroup { name, routes })
        .collect()
}

fn error_chain(err: &DocError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

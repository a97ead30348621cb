//! Per-endpoint aggregation: doc comments + host facts -> [`RouteSummary`].

use crate::config::GeneratorConfig;
use crate::error::DocError;
use crate::facts::{Endpoint, HandlerRef, QueryRuleSource};
use crate::humanize::function_name_to_text;
use crate::model::{
    fingerprint, Parameters, PathParameter, QueryParameter, ResponseShape, RouteSummary,
};
use crate::params::{Location, ParameterTags};
use crate::transform::response::collapse_whitespace;
use crate::transform::{resource, response};
use regex::Regex;
use std::sync::LazyLock;

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(.*?)\}").unwrap());

/// Exposed type of a path parameter bound to an ORM entity.
pub const ENTITY_TYPE: &str = "model_id";

/// `{name}` / `{name?}` tokens of a URI pattern, left to right, duplicates kept.
pub fn placeholders(uri: &str) -> Vec<&str> {
    RE_PLACEHOLDER
        .captures_iter(uri)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// One endpoint with a resolved handler, ready to be summarized.
pub struct RouteDoc<'a> {
    endpoint: &'a Endpoint,
    handler: &'a HandlerRef,
    config: &'a GeneratorConfig,
    describe: ParameterTags,
    defaults: ParameterTags,
}

impl<'a> RouteDoc<'a> {
    /// Resolve the handler and parse the `@describe` / `@default` tables.
    pub fn new(endpoint: &'a Endpoint, config: &'a GeneratorConfig) -> Result<Self, DocError> {
        let handler = endpoint
            .handler_ref()
            .ok_or_else(|| DocError::UnsupportedHandler {
                action: endpoint.handler.action(),
            })?;

        let docs = handler.docs();
        Ok(RouteDoc {
            endpoint,
            handler,
            config,
            describe: ParameterTags::describe(&docs)?,
            defaults: ParameterTags::defaults(&docs)?,
        })
    }

    /// Build the full summary. Query rules come from the host capability.
    pub fn summary(&self, rules: &dyn QueryRuleSource) -> Result<RouteSummary, DocError> {
        let methods = self.endpoint.methods();
        Ok(RouteSummary {
            id: fingerprint(&self.endpoint.uri, &methods),
            resource: self.resource()?,
            uri: self.endpoint.uri.clone(),
            methods,
            title: self.title(),
            description: self.description(),
            parameters: Parameters {
                path: self.path_parameters()?,
                query: self.query_parameters(rules)?,
            },
            responses: self.responses()?,
        })
    }

    /// Doc summary, or the humanized method name.
    pub fn title(&self) -> String {
        let short = self.handler.method_doc.short_text.trim();
        if short.is_empty() {
            function_name_to_text(&self.handler.method)
        } else {
            short.to_string()
        }
    }

    pub fn description(&self) -> String {
        collapse_whitespace(&self.handler.method_doc.long_text)
    }

    /// Method-level `@resource` first, then the declaring type's, then the fallback.
    pub fn resource(&self) -> Result<Vec<String>, DocError> {
        for doc in self.handler.docs() {
            if let Some(tag) = doc.tag("resource") {
                return resource::parse(&tag.content);
            }
        }
        Ok(vec![self.config.fallback_resource.clone()])
    }

    pub fn path_parameters(&self) -> Result<Vec<PathParameter>, DocError> {
        placeholders(&self.endpoint.uri)
            .into_iter()
            .map(|token| self.path_parameter(token))
            .collect()
    }

    fn path_parameter(&self, token: &str) -> Result<PathParameter, DocError> {
        let name = token.trim_end_matches('?');
        let facts = self.handler.parameter(name);
        let mut description = self.describe.get(Location::Path, name).map(str::to_string);

        let type_name = match facts {
            None => None,
            Some(facts) => match &facts.type_name {
                None if self.config.type_checks => {
                    return Err(DocError::TypeNotDeclared {
                        parameter: name.to_string(),
                    })
                }
                None => None,
                Some(declared) if facts.entity && !facts.builtin => {
                    description.get_or_insert_with(|| format!("`{}` id", declared));
                    Some(ENTITY_TYPE.to_string())
                }
                Some(declared) => Some(declared.clone()),
            },
        };

        // A declared default wins; the `@default` tag is the fallback.
        let default = facts
            .and_then(|f| f.default.clone())
            .or_else(|| self.defaults.get(Location::Path, name).map(str::to_string));

        Ok(PathParameter {
            name: name.to_string(),
            required: !token.ends_with('?'),
            type_name,
            default,
            regex: self.endpoint.wheres.get(name).cloned(),
            description: description.unwrap_or_default(),
        })
    }

    pub fn query_parameters(
        &self,
        rules: &dyn QueryRuleSource,
    ) -> Result<Vec<QueryParameter>, DocError> {
        let rules = rules
            .query_rules(self.handler)
            .map_err(DocError::RuleSource)?;

        Ok(rules
            .iter()
            .map(|(name, rules)| QueryParameter {
                name: name.to_string(),
                default: self.defaults.get(Location::Query, name).map(str::to_string),
                rules: rules.to_vec(),
                description: self
                    .describe
                    .get(Location::Query, name)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect())
    }

    /// Every `@response` on the method doc comment; bodiless tags are dropped.
    pub fn responses(&self) -> Result<Vec<ResponseShape>, DocError> {
        let mut shapes = Vec::new();
        for tag in self.handler.method_doc.tags("response") {
            if let Some(shape) = response::parse(&tag.content)? {
                shapes.push(shape);
            }
        }
        Ok(shapes)
    }
}

//! Read-only facts a host supplies about each endpoint.
//!
//! Route-table enumeration, handler introspection and validation-rule
//! discovery happen outside this crate. The host materializes what it found
//! into these structs (or a JSON manifest deserialized into them) and the
//! aggregator only reads them.

use crate::docblock::DocComment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of the host's route table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    /// URI pattern with `{name}` / `{name?}` placeholders.
    pub uri: String,
    /// Route name, matched against masks alongside the URI.
    #[serde(default)]
    pub name: Option<String>,
    pub methods: Vec<String>,
    /// Per-placeholder regex constraints.
    #[serde(default)]
    pub wheres: IndexMap<String, String>,
    pub handler: Handler,
}

impl Endpoint {
    /// HTTP methods in declaration order, `HEAD` and duplicates removed.
    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = Vec::with_capacity(self.methods.len());
        for method in &self.methods {
            let method = method.to_ascii_uppercase();
            if method != "HEAD" && !methods.contains(&method) {
                methods.push(method);
            }
        }
        methods
    }

    /// `[GET,POST] /uri at Owner@method` for log lines and failure reports.
    pub fn label(&self) -> String {
        format!(
            "[{}] {} at {}",
            self.methods().join(","),
            self.uri,
            self.handler.action()
        )
    }

    pub fn handler_ref(&self) -> Option<&HandlerRef> {
        match &self.handler {
            Handler::Method(handler) => Some(handler),
            Handler::Anonymous => None,
        }
    }
}

/// What serves an endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Handler {
    /// A named method on a declaring type.
    Method(HandlerRef),
    /// An inline callback; cannot be documented.
    Anonymous,
}

impl Handler {
    pub fn action(&self) -> String {
        match self {
            Handler::Method(handler) => handler.action(),
            Handler::Anonymous => "Closure".to_string(),
        }
    }
}

/// A handler method together with both doc comments that describe it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandlerRef {
    /// Declaring type name.
    pub owner: String,
    /// Method identifier; humanized into the title when no summary exists.
    pub method: String,
    #[serde(default)]
    pub method_doc: DocComment,
    #[serde(default)]
    pub owner_doc: DocComment,
    /// Declared parameters of the handler method.
    #[serde(default)]
    pub parameters: Vec<ParameterFacts>,
}

impl HandlerRef {
    pub fn action(&self) -> String {
        format!("{}@{}", self.owner, self.method)
    }

    /// Method doc comment first, then the declaring type's.
    pub fn docs(&self) -> [&DocComment; 2] {
        [&self.method_doc, &self.owner_doc]
    }

    /// Declared parameter by name, compared case-insensitively.
    pub fn parameter(&self, name: &str) -> Option<&ParameterFacts> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// What introspection found about one declared handler parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterFacts {
    pub name: String,
    /// Declared type (short name); `None` when the parameter is untyped.
    #[serde(default)]
    pub type_name: Option<String>,
    /// The declared type is a language primitive.
    #[serde(default)]
    pub builtin: bool,
    /// The declared type is an ORM entity bound by id.
    #[serde(default)]
    pub entity: bool,
    /// Literal default value, already stringified.
    #[serde(default)]
    pub default: Option<String>,
}

/// A rule declaration as the host's validation layer stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRule {
    /// `"required|integer|min:2017"`
    Piped(String),
    /// `["integer", "between:1,7"]`
    List(Vec<String>),
}

impl RawRule {
    fn flatten(self) -> Vec<String> {
        match self {
            RawRule::Piped(s) => s
                .split('|')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
            RawRule::List(rules) => rules,
        }
    }
}

/// Ordered `parameter name -> validation rules` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryRules(IndexMap<String, Vec<String>>);

impl QueryRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten raw declarations, keeping declaration order.
    pub fn from_raw(raw: impl IntoIterator<Item = (String, RawRule)>) -> Self {
        QueryRules(
            raw.into_iter()
                .map(|(name, rule)| (name, rule.flatten()))
                .collect(),
        )
    }

    pub fn insert(&mut self, name: impl Into<String>, rules: Vec<String>) {
        self.0.insert(name.into(), rules);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Host capability: compute the query validation rules of one handler.
///
/// Computing them may need the host to suppress side-effecting hooks by
/// temporarily changing shared configuration; that save/restore discipline
/// belongs to the implementor. Callers invoke it for one handler at a time
/// and never assume it is reentrant.
pub trait QueryRuleSource {
    fn query_rules(&self, handler: &HandlerRef) -> anyhow::Result<QueryRules>;
}

impl<F> QueryRuleSource for F
where
    F: Fn(&HandlerRef) -> anyhow::Result<QueryRules>,
{
    fn query_rules(&self, handler: &HandlerRef) -> anyhow::Result<QueryRules> {
        self(handler)
    }
}

/// Handlers without query validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQueryRules;

impl QueryRuleSource for NoQueryRules {
    fn query_rules(&self, _handler: &HandlerRef) -> anyhow::Result<QueryRules> {
        Ok(QueryRules::new())
    }
}

/// Pre-computed rules keyed by handler action (`Owner@method`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticQueryRules(IndexMap<String, QueryRules>);

impl StaticQueryRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, action: impl Into<String>, rules: QueryRules) {
        self.0.insert(action.into(), rules);
    }
}

impl QueryRuleSource for StaticQueryRules {
    fn query_rules(&self, handler: &HandlerRef) -> anyhow::Result<QueryRules> {
        Ok(self.0.get(&handler.action()).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(methods: &[&str]) -> Endpoint {
        Endpoint {
            uri: "/users/{id}".into(),
            name: None,
            methods: methods.iter().map(|m| m.to_string()).collect(),
            wheres: IndexMap::new(),
            handler: Handler::Method(HandlerRef {
                owner: "UserController".into(),
                method: "show".into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn head_is_excluded() {
        assert_eq!(endpoint(&["GET", "HEAD"]).methods(), ["GET"]);
        assert_eq!(endpoint(&["put", "PATCH", "PUT"]).methods(), ["PUT", "PATCH"]);
    }

    #[test]
    fn label_names_the_action() {
        assert_eq!(
            endpoint(&["GET", "HEAD"]).label(),
            "[GET] /users/{id} at UserController@show"
        );
    }

    #[test]
    fn parameter_lookup_ignores_case() {
        let handler = HandlerRef {
            parameters: vec![ParameterFacts {
                name: "userId".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(handler.parameter("userid").is_some());
        assert!(handler.parameter("id").is_none());
    }

    #[test]
    fn raw_rules_are_flattened_in_order() {
        let rules = QueryRules::from_raw([
            (
                "year".to_string(),
                RawRule::Piped("required|integer|min:2017".into()),
            ),
            (
                "weekDay".to_string(),
                RawRule::List(vec!["integer".into(), "between:1,7".into()]),
            ),
        ]);
        assert_eq!(rules.len(), 2);
        let names: Vec<_> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["year", "weekDay"]);
        assert_eq!(rules.get("year").unwrap(), ["required", "integer", "min:2017"]);
        assert_eq!(rules.get("weekDay").unwrap(), ["integer", "between:1,7"]);
    }

    #[test]
    fn raw_rules_deserialize_untagged() {
        let raw: IndexMap<String, RawRule> =
            serde_json::from_str(r#"{"a": "x|y", "b": ["z"]}"#).unwrap();
        let rules = QueryRules::from_raw(raw);
        assert_eq!(rules.get("a").unwrap(), ["x", "y"]);
        assert_eq!(rules.get("b").unwrap(), ["z"]);
    }

    #[test]
    fn static_rules_by_action() {
        let mut rules = QueryRules::new();
        rules.insert("page", vec!["integer".into()]);
        let mut source = StaticQueryRules::new();
        source.insert("UserController@show", rules.clone());

        let handler = endpoint(&["GET"]).handler_ref().cloned().unwrap();
        assert_eq!(source.query_rules(&handler).unwrap(), rules);
        assert!(NoQueryRules.query_rules(&handler).unwrap().is_empty());
    }

    #[test]
    fn manifest_deserializes() {
        let endpoint: Endpoint = serde_json::from_str(
            r#"{
                "uri": "/ping",
                "methods": ["GET", "HEAD"],
                "handler": { "kind": "anonymous" }
            }"#,
        )
        .unwrap();
        assert!(endpoint.handler_ref().is_none());
        assert_eq!(endpoint.handler.action(), "Closure");
    }
}

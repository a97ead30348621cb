//! Output records, consumed by an external renderer.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Recursive JSON-compatible response shape. `{"$ref": ...}` objects point
/// at named types that the renderer resolves.
pub type ResponseShape = Value;

/// Normalized documentation of one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Stable fingerprint of the URI and method set.
    pub id: String,
    /// Resource path, outermost group first.
    pub resource: Vec<String>,
    pub uri: String,
    pub methods: Vec<String>,
    pub title: String,
    pub description: String,
    pub parameters: Parameters,
    pub responses: Vec<ResponseShape>,
}

impl RouteSummary {
    /// Grouping key: the resource path joined with ` / `.
    pub fn resource_name(&self) -> String {
        self.resource.join(" / ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parameters {
    pub path: Vec<PathParameter>,
    pub query: Vec<QueryParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathParameter {
    pub name: String,
    /// False only when the placeholder carried a trailing `?`.
    pub required: bool,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub default: Option<String>,
    pub regex: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameter {
    pub name: String,
    pub default: Option<String>,
    pub rules: Vec<String>,
    pub description: String,
}

/// Summaries sharing one resource name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGroup {
    pub name: String,
    pub routes: Vec<RouteSummary>,
}

/// SHA-256 of `uri:METHOD,METHOD` with methods sorted, hex-encoded.
pub fn fingerprint(uri: &str, methods: &[String]) -> String {
    let mut sorted: Vec<&str> = methods.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(uri.as_bytes());
    hasher.update(b":");
    hasher.update(sorted.join(",").as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn methods(list: &[&str]) -> Vec<String> {
        list.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn fingerprint_ignores_method_order() {
        assert_eq!(
            fingerprint("/users", &methods(&["POST", "GET"])),
            fingerprint("/users", &methods(&["GET", "POST"]))
        );
    }

    #[test]
    fn fingerprint_depends_on_uri_and_methods() {
        let base = fingerprint("/users", &methods(&["GET"]));
        assert_eq!(base.len(), 64);
        assert_ne!(base, fingerprint("/users/{id}", &methods(&["GET"])));
        assert_ne!(base, fingerprint("/users", &methods(&["PUT"])));
    }

    #[test]
    fn path_parameter_serializes_type_key() {
        let param = PathParameter {
            name: "id".into(),
            required: true,
            type_name: Some("int".into()),
            default: None,
            regex: None,
            description: String::new(),
        };
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["type"], "int");
        assert!(json["default"].is_null());
    }
}

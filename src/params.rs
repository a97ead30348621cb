//! `location name value` tag grammar shared by `@describe` and `@default`.
//!
//! ```text
//! @describe path id It's an ID of your model
//! @default query weekDay 2
//! ```

use crate::docblock::{DocComment, Tag};
use crate::error::DocError;
use crate::transform::response::collapse_whitespace;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static RE_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Path,
    Query,
}

impl Location {
    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Location::Path),
            "query" => Some(Location::Query),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path => write!(f, "path"),
            Location::Query => write!(f, "query"),
        }
    }
}

/// One parsed `location name value` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTag {
    pub location: Location,
    pub name: String,
    pub value: String,
}

/// Split a tag into its three tokens. The value is the rest of the content.
pub fn parse_tag(tag: &Tag) -> Result<ParameterTag, DocError> {
    let content = tag.content.trim();
    let parts: Vec<&str> = RE_SPLIT.splitn(content, 3).collect();

    let &[location, name, value] = parts.as_slice() else {
        return Err(DocError::invalid_tag(
            &tag.name,
            format!("expected `location name value`, got `{}`", content),
        ));
    };

    let location = Location::from_keyword(location).ok_or_else(|| {
        DocError::invalid_tag(
            &tag.name,
            format!("invalid parameter location `{}`, expected `path` or `query`", location),
        )
    })?;

    Ok(ParameterTag {
        location,
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// `location -> name -> value` table built from every matching tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTags {
    entries: IndexMap<Location, IndexMap<String, String>>,
}

impl ParameterTags {
    /// `@describe` tags. Descriptions are whitespace-collapsed.
    pub fn describe(docs: &[&DocComment]) -> Result<Self, DocError> {
        Self::collect("describe", docs, collapse_whitespace)
    }

    /// `@default` tags. Values are kept verbatim.
    pub fn defaults(docs: &[&DocComment]) -> Result<Self, DocError> {
        Self::collect("default", docs, str::to_string)
    }

    /// Scan `docs` in order; a later tag for the same location and name
    /// replaces an earlier one.
    pub fn collect(
        tag_name: &str,
        docs: &[&DocComment],
        transform: impl Fn(&str) -> String,
    ) -> Result<Self, DocError> {
        let mut entries: IndexMap<Location, IndexMap<String, String>> = IndexMap::new();

        for doc in docs {
            for tag in doc.tags(tag_name) {
                let parsed = parse_tag(tag)?;
                entries
                    .entry(parsed.location)
                    .or_default()
                    .insert(parsed.name, transform(&parsed.value));
            }
        }

        Ok(ParameterTags { entries })
    }

    pub fn get(&self, location: Location, name: &str) -> Option<&str> {
        self.entries
            .get(&location)
            .and_then(|names| names.get(name))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(IndexMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(tags: &[(&str, &str)]) -> DocComment {
        DocComment {
            tags: tags.iter().map(|(n, c)| Tag::new(*n, *c)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn parses_three_tokens() {
        let parsed = parse_tag(&Tag::new("default", "path id 789")).unwrap();
        assert_eq!(
            parsed,
            ParameterTag {
                location: Location::Path,
                name: "id".into(),
                value: "789".into()
            }
        );
    }

    #[test]
    fn value_keeps_the_rest_of_the_line() {
        let parsed = parse_tag(&Tag::new("describe", "path id It's an ID of your model")).unwrap();
        assert_eq!(parsed.value, "It's an ID of your model");
    }

    #[test]
    fn swapped_location_is_invalid() {
        let err = parse_tag(&Tag::new("default", "year path 123")).unwrap_err();
        match err {
            DocError::InvalidTagFormat { tag, reason } => {
                assert_eq!(tag, "default");
                assert!(reason.contains("`year`"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn too_few_tokens_is_invalid() {
        assert!(matches!(
            parse_tag(&Tag::new("default", "path id")),
            Err(DocError::InvalidTagFormat { .. })
        ));
        assert!(matches!(
            parse_tag(&Tag::new("default", "")),
            Err(DocError::InvalidTagFormat { .. })
        ));
    }

    #[test]
    fn defaults_by_location() {
        let method = doc(&[("default", "query weekDay 2"), ("default", "path id 789")]);
        let tags = ParameterTags::defaults(&[&method]).unwrap();
        assert_eq!(tags.get(Location::Query, "weekDay"), Some("2"));
        assert_eq!(tags.get(Location::Path, "id"), Some("789"));
        assert_eq!(tags.get(Location::Path, "weekDay"), None);
    }

    #[test]
    fn later_doc_comment_wins() {
        let method = doc(&[("describe", "path id From the method")]);
        let owner = doc(&[("describe", "path id From the type")]);
        let tags = ParameterTags::describe(&[&method, &owner]).unwrap();
        assert_eq!(tags.get(Location::Path, "id"), Some("From the type"));
    }

    #[test]
    fn describe_collapses_whitespace() {
        let method = doc(&[("Describe", "query page The page\n   to fetch")]);
        let tags = ParameterTags::describe(&[&method]).unwrap();
        assert_eq!(tags.get(Location::Query, "page"), Some("The page to fetch"));
    }

    #[test]
    fn unrelated_tags_are_ignored() {
        let method = doc(&[("response", ":: int")]);
        assert!(ParameterTags::defaults(&[&method]).unwrap().is_empty());
    }
}

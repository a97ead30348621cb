//! Doc-comment model: summary, long text and ordered `@tag` entries.

mod parse;

use serde::{Deserialize, Serialize};

/// One `@name content` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A parsed doc comment attached to a handler or its declaring type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment {
    #[serde(default)]
    pub short_text: String,
    #[serde(default)]
    pub long_text: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl DocComment {
    /// Parse raw comment text (`/** */` block, `///` lines or bare text).
    pub fn parse(raw: &str) -> Self {
        parse::parse(raw)
    }

    /// All tags with the given name, in declaration order.
    pub fn tags<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.is(name))
    }

    /// First tag with the given name.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.is(name))
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> DocComment {
        DocComment {
            tags: vec![
                Tag::new("Response", ":: int"),
                Tag::new("resource", "Users"),
                Tag::new("response", "int[]"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let doc = doc();
        assert!(doc.has_tag("RESOURCE"));
        assert_eq!(doc.tag("resource").map(|t| t.content.as_str()), Some("Users"));
        assert!(!doc.has_tag("docsHide"));
    }

    #[test]
    fn found_tag_outlives_the_name() {
        let doc = doc();
        let found = {
            let name = String::from("RESOURCE");
            doc.tag(&name)
        };
        assert_eq!(found, Some(&Tag::new("resource", "Users")));
    }

    #[test]
    fn repeated_tags_keep_order() {
        let doc = doc();
        let contents: Vec<_> = doc.tags("response").map(|t| t.content.as_str()).collect();
        assert_eq!(contents, [":: int", "int[]"]);
    }
}

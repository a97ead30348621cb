//! Line-based doc-comment reader.
//!
//! Strips comment gutters, splits the free text into a summary and a long
//! description, then collects `@tag` entries. A tag's content runs until the
//! next tag line, so multi-line `@response` bodies stay intact.

use super::{DocComment, Tag};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*/\*\*?").unwrap());

static RE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\*/\s*$").unwrap());

// Content follows whitespace, or starts right after the name with `{`, `[` or `"`.
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^@([A-Za-z0-9_\-\\]+)(?:\s+(.*)|([\{\["].*))?$"#).unwrap()
});

// -- Public API ---------------------------------------------------------------

pub(super) fn parse(raw: &str) -> DocComment {
    let lines = strip_gutters(raw);

    let mut text: Vec<&str> = Vec::new();
    let mut tags: Vec<(String, Vec<String>)> = Vec::new();

    for line in &lines {
        let trimmed = line.trim();
        if let Some(caps) = RE_TAG.captures(trimmed) {
            let first = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            tags.push((caps[1].to_string(), vec![first]));
            continue;
        }
        match tags.last_mut() {
            Some((_, content)) => content.push(line.to_string()),
            None => text.push(line),
        }
    }

    let (short_text, long_text) = split_text(&text);

    DocComment {
        short_text,
        long_text,
        tags: tags
            .into_iter()
            .map(|(name, content)| Tag::new(name, content.join("\n").trim()))
            .collect(),
    }
}

// -- Helpers ------------------------------------------------------------------

/// Remove `/**`, `*/`, `*`, `///` and `//!` decorations from every line,
/// keeping the indentation that follows the gutter.
fn strip_gutters(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            let line = RE_OPEN.replace(line, "");
            let line = RE_CLOSE.replace(&line, "");
            strip_gutter_prefix(&line).trim_end().to_string()
        })
        .collect()
}

fn strip_gutter_prefix(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = if let Some(r) = rest.strip_prefix("//!") {
        r
    } else if let Some(r) = rest.strip_prefix("///") {
        r
    } else if let Some(r) = rest.strip_prefix("//") {
        r
    } else if let Some(r) = rest.strip_prefix('*') {
        r
    } else {
        rest
    };
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Summary ends at the first blank line or the first line ending in a period.
fn split_text(lines: &[&str]) -> (String, String) {
    let mut short: Vec<&str> = Vec::new();
    let mut rest = lines.iter().copied().skip_while(|l| l.trim().is_empty());

    for line in rest.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        short.push(line.trim());
        if line.trim_end().ends_with('.') {
            break;
        }
    }

    let long: Vec<&str> = rest.collect();
    (
        short.join(" ").trim().to_string(),
        long.join("\n").trim().to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_comment_with_title_and_description() {
        let raw = "/**
     * Endpoint title
     *
     * And a long description
     * on many,
     * many,
     * many lines.
     */";
        let doc = parse(raw);
        assert_eq!(doc.short_text, "Endpoint title");
        assert_eq!(
            doc.long_text,
            "And a long description\non many,\nmany,\nmany lines."
        );
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn summary_ends_at_period() {
        let doc = parse("/**\n * List users.\n * Paginated by default.\n */");
        assert_eq!(doc.short_text, "List users.");
        assert_eq!(doc.long_text, "Paginated by default.");
    }

    #[test]
    fn tags_and_multiline_content() {
        let raw = "/**
     * @resource Users
     * @response {
     *   year :: int
     * }
     * @docsHide
     */";
        let doc = parse(raw);
        assert_eq!(doc.short_text, "");
        assert_eq!(doc.tags.len(), 3);
        assert_eq!(doc.tags[0], Tag::new("resource", "Users"));
        assert_eq!(doc.tags[1].content, "{\n  year :: int\n}");
        assert_eq!(doc.tags[2], Tag::new("docsHide", ""));
    }

    #[test]
    fn content_glued_to_tag_name() {
        let raw = "/**
     * @response{ id :: int }
     * @response[ :: int ]
     * @resource\"Users\"
     */";
        let doc = parse(raw);
        assert_eq!(doc.tags[0], Tag::new("response", "{ id :: int }"));
        assert_eq!(doc.tags[1], Tag::new("response", "[ :: int ]"));
        assert_eq!(doc.tags[2], Tag::new("resource", "\"Users\""));
        assert_eq!(doc.short_text, "");
    }

    #[test]
    fn line_comments() {
        let doc = parse("/// Show a user\n///\n/// @default path id 789");
        assert_eq!(doc.short_text, "Show a user");
        assert_eq!(doc.tags, vec![Tag::new("default", "path id 789")]);
    }

    #[test]
    fn bare_text() {
        let doc = parse("Title\n\nBody text\n@describe query page Page number");
        assert_eq!(doc.short_text, "Title");
        assert_eq!(doc.long_text, "Body text");
        assert_eq!(doc.tags[0].content, "query page Page number");
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(""), DocComment::default());
        assert_eq!(parse("/** */"), DocComment::default());
    }
}

//! Quote-aware regex substitution.
//!
//! Rewrites pattern matches everywhere except inside double-quoted string
//! literals. A position counts as "outside quotes" when the text after it
//! holds an even number of unescaped `"`. With an odd total (malformed
//! quoting) the text before the first quote reads as quoted and the pairing
//! of the remaining quotes shifts by one, so such input comes back partly
//! untransformed. The result is lossy for malformed input; it is never
//! silently "fixed".

use regex::{Captures, Regex, Replacer};

/// Per-position quote state of a string.
pub struct QuoteMap {
    /// `outside[i]` is true when byte offset `i` lies outside any quoted span.
    outside: Vec<bool>,
}

impl QuoteMap {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut quote_at = vec![false; bytes.len()];

        for (i, &b) in bytes.iter().enumerate() {
            if b != b'"' {
                continue;
            }
            // Odd run of preceding backslashes = escaped quote.
            let backslashes = bytes[..i].iter().rev().take_while(|&&c| c == b'\\').count();
            quote_at[i] = backslashes % 2 == 0;
        }

        // Walk backwards counting quotes in the remaining text.
        let mut outside = vec![true; bytes.len() + 1];
        let mut remaining = 0usize;
        for i in (0..bytes.len()).rev() {
            if quote_at[i] {
                remaining += 1;
            }
            outside[i] = remaining % 2 == 0;
        }

        QuoteMap { outside }
    }

    /// Whether byte offset `pos` is outside every quoted span.
    pub fn is_outside(&self, pos: usize) -> bool {
        self.outside.get(pos).copied().unwrap_or(true)
    }
}

/// Replace every match of `re` in `text` that starts and ends outside
/// double quotes.
///
/// A match that starts outside quotes but ends inside them is retried with
/// a shorter haystack, so a greedy pattern settles on the longest match that
/// ends outside quotes. A match starting inside quotes is skipped and the
/// search resumes one character later.
///
/// `rep` is any [`Replacer`]: a `$1` template (write `$$` for a literal `$`)
/// or a closure over the captures.
pub fn replace_unquoted<R: Replacer>(re: &Regex, text: &str, mut rep: R) -> String {
    let map = QuoteMap::new(text);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = re.captures_at(text, pos) else { break };
        let Some(m) = caps.get(0) else { break };
        let start = m.start();

        let found = if !map.is_outside(start) {
            None
        } else if map.is_outside(m.end()) {
            Some(caps)
        } else {
            shorter_match(re, text, &map, start, m.end())
        };

        let Some(caps) = found else {
            pos = next_char(text, start);
            continue;
        };
        let end = caps.get(0).map_or(start, |m| m.end());
        out.push_str(&text[last..start]);
        rep.replace_append(&caps, &mut out);
        last = end;
        pos = if end > start { end } else { next_char(text, end) };
    }

    out.push_str(&text[last..]);
    out
}

/// Longest match anchored at `start` that ends outside quotes and before
/// `end`.
fn shorter_match<'h>(
    re: &Regex,
    text: &'h str,
    map: &QuoteMap,
    start: usize,
    mut end: usize,
) -> Option<Captures<'h>> {
    while end > start {
        end = text[..end].char_indices().next_back().map_or(start, |(i, _)| i);
        let caps = re.captures_at(&text[..end], start)?;
        let m = caps.get(0)?;
        if m.start() != start {
            return None;
        }
        if map.is_outside(m.end()) {
            return Some(caps);
        }
        end = m.end();
    }
    None
}

fn next_char(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word() -> Regex {
        Regex::new(r"(\w+)").unwrap()
    }

    #[test]
    fn no_quotes_replaces_everything() {
        assert_eq!(replace_unquoted(&word(), "a b", "<$1>"), "<a> <b>");
    }

    #[test]
    fn quoted_span_is_untouched() {
        let out = replace_unquoted(&word(), r#"a "b c" d"#, "<$1>");
        assert_eq!(out, r#"<a> "b c" <d>"#);
    }

    #[test]
    fn escaped_quote_does_not_close_span() {
        let out = replace_unquoted(&word(), r#""x \"y\" z" w"#, "<$1>");
        assert_eq!(out, r#""x \"y\" z" <w>"#);
    }

    #[test]
    fn double_backslash_before_quote_closes_span() {
        let out = replace_unquoted(&word(), r#""x\\" w"#, "<$1>");
        assert_eq!(out, r#""x\\" <w>"#);
    }

    #[test]
    fn odd_quotes_leave_leading_text_alone() {
        // Three quotes: `a` reads as quoted, the rest pairs up from the right.
        let out = replace_unquoted(&word(), r#"a "b" "c"#, "<$1>");
        assert_eq!(out, r#"a "<b>" "<c>"#);
    }

    #[test]
    fn greedy_match_backs_off_a_quoted_end() {
        let re = Regex::new(r"<(.*)>").unwrap();
        let out = replace_unquoted(&re, r#"<a> b, ">" c"#, "[$1]");
        assert_eq!(out, r#"[a] b, ">" c"#);
    }

    #[test]
    fn match_ending_only_inside_quotes_is_dropped() {
        let re = Regex::new(r"<[^>]*>").unwrap();
        let out = replace_unquoted(&re, r#"<a ">" <b>"#, "#");
        assert_eq!(out, r#"<a ">" #"#);
    }

    #[test]
    fn closure_replacer() {
        let out = replace_unquoted(&word(), r#"a "b""#, |caps: &regex::Captures| {
            caps[1].to_uppercase()
        });
        assert_eq!(out, r#"A "b""#);
    }

    #[test]
    fn quote_map_positions() {
        let map = QuoteMap::new(r#"a"b"c"#);
        assert!(map.is_outside(0));
        assert!(map.is_outside(1));
        assert!(!map.is_outside(2));
        assert!(!map.is_outside(3));
        assert!(map.is_outside(4));
        assert!(map.is_outside(5));
    }
}

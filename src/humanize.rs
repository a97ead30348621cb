//! Handler identifier to human-readable title.
//!
//! `thisIsNASAModule` -> `This is NASA module`,
//! `snake_case_name` -> `Snake case name`.

/// Turn a function identifier into a sentence-cased label.
pub fn function_name_to_text(name: &str) -> String {
    let words = split_words(&camel_case(name));
    let text = lower_words(&words).join(" ");
    upper_first(&text)
}

/// `snake_case` / `kebab-case` -> `camelCase`. Runs of separators collapse.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    lower_first(&out)
}

/// Split between lower->Upper, and between Upper->Upper+lower (acronym end).
fn split_words(camel: &str) -> Vec<String> {
    let chars: Vec<char> = camel.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Lower-case words that are capitalized but not acronyms (`Is`, `A`).
fn lower_words(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match (chars.next(), chars.next()) {
                (Some(first), second)
                    if first.is_uppercase() && second.map_or(true, |c| c.is_lowercase()) =>
                {
                    lower_first(w)
                }
                _ => w.clone(),
            }
        })
        .collect()
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

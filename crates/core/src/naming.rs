//! Identifier helpers shared by normalization and the Go emitter.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Go keywords, predeclared identifiers and generated locals that cannot
/// name a parameter.
pub static GO_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "chan",
        "const",
        "continue",
        "default",
        "defer",
        "else",
        "fallthrough",
        "for",
        "func",
        "go",
        "goto",
        "if",
        "import",
        "interface",
        "map",
        "package",
        "range",
        "return",
        "select",
        "struct",
        "switch",
        "type",
        "var",
        "ctx",
        "nil",
        "true",
        "false",
        "string",
        "error",
        "len",
        "new",
        "c",
        "err",
        "out",
        "variables",
    ]
    .into_iter()
    .collect()
});

/// Split on separators and lower-to-upper case boundaries.
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in s.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// `pet_store-id` -> `PetStoreId`. Inner capitals are kept (`getURL` -> `GetURL`).
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| capitalize_first(word))
        .collect()
}

/// `PetStore` -> `petStore`.
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Sanitize a name into a valid, unexported Go identifier.
/// - camelCases across separators
/// - prepends `_` when the result starts with a digit
/// - suffixes reserved words with `_`
pub fn sanitize_go_identifier(name: &str) -> String {
    let mut result = to_camel_case(name);
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result = format!("_{result}");
    }
    if GO_RESERVED_WORDS.contains(result.as_str()) {
        result.push('_');
    }
    result
}

/// Escape a string for a Go interpreted string literal.
pub fn escape_go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

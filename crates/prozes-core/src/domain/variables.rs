//! Placeholder detection and substitution.
//!
//! A placeholder is the literal token `{{name}}` where `name` matches
//! `[A-Za-z_][A-Za-z0-9_]*`. Anything else that happens to use double braces
//! (`{{ name }}`, `{{"a": 1}}`, `{{}}`, an unterminated `{{name`) is plain
//! text and is left alone. Scanning never fails.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::error::DomainError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

// ============================================================================
// Variable Names
// ============================================================================

/// Check whether `name` is a valid identifier-like variable name.
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub fn validate_variable_name(name: &str) -> Result<(), DomainError> {
    if is_valid_variable_name(name) {
        Ok(())
    } else {
        Err(DomainError::InvalidVariableName {
            name: name.to_string(),
            reason: "must start with a letter or '_' and contain only letters, digits and '_'"
                .into(),
        })
    }
}

/// Parse a `KEY=VALUE` assignment.
///
/// The key is trimmed and validated, the value is everything after the first
/// `=` taken verbatim (it may itself contain `=` or be empty).
pub fn parse_assignment(input: &str) -> Result<(String, String), DomainError> {
    let Some((key, value)) = input.split_once('=') else {
        return Err(DomainError::InvalidVariableAssignment {
            input: input.to_string(),
            reason: "expected KEY=VALUE".into(),
        });
    };

    let key = key.trim();
    if !is_valid_variable_name(key) {
        return Err(DomainError::InvalidVariableAssignment {
            input: input.to_string(),
            reason: format!("'{}' is not a valid variable name", key),
        });
    }

    Ok((key.to_string(), value.to_string()))
}

// ============================================================================
// VariableSet
// ============================================================================

/// Ordered, duplicate-free set of variable names.
///
/// Insertion order is preserved; inserting an already-present name is a no-op.
/// Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct VariableSet {
    names: Vec<String>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name, returning `true` if it was not already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }
}

impl From<Vec<String>> for VariableSet {
    fn from(names: Vec<String>) -> Self {
        let mut set = Self::new();
        for name in names {
            set.insert(name);
        }
        set
    }
}

impl From<VariableSet> for Vec<String> {
    fn from(set: VariableSet) -> Self {
        set.names
    }
}

impl<S: Into<String>> FromIterator<S> for VariableSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// One well-formed placeholder occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    /// Byte range of the whole token, braces included.
    pub span: Range<usize>,
}

/// Iterate the well-formed placeholders of `text`, left to right.
///
/// Occurrences never overlap. After a malformed `{{` the scan resumes one
/// byte later, so `{{{name}}` still yields `name`.
pub fn placeholders(text: &str) -> impl Iterator<Item = Placeholder<'_>> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = text[cursor..].find(OPEN) {
            let start = cursor + offset;
            let name_start = start + OPEN.len();
            let name_len = text[name_start..]
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                .count();
            let name_end = name_start + name_len;
            let name = &text[name_start..name_end];

            if is_valid_variable_name(name) && text[name_end..].starts_with(CLOSE) {
                let end = name_end + CLOSE.len();
                cursor = end;
                return Some(Placeholder {
                    name,
                    span: start..end,
                });
            }

            // '{' is one byte, so start + 1 is always a char boundary.
            cursor = start + 1;
        }
        None
    })
}

/// Distinct placeholder names in `text`, in first-seen order.
pub fn detect(text: &str) -> VariableSet {
    placeholders(text).map(|p| p.name).collect()
}

/// Detect placeholders into an existing set, returning how many were new.
pub fn detect_into(text: &str, set: &mut VariableSet) -> usize {
    placeholders(text)
        .filter(|p| set.insert(p.name))
        .count()
}

/// Replace placeholders whose name is in `declared` and for which `lookup`
/// yields a value. Every other placeholder is kept literally.
pub fn substitute<'v, F>(text: &str, declared: &VariableSet, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'v str>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for placeholder in placeholders(text) {
        if !declared.contains(placeholder.name) {
            continue;
        }
        if let Some(value) = lookup(placeholder.name) {
            out.push_str(&text[last..placeholder.span.start]);
            out.push_str(value);
            last = placeholder.span.end;
        }
    }

    out.push_str(&text[last..]);
    out
}

// ============================================================================
// Case Conversion
// ============================================================================

/// Convert a string to snake_case (`MyApp` -> `my_app`).
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to kebab-case (`my_app` -> `my-app`).
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert a string to PascalCase (`my-app` -> `MyApp`).
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => {
                    let mut out = String::new();
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Split a string into lowercase words.
///
/// Boundaries: `_`, `-`, `.` and whitespace; a lower-to-upper transition
/// (`myApp`); the end of an acronym (`HTTPServer` -> `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            let lower_to_upper = c.is_lowercase() && next.is_uppercase();
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase());

            if lower_to_upper || acronym_end {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> VariableSet {
        names.iter().copied().collect()
    }

    #[test]
    fn detects_in_first_seen_order_without_duplicates() {
        let text = "{{b}} {{a}} {{b}} {{c}}";
        assert_eq!(detect(text).as_slice(), &["b", "a", "c"]);
    }

    #[test]
    fn ignores_json_like_and_spaced_braces() {
        let text = r#"{{"a": 1}} {{ name }} {{}} {{1abc}} {{open"#;
        assert!(detect(text).is_empty());
    }

    #[test]
    fn finds_placeholder_after_extra_brace() {
        assert_eq!(detect("{{{name}}}").as_slice(), &["name"]);
        assert_eq!(detect("{{x{{y}}").as_slice(), &["y"]);
    }

    #[test]
    fn handles_multibyte_text() {
        assert_eq!(detect("héllo {{wörld}} {{ok}} ✓").as_slice(), &["ok"]);
    }

    #[test]
    fn detect_into_counts_new_names() {
        let mut vars = set(&["a"]);
        assert_eq!(detect_into("{{a}} {{b}} {{b}}", &mut vars), 1);
        assert_eq!(vars.as_slice(), &["a", "b"]);
    }

    #[test]
    fn substitutes_only_declared_names_with_values() {
        let declared = set(&["name", "missing"]);
        let out = substitute("{{name}} {{missing}} {{other}}", &declared, |n| {
            (n == "name" || n == "other").then_some("foo")
        });
        assert_eq!(out, "foo {{missing}} {{other}}");
    }

    #[test]
    fn substitution_leaves_text_without_placeholders_unchanged() {
        let text = "fn main() { let x = {{ a }}; }";
        assert_eq!(substitute(text, &set(&["a"]), |_| Some("1")), text);
    }

    #[test]
    fn substitution_replaces_every_occurrence() {
        let out = substitute("{{x}}-{{x}}-{{x}}", &set(&["x"]), |_| Some("y"));
        assert_eq!(out, "y-y-y");
    }

    #[test]
    fn parses_assignments() {
        assert_eq!(
            parse_assignment(" author =Ada").unwrap(),
            ("author".to_string(), "Ada".to_string())
        );
        assert_eq!(
            parse_assignment("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("1bad=x").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn variable_set_serializes_as_array() {
        let vars = set(&["b", "a"]);
        let json = serde_json::to_string(&vars).unwrap();
        assert_eq!(json, r#"["b","a"]"#);

        let back: VariableSet = serde_json::from_str(r#"["x","y","x"]"#).unwrap();
        assert_eq!(back.as_slice(), &["x", "y"]);
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("MyApp"), "my_app");
        assert_eq!(to_snake_case("my-app"), "my_app");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_kebab_case("my_cool.app"), "my-cool-app");
        assert_eq!(to_pascal_case("my-app"), "MyApp");
        assert_eq!(to_pascal_case("foo"), "Foo");
    }
}

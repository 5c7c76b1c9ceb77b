//! Core type definitions shared by both directions
//!
//! The generator writes and the parser reads the same diagram dialect, so the
//! markers, arrow tokens, primitive-type policy and enum truncation rule all
//! live here rather than in either plugin.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Marker that opens every field declaration inside a class body
pub const FIELD_MARKER: &str = "{field}";

/// Marker that opens every method declaration inside a class or interface body
pub const METHOD_MARKER: &str = "{method}";

/// Terminal value appended to an enumeration that was cut short
pub const ENUM_SENTINEL: &str = "...";

/// Number of enumeration values kept before the sentinel is appended
pub const DEFAULT_ENUM_LIMIT: usize = 10;

/// Opening markup for a required field name
pub const BOLD_OPEN: &str = "<b>";

/// Closing markup for a required field name
pub const BOLD_CLOSE: &str = "</b>";

/// Unqualified type names that never become diagram entities
const PRIMITIVE_TYPES: [&str; 4] = ["string", "integer", "number", "boolean"];

/// Kind of a relationship between two diagram entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    /// Source holds or uses the destination: `A ..> B`
    Association,
    /// Source extends, or is a member of the abstract group headed by, the destination: `A --|> B`
    Inheritance,
}

impl RelationshipKind {
    /// Arrow token written by the generator for this kind
    pub fn arrow(self) -> &'static str {
        match self {
            RelationshipKind::Association => "..>",
            RelationshipKind::Inheritance => "--|>",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Association => write!(f, "association"),
            RelationshipKind::Inheritance => write!(f, "inheritance"),
        }
    }
}

/// Returns true for built-in type names that must never produce an entity or a relationship
///
/// Namespaced markers (`xs:string`, `xsd:dateTime`) and the plain schema
/// primitives are built in.
pub fn is_primitive_type(type_name: &str) -> bool {
    let type_name = type_name.trim();
    type_name.contains(':') || PRIMITIVE_TYPES.contains(&type_name)
}

/// Strip array suffixes: `Tag[][]` -> `Tag`
pub fn base_type_name(type_name: &str) -> &str {
    let mut name = type_name.trim();
    while let Some(stripped) = name.strip_suffix("[]") {
        name = stripped.trim_end();
    }
    name
}

/// Entity name as written in diagram text
///
/// Plain identifiers are written bare; anything else (`api.v1.Pet`,
/// `pet-tag`, `/pet`) is double-quoted.
pub fn diagram_name(name: &str) -> Cow<'_, str> {
    if is_plain_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name))
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Wrap a field name in bold markup
pub fn bold(name: &str) -> String {
    format!("{}{}{}", BOLD_OPEN, name, BOLD_CLOSE)
}

/// Remove bold markup from a field name token, reporting whether it was present
pub fn strip_bold(token: &str) -> (&str, bool) {
    match token
        .strip_prefix(BOLD_OPEN)
        .and_then(|rest| rest.strip_suffix(BOLD_CLOSE))
    {
        Some(inner) => (inner, true),
        None => (token, false),
    }
}

/// Apply the enumeration cap
///
/// More than `limit` values keeps the first `limit` and appends
/// [`ENUM_SENTINEL`]. A sentinel already sitting at the end is kept verbatim
/// and does not count toward the limit, so capping is idempotent.
pub fn cap_enum_values(mut values: Vec<String>, limit: usize) -> Vec<String> {
    let had_sentinel = values.last().is_some_and(|v| v == ENUM_SENTINEL);
    if had_sentinel {
        values.pop();
    }

    if values.len() > limit {
        values.truncate(limit);
        values.push(ENUM_SENTINEL.to_string());
    } else if had_sentinel {
        values.push(ENUM_SENTINEL.to_string());
    }
    values
}

/// Options for reading diagram text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Fail on the first malformed block line instead of skipping it
    pub strict: bool,
    /// Enumeration values kept before the sentinel
    pub enum_limit: usize,
}

impl ParseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_enum_limit(mut self, enum_limit: usize) -> Self {
        self.enum_limit = enum_limit;
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            strict: false,
            enum_limit: DEFAULT_ENUM_LIMIT,
        }
    }
}

/// Options for writing diagram text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Enumeration values kept before the sentinel
    pub enum_limit: usize,
    /// Directive lines emitted right after `@startuml`
    pub directives: Vec<String>,
    /// Render an interface block per path when the document has `paths`
    pub include_paths: bool,
    /// Spaces used to indent block bodies
    pub indent: usize,
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enum_limit(mut self, enum_limit: usize) -> Self {
        self.enum_limit = enum_limit;
        self
    }

    pub fn with_directives<I, S>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directives = directives.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_paths(mut self, include_paths: bool) -> Self {
        self.include_paths = include_paths;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            enum_limit: DEFAULT_ENUM_LIMIT,
            directives: vec![
                "hide empty members".to_string(),
                "set namespaceSeparator none".to_string(),
            ],
            include_paths: true,
            indent: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{}", i)).collect()
    }

    #[test]
    fn test_arrow_tokens() {
        assert_eq!(RelationshipKind::Association.arrow(), "..>");
        assert_eq!(RelationshipKind::Inheritance.arrow(), "--|>");
        assert_eq!(RelationshipKind::Inheritance.to_string(), "inheritance");
    }

    #[test]
    fn test_primitive_types() {
        assert!(is_primitive_type("string"));
        assert!(is_primitive_type("xs:string"));
        assert!(is_primitive_type("xs:dateTime"));
        assert!(is_primitive_type("integer"));
        assert!(!is_primitive_type("UInt16"));
        assert!(!is_primitive_type("temperatureUnitType"));
    }

    #[test]
    fn test_base_type_name() {
        assert_eq!(base_type_name("Tag[]"), "Tag");
        assert_eq!(base_type_name("Tag[][]"), "Tag");
        assert_eq!(base_type_name("Category"), "Category");
    }

    #[test]
    fn test_diagram_name_quotes_non_identifiers() {
        assert_eq!(diagram_name("Pet"), "Pet");
        assert_eq!(diagram_name("_Base2"), "_Base2");
        assert_eq!(diagram_name("api.v1.Pet"), "\"api.v1.Pet\"");
        assert_eq!(diagram_name("pet-tag"), "\"pet-tag\"");
        assert_eq!(diagram_name("2fa"), "\"2fa\"");
    }

    #[test]
    fn test_bold_markup() {
        assert_eq!(bold("id"), "<b>id</b>");
        assert_eq!(strip_bold("<b>id</b>"), ("id", true));
        assert_eq!(strip_bold("id"), ("id", false));
        assert_eq!(strip_bold("<b>id"), ("<b>id", false));
    }

    #[test]
    fn test_cap_enum_values_short_list_untouched() {
        assert_eq!(cap_enum_values(values(3), 10), values(3));
        assert_eq!(cap_enum_values(values(10), 10), values(10));
    }

    #[test]
    fn test_cap_enum_values_long_list() {
        let capped = cap_enum_values(values(25), 10);
        assert_eq!(capped.len(), 11);
        assert_eq!(&capped[..10], &values(10)[..]);
        assert_eq!(capped[10], ENUM_SENTINEL);
    }

    #[test]
    fn test_cap_enum_values_keeps_existing_sentinel() {
        let mut input = values(10);
        input.push(ENUM_SENTINEL.to_string());
        let capped = cap_enum_values(input.clone(), 10);
        assert_eq!(capped, input);
    }

    #[test]
    fn test_config_defaults() {
        let parse = ParseConfig::default();
        assert!(!parse.strict);
        assert_eq!(parse.enum_limit, 10);

        let generate = GenerateConfig::default();
        assert_eq!(generate.enum_limit, 10);
        assert!(generate.include_paths);
        assert_eq!(generate.indent, 4);
        assert_eq!(generate.directives.len(), 2);
    }

    #[test]
    fn test_config_builders() {
        let config = GenerateConfig::new()
            .with_directives(["hide circle"])
            .with_paths(false)
            .with_indent(2)
            .with_enum_limit(5);
        assert_eq!(config.directives, vec!["hide circle".to_string()]);
        assert!(!config.include_paths);
        assert_eq!(config.indent, 2);
        assert_eq!(config.enum_limit, 5);

        assert!(ParseConfig::new().with_strict(true).strict);
    }
}

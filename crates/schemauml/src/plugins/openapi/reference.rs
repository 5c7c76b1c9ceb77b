//! `$ref` pointers

use serde::Serialize;

/// Resolve a schema pointer to the bare model name
///
/// Only the last path segment matters, whatever container precedes it:
/// `#/definitions/Pet`, `#/components/schemas/Pet` and `Pet` all give `Pet`.
pub fn resolve_ref(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}

/// A `$ref` pointer together with the model name it resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRef {
    /// Pointer exactly as written in the document
    pub pointer: String,
    pub name: String,
}

impl SchemaRef {
    pub fn new(pointer: impl Into<String>) -> Self {
        let pointer = pointer.into();
        let name = resolve_ref(&pointer).to_string();
        Self { pointer, name }
    }
}

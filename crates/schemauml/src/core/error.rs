//! Core error types for diagram processing
//!
//! This module defines the typed conditions surfaced by both directions of the
//! pipeline: diagram parsing and schema-to-diagram generation.

use thiserror::Error;

/// Result alias for operations that surface a typed [`DiagramError`]
pub type DiagramResult<T> = std::result::Result<T, DiagramError>;

/// Core error types for diagram processing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Not found: no class or enum named '{name}'")]
    NotFound { name: String },

    #[error("Unresolved reference: '{pointer}' in model '{model}'")]
    UnresolvedReference { pointer: String, model: String },

    #[error("Cyclic reference: {}", cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    #[error("Unsupported schema: property '{property}' of model '{model}': {reason}")]
    UnsupportedSchema {
        model: String,
        property: String,
        reason: String,
    },

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },
}

impl DiagramError {
    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a new not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a new unresolved reference error
    pub fn unresolved_reference(pointer: impl Into<String>, model: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            pointer: pointer.into(),
            model: model.into(),
        }
    }

    /// Create a new cyclic reference error from the names on the cycle
    pub fn cyclic_reference(cycle: Vec<String>) -> Self {
        Self::CyclicReference { cycle }
    }

    /// Create a new unsupported schema error
    pub fn unsupported_schema(
        model: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedSchema {
            model: model.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid document error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}

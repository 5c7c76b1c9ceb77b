//! Swagger 2 / OpenAPI 3 document shapes

use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

use crate::core::{DiagramError, DiagramResult};

/// Which API description format a decoded document follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Models under `definitions`, request bodies as `in: body` parameters
    Swagger2,
    /// Models under `components.schemas`, request bodies under `requestBody`
    OpenApi3,
}

impl SchemaDialect {
    /// Detect the dialect from the version key, falling back to where the models live
    pub fn detect(document: &Value) -> DiagramResult<Self> {
        let root = document
            .as_object()
            .ok_or_else(|| DiagramError::invalid_document("document root is not a mapping"))?;

        let dialect = if root.contains_key("swagger") {
            SchemaDialect::Swagger2
        } else if root.contains_key("openapi") || root.contains_key("components") {
            SchemaDialect::OpenApi3
        } else if root.contains_key("definitions") {
            SchemaDialect::Swagger2
        } else {
            return Err(DiagramError::invalid_document(
                "expected a swagger or openapi document with definitions or components.schemas",
            ));
        };

        debug!(dialect = %dialect, "Detected schema dialect");
        Ok(dialect)
    }

    /// Named model schemas, if the document has any
    pub fn models<'a>(&self, document: &'a Value) -> Option<&'a Map<String, Value>> {
        let container = match self {
            SchemaDialect::Swagger2 => document.get("definitions"),
            SchemaDialect::OpenApi3 => document.get("components").and_then(|c| c.get("schemas")),
        };
        container.and_then(Value::as_object)
    }

    /// Path items keyed by path string
    pub fn paths<'a>(&self, document: &'a Value) -> Option<&'a Map<String, Value>> {
        document.get("paths").and_then(Value::as_object)
    }
}

impl fmt::Display for SchemaDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDialect::Swagger2 => write!(f, "swagger2"),
            SchemaDialect::OpenApi3 => write!(f, "openapi3"),
        }
    }
}

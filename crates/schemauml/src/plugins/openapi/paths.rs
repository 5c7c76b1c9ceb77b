//! Path interfaces
//!
//! Each path string becomes an interface with one method per operation. This
//! rendering is independent of the model classes: parameters are typed
//! leniently and never produce relationships.

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use super::property::declared_type;
use super::{resolve_ref, SchemaDialect};
use crate::core::bold;

/// HTTP verbs in the order operations are emitted
pub const OPERATION_VERBS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Name and display type of an operation parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

/// One operation on a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub verb: String,
    pub operation_id: String,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    /// Method text after the method marker: `<b>post</b> addPet(body: Pet)`
    pub fn signature(&self) -> String {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name, p.type_name))
            .collect();
        format!(
            "{} {}({})",
            bold(&self.verb),
            self.operation_id,
            parameters.join(", ")
        )
    }
}

/// A path and its operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathInterface {
    pub path: String,
    pub operations: Vec<Operation>,
}

impl PathInterface {
    /// Read a path item; unknown keys and malformed operations are ignored
    pub fn from_path_item(path: &str, item: &Value, dialect: SchemaDialect) -> Self {
        let shared = item
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let operations = OPERATION_VERBS
            .into_iter()
            .filter_map(|verb| {
                let operation = item.get(verb)?.as_object()?;
                let operation_id = operation
                    .get("operationId")
                    .and_then(Value::as_str)
                    .unwrap_or(verb)
                    .to_string();

                let own = operation
                    .get("parameters")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let mut parameters: Vec<Parameter> = shared
                    .iter()
                    .chain(own)
                    .filter_map(|p| parameter(p, dialect))
                    .collect();

                if dialect == SchemaDialect::OpenApi3 {
                    if let Some(body) = operation.get("requestBody") {
                        parameters.push(Parameter {
                            name: "body".to_string(),
                            type_name: request_body_type(body),
                        });
                    }
                }

                Some(Operation {
                    verb: verb.to_string(),
                    operation_id,
                    parameters,
                })
            })
            .collect::<Vec<_>>();

        trace!(path, operations = operations.len(), "Read path interface");
        Self {
            path: path.to_string(),
            operations,
        }
    }
}

fn parameter(value: &Value, dialect: SchemaDialect) -> Option<Parameter> {
    let Some(name) = value.get("name").and_then(Value::as_str) else {
        // Shared parameter references are not inlined
        trace!("Skipping parameter without a name");
        return None;
    };

    let schema = match dialect {
        SchemaDialect::Swagger2 if value.get("in").and_then(Value::as_str) != Some("body") => value,
        _ => value.get("schema").unwrap_or(value),
    };

    Some(Parameter {
        name: name.to_string(),
        type_name: display_type(schema),
    })
}

fn request_body_type(body: &Value) -> String {
    if let Some(pointer) = body.get("$ref").and_then(Value::as_str) {
        return resolve_ref(pointer).to_string();
    }
    body.get("content")
        .and_then(Value::as_object)
        .and_then(|content| content.values().next())
        .and_then(|media| media.get("schema"))
        .map(display_type)
        .unwrap_or_else(|| "object".to_string())
}

/// Best-effort type name for a parameter schema
fn display_type(schema: &Value) -> String {
    if let Some(pointer) = schema.get("$ref").and_then(Value::as_str) {
        return resolve_ref(pointer).to_string();
    }
    match declared_type(schema) {
        Some("array") => match schema.get("items") {
            Some(items) => format!("{}[]", display_type(items)),
            None => "array".to_string(),
        },
        Some(name) => name.to_string(),
        None => "object".to_string(),
    }
}

//! Model properties and their rendered types

use serde::Serialize;
use serde_json::Value;

use super::SchemaRef;
use crate::core::{bold, cap_enum_values, DiagramError, DiagramResult, FIELD_MARKER};

/// Type of a model property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PropertyType {
    /// Declared schema type, with optional format and inline enumeration
    Primitive {
        name: String,
        format: Option<String>,
        values: Vec<String>,
    },
    /// `$ref` to a named model
    Reference(SchemaRef),
    /// `type: array` with the item type
    Array(Box<PropertyType>),
}

impl PropertyType {
    /// Type a property schema
    ///
    /// `model` and `property` only label the error.
    pub fn from_schema(model: &str, property: &str, schema: &Value) -> DiagramResult<Self> {
        let unsupported = |reason: &str| DiagramError::unsupported_schema(model, property, reason);

        if !schema.is_object() {
            return Err(unsupported("property schema is not a mapping"));
        }

        if let Some(pointer) = schema.get("$ref").and_then(Value::as_str) {
            return Ok(PropertyType::Reference(SchemaRef::new(pointer)));
        }

        // allOf: [{$ref}] is how OpenAPI 3 attaches a description to a reference
        if let Some(pointer) = single_ref_wrapper(schema) {
            return Ok(PropertyType::Reference(SchemaRef::new(pointer)));
        }

        match declared_type(schema) {
            Some("array") => {
                let items = schema
                    .get("items")
                    .ok_or_else(|| unsupported("array without items"))?;
                let item_type = Self::from_schema(model, property, items)?;
                Ok(PropertyType::Array(Box::new(item_type)))
            }
            Some(name) => Ok(PropertyType::Primitive {
                name: name.to_string(),
                format: schema
                    .get("format")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                values: enum_literals(schema),
            }),
            None => Err(unsupported("expected a type, a $ref or an array with items")),
        }
    }

    /// Innermost reference, looking through arrays
    pub fn reference(&self) -> Option<&SchemaRef> {
        match self {
            PropertyType::Reference(reference) => Some(reference),
            PropertyType::Array(inner) => inner.reference(),
            PropertyType::Primitive { .. } => None,
        }
    }

    /// Type text as written after the field marker
    ///
    /// `integer (int64)`, `Tag[]`, `string {available, pending, sold}`
    pub fn render(&self, enum_limit: usize) -> String {
        match self {
            PropertyType::Primitive {
                name,
                format,
                values,
            } => {
                let mut text = name.clone();
                if let Some(format) = format {
                    text.push_str(&format!(" ({})", format));
                }
                if !values.is_empty() {
                    let values = cap_enum_values(values.clone(), enum_limit);
                    text.push_str(&format!(" {{{}}}", values.join(", ")));
                }
                text
            }
            PropertyType::Reference(reference) => reference.name.clone(),
            PropertyType::Array(inner) => format!("{}[]", inner.render(enum_limit)),
        }
    }
}

/// A named property of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub ty: PropertyType,
    pub required: bool,
}

impl Property {
    pub fn from_schema(
        model: &str,
        name: &str,
        schema: &Value,
        required: bool,
    ) -> DiagramResult<Self> {
        Ok(Self {
            name: name.to_string(),
            ty: PropertyType::from_schema(model, name, schema)?,
            required,
        })
    }

    /// Field line without indentation: `{field} <type> <name>`, name bold when required
    pub fn uml_line(&self, enum_limit: usize) -> String {
        let name = if self.required {
            bold(&self.name)
        } else {
            self.name.clone()
        };
        format!("{} {} {}", FIELD_MARKER, self.ty.render(enum_limit), name)
    }
}

/// Read every property of an object schema, in document order
///
/// `required` is taken from the same schema's own `required` list.
pub fn object_properties(model: &str, schema: &Value) -> DiagramResult<Vec<Property>> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };

    properties
        .iter()
        .map(|(name, property)| {
            Property::from_schema(model, name, property, required.contains(&name.as_str()))
        })
        .collect()
}

/// Declared `type`; for OpenAPI 3.1 type lists, the first entry that is not `null`
pub(crate) fn declared_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(name) => Some(name.as_str()),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null"),
        _ => None,
    }
}

/// Values of an inline `enum`, as text
pub(crate) fn enum_literals(schema: &Value) -> Vec<String> {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .map(|value| match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn single_ref_wrapper(schema: &Value) -> Option<&str> {
    match schema.get("allOf")?.as_array()?.as_slice() {
        [only] => only.get("$ref")?.as_str(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property(name: &str, schema: Value, required: bool) -> Property {
        Property::from_schema("Pet", name, &schema, required).unwrap()
    }

    #[test]
    fn test_required_string_is_bold() {
        let p = property("name", json!({"type": "string", "description": "pet name"}), true);
        assert!(p.required);
        assert_eq!(p.uml_line(10), "{field} string <b>name</b>");
    }

    #[test]
    fn test_reference_property() {
        let p = property("category", json!({"$ref": "#/definitions/Category"}), false);
        assert_eq!(p.ty.reference().unwrap().name, "Category");
        assert_eq!(p.uml_line(10), "{field} Category category");
    }

    #[test]
    fn test_array_of_references() {
        let p = property(
            "tags",
            json!({"type": "array", "items": {"$ref": "#/definitions/Tag"}}),
            false,
        );
        assert_eq!(p.ty.reference().unwrap().name, "Tag");
        assert_eq!(p.uml_line(10), "{field} Tag[] tags");
    }

    #[test]
    fn test_nested_array() {
        let p = property(
            "grid",
            json!({"type": "array", "items": {"type": "array", "items": {"type": "integer"}}}),
            false,
        );
        assert_eq!(p.ty.render(10), "integer[][]");
        assert!(p.ty.reference().is_none());
    }

    #[test]
    fn test_format_qualifier() {
        let p = property("id", json!({"type": "integer", "format": "int64"}), true);
        assert_eq!(p.uml_line(10), "{field} integer (int64) <b>id</b>");
    }

    #[test]
    fn test_inline_enum_is_capped() {
        let values: Vec<String> = (1..=12).map(|i| format!("s{}", i)).collect();
        let p = property("status", json!({"type": "string", "enum": values}), false);
        assert_eq!(
            p.ty.render(10),
            "string {s1, s2, s3, s4, s5, s6, s7, s8, s9, s10, ...}"
        );
    }

    #[test]
    fn test_single_ref_all_of_wrapper() {
        let p = property(
            "owner",
            json!({"allOf": [{"$ref": "#/components/schemas/User"}], "description": "owner"}),
            false,
        );
        assert_eq!(p.ty.reference().unwrap().name, "User");
    }

    #[test]
    fn test_openapi_31_type_list() {
        let p = property("nickname", json!({"type": ["null", "string"]}), false);
        assert_eq!(p.ty.render(10), "string");
    }

    #[test]
    fn test_array_without_items_is_unsupported() {
        let err = PropertyType::from_schema("Pet", "tags", &json!({"type": "array"})).unwrap_err();
        assert_eq!(
            err,
            DiagramError::unsupported_schema("Pet", "tags", "array without items")
        );
    }

    #[test]
    fn test_untyped_property_is_unsupported() {
        let err =
            PropertyType::from_schema("Pet", "blob", &json!({"description": "?"})).unwrap_err();
        assert!(matches!(err, DiagramError::UnsupportedSchema { ref property, .. } if property == "blob"));
    }

    #[test]
    fn test_object_properties_order_and_required() {
        let schema = json!({
            "type": "object",
            "required": ["id"],
            "properties": {
                "name": {"type": "string"},
                "id": {"type": "integer"}
            }
        });
        let props = object_properties("Pet", &schema).unwrap();
        let names: Vec<_> = props.iter().map(|p| (p.name.as_str(), p.required)).collect();
        assert_eq!(names, vec![("name", false), ("id", true)]);
    }
}

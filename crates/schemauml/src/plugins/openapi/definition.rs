//! Named model schemas

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use super::property::{declared_type, enum_literals, object_properties};
use super::{Property, PropertyType, SchemaRef};
use crate::core::{DiagramError, DiagramResult};

/// Whether a model renders as a class or an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DefinitionKind {
    Class,
    /// Enumeration values as text, uncapped
    Enum(Vec<String>),
}

/// A named model, flattened to its own properties and parent references
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    /// Declared schema type (`object` for compositions and aliases)
    pub schema_type: String,
    /// Set when the model carries a `discriminator`
    pub is_abstract: bool,
    /// Own properties in declaration order, across `allOf` fragments
    pub properties: Vec<Property>,
    /// `allOf` references and `$ref` aliases, in declaration order
    pub parents: Vec<SchemaRef>,
    /// Item type of a top-level array model
    pub items: Option<PropertyType>,
}

impl Definition {
    fn new(name: &str, kind: DefinitionKind, schema_type: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            schema_type: schema_type.to_string(),
            is_abstract: false,
            properties: Vec::new(),
            parents: Vec::new(),
            items: None,
        }
    }

    /// Flatten one named model schema
    ///
    /// Parent properties are never copied in; see
    /// [`SchemaDatabase::effective_properties`](super::SchemaDatabase::effective_properties).
    pub fn from_schema(name: &str, schema: &Value) -> DiagramResult<Self> {
        if !schema.is_object() {
            return Err(DiagramError::unsupported_schema(
                name,
                "",
                "model schema is not a mapping",
            ));
        }

        let literals = enum_literals(schema);
        if schema.get("enum").is_some() {
            trace!(model = name, values = literals.len(), "Model is an enumeration");
            for literal in &literals {
                check_enum_literal(name, literal)?;
            }
            let schema_type = declared_type(schema).unwrap_or("string");
            return Ok(Self::new(name, DefinitionKind::Enum(literals), schema_type));
        }

        let mut definition = Self::new(
            name,
            DefinitionKind::Class,
            declared_type(schema).unwrap_or("object"),
        );
        definition.is_abstract = schema.get("discriminator").is_some();

        if let Some(pointer) = schema.get("$ref").and_then(Value::as_str) {
            trace!(model = name, pointer, "Model is an alias");
            definition.schema_type = "object".to_string();
            definition.parents.push(SchemaRef::new(pointer));
            return Ok(definition);
        }

        if let Some(fragments) = schema.get("allOf").and_then(Value::as_array) {
            definition.schema_type = "object".to_string();
            for (index, fragment) in fragments.iter().enumerate() {
                if let Some(pointer) = fragment.get("$ref").and_then(Value::as_str) {
                    definition.parents.push(SchemaRef::new(pointer));
                } else if fragment.is_object() {
                    definition.is_abstract |= fragment.get("discriminator").is_some();
                    definition
                        .properties
                        .extend(object_properties(name, fragment)?);
                } else {
                    return Err(DiagramError::unsupported_schema(
                        name,
                        format!("allOf[{}]", index),
                        "fragment is neither a $ref nor an inline schema",
                    ));
                }
            }
        }

        if definition.schema_type == "array" {
            let items = schema.get("items").ok_or_else(|| {
                DiagramError::unsupported_schema(name, "items", "array without items")
            })?;
            definition.items = Some(PropertyType::from_schema(name, "items", items)?);
        }

        // Properties beside allOf belong to the model itself
        definition
            .properties
            .extend(object_properties(name, schema)?);

        trace!(
            model = name,
            properties = definition.properties.len(),
            parents = definition.parents.len(),
            "Flattened model"
        );
        Ok(definition)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, DefinitionKind::Enum(_))
    }

    /// Referenced model names, one per target, in first-use order
    pub fn associations(&self) -> Vec<&SchemaRef> {
        let mut targets: Vec<&SchemaRef> = Vec::new();
        let referenced = self
            .properties
            .iter()
            .filter_map(|p| p.ty.reference())
            .chain(self.items.as_ref().and_then(PropertyType::reference));
        for reference in referenced {
            if !targets.iter().any(|t| t.name == reference.name) {
                targets.push(reference);
            }
        }
        targets
    }

    /// Every pointer this model uses, parents included
    pub fn references(&self) -> impl Iterator<Item = &SchemaRef> {
        self.properties
            .iter()
            .filter_map(|p| p.ty.reference())
            .chain(self.items.as_ref().and_then(PropertyType::reference))
            .chain(self.parents.iter())
    }
}

/// An enum body line must read back as exactly this literal
fn check_enum_literal(model: &str, literal: &str) -> DiagramResult<()> {
    let reason = if literal.trim().is_empty() {
        "empty enum literal"
    } else if literal.trim() != literal {
        "enum literal with surrounding whitespace"
    } else if literal.contains(|c| c == '\n' || c == '\r') {
        "enum literal spans lines"
    } else if literal == "}" || literal.starts_with("@enduml") {
        "enum literal would end the enum block"
    } else {
        return Ok(());
    };
    Err(DiagramError::unsupported_schema(model, "enum", reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pet_definition() {
        let d = Definition::from_schema(
            "Pet",
            &json!({
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "format": "int64"},
                    "category": {"$ref": "#/definitions/Category"},
                    "tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}}
                },
                "required": ["id"]
            }),
        )
        .unwrap();

        assert_eq!(d.kind, DefinitionKind::Class);
        assert_eq!(d.schema_type, "object");
        assert!(d.properties[0].required);
        let targets: Vec<_> = d.associations().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(targets, vec!["Category", "Tag"]);
    }

    #[test]
    fn test_all_of_parents_and_inline_fragment() {
        let d = Definition::from_schema(
            "Combined",
            &json!({
                "allOf": [
                    {"$ref": "#/definitions/Base"},
                    {"type": "object", "properties": {"name": {"type": "string"}}, "required": ["name"]}
                ]
            }),
        )
        .unwrap();

        assert_eq!(d.schema_type, "object");
        assert_eq!(d.parents, vec![SchemaRef::new("#/definitions/Base")]);
        assert_eq!(d.properties.len(), 1);
        assert_eq!(d.properties[0].name, "name");
        assert!(d.properties[0].required);
    }

    #[test]
    fn test_all_of_keeps_duplicate_names_in_fragment_order() {
        let d = Definition::from_schema(
            "Twice",
            &json!({
                "allOf": [
                    {"properties": {"x": {"type": "string"}}},
                    {"properties": {"x": {"type": "integer"}}}
                ]
            }),
        )
        .unwrap();
        let types: Vec<_> = d.properties.iter().map(|p| p.ty.render(10)).collect();
        assert_eq!(types, vec!["string", "integer"]);
    }

    #[test]
    fn test_enum_definition() {
        let d = Definition::from_schema(
            "Status",
            &json!({"type": "string", "enum": ["available", "pending", "sold"]}),
        )
        .unwrap();
        assert!(d.is_enum());
        assert_eq!(
            d.kind,
            DefinitionKind::Enum(vec![
                "available".to_string(),
                "pending".to_string(),
                "sold".to_string()
            ])
        );
    }

    #[test]
    fn test_unreadable_enum_literals_are_unsupported() {
        for literal in ["", "  ", " padded", "two\nlines", "}", "@enduml"] {
            let err = Definition::from_schema("E", &json!({"enum": ["ok", literal]})).unwrap_err();
            assert!(
                matches!(err, DiagramError::UnsupportedSchema { ref property, .. } if property == "enum"),
                "{:?} should be rejected",
                literal
            );
        }

        let d = Definition::from_schema("E", &json!({"enum": ["@home", "'quoted'", "{x}"]})).unwrap();
        assert!(d.is_enum());
    }

    #[test]
    fn test_discriminator_marks_abstract() {
        let d = Definition::from_schema(
            "Animal",
            &json!({"type": "object", "discriminator": "kind", "properties": {"kind": {"type": "string"}}}),
        )
        .unwrap();
        assert!(d.is_abstract);
    }

    #[test]
    fn test_alias_and_array_models() {
        let alias = Definition::from_schema("Dog", &json!({"$ref": "#/definitions/Pet"})).unwrap();
        assert_eq!(alias.parents[0].name, "Pet");
        assert!(alias.properties.is_empty());

        let list = Definition::from_schema(
            "Pets",
            &json!({"type": "array", "items": {"$ref": "#/definitions/Pet"}}),
        )
        .unwrap();
        assert_eq!(list.associations()[0].name, "Pet");
        assert!(list.parents.is_empty());
    }

    #[test]
    fn test_bad_fragment_is_unsupported() {
        let err = Definition::from_schema("X", &json!({"allOf": [42]})).unwrap_err();
        assert!(matches!(err, DiagramError::UnsupportedSchema { ref property, .. } if property == "allOf[0]"));
    }

    #[test]
    fn test_references_include_parents() {
        let d = Definition::from_schema(
            "Combined",
            &json!({"allOf": [{"$ref": "#/definitions/Base"}], "properties": {"t": {"$ref": "#/definitions/Tag"}}}),
        )
        .unwrap();
        let names: Vec<_> = d.references().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tag", "Base"]);
    }
}

//! Reference resolution and schema flattening
//!
//! Reads every named model of a decoded document, checks that each `$ref`
//! names a model that exists and that no model inherits from itself, and only
//! then fills the [`SchemaDatabase`]. A failing document leaves the database
//! untouched.

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, span, trace, Level};

use super::{Definition, PathInterface, SchemaDatabase, SchemaDialect};
use crate::core::{DiagramError, DiagramResult, Relationship};

/// Builds a [`SchemaDatabase`] from a decoded Swagger/OpenAPI document
pub struct SchemaResolver;

impl SchemaResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, document: &Value, database: &mut SchemaDatabase) -> DiagramResult<()> {
        let resolve_span = span!(Level::INFO, "resolve_schema");
        let _enter = resolve_span.enter();

        let dialect = SchemaDialect::detect(document)?;

        let mut definitions: IndexMap<String, Definition> = IndexMap::new();
        if let Some(models) = dialect.models(document) {
            for (name, schema) in models {
                definitions.insert(name.clone(), Definition::from_schema(name, schema)?);
            }
        }
        debug!(models = definitions.len(), "Read model definitions");

        check_references(&definitions)?;
        check_inheritance_cycles(&definitions)?;

        let interfaces: Vec<PathInterface> = dialect
            .paths(document)
            .map(|paths| {
                paths
                    .iter()
                    .map(|(path, item)| PathInterface::from_path_item(path, item, dialect))
                    .collect()
            })
            .unwrap_or_default();

        database.set_dialect(dialect);
        for definition in definitions.into_values() {
            for target in definition.associations() {
                database.add_relationship(Relationship::association(
                    definition.name.as_str(),
                    target.name.as_str(),
                ));
            }
            let mut parents: IndexSet<&str> = IndexSet::new();
            for parent in &definition.parents {
                if parents.insert(parent.name.as_str()) {
                    database.add_relationship(Relationship::inheritance(
                        definition.name.as_str(),
                        parent.name.as_str(),
                    ));
                }
            }
            database.add_definition(definition);
        }
        for interface in interfaces {
            database.add_interface(interface);
        }

        debug!(
            definitions = database.definitions().len(),
            interfaces = database.interfaces().len(),
            relationships = database.relationships().len(),
            "Schema resolved"
        );
        Ok(())
    }
}

impl Default for SchemaResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn check_references(definitions: &IndexMap<String, Definition>) -> DiagramResult<()> {
    for definition in definitions.values() {
        for reference in definition.references() {
            trace!(model = %definition.name, pointer = %reference.pointer, "Checking reference");
            if !definitions.contains_key(&reference.name) {
                return Err(DiagramError::unresolved_reference(
                    reference.pointer.as_str(),
                    definition.name.as_str(),
                ));
            }
        }
    }
    Ok(())
}

/// Fail on the first parent chain that returns to a model already on it
fn check_inheritance_cycles(definitions: &IndexMap<String, Definition>) -> DiagramResult<()> {
    let mut finished = IndexSet::new();
    let mut stack = Vec::new();
    for name in definitions.keys() {
        visit(name, definitions, &mut stack, &mut finished)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    definitions: &'a IndexMap<String, Definition>,
    stack: &mut Vec<&'a str>,
    finished: &mut IndexSet<&'a str>,
) -> DiagramResult<()> {
    if finished.contains(name) {
        return Ok(());
    }
    if let Some(start) = stack.iter().position(|on_stack| *on_stack == name) {
        let mut cycle: Vec<String> = stack[start..].iter().map(|n| n.to_string()).collect();
        cycle.push(name.to_string());
        return Err(DiagramError::cyclic_reference(cycle));
    }

    stack.push(name);
    if let Some(definition) = definitions.get(name) {
        for parent in &definition.parents {
            visit(&parent.name, definitions, stack, finished)?;
        }
    }
    stack.pop();
    finished.insert(name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RelationshipKind;
    use serde_json::json;

    fn resolve(document: Value) -> DiagramResult<SchemaDatabase> {
        let mut db = SchemaDatabase::new();
        SchemaResolver::new().resolve(&document, &mut db)?;
        Ok(db)
    }

    #[test]
    fn test_relationships_per_model() {
        let db = resolve(json!({
            "swagger": "2.0",
            "definitions": {
                "Pet": {
                    "type": "object",
                    "properties": {
                        "category": {"$ref": "#/definitions/Category"},
                        "tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}},
                        "other": {"$ref": "#/definitions/Category"}
                    }
                },
                "Category": {"type": "object"},
                "Tag": {"type": "object"}
            }
        }))
        .unwrap();

        let edges: Vec<_> = db
            .relationships()
            .iter()
            .map(|r| (r.source.as_str(), r.destination.as_str(), r.kind))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("Pet", "Category", RelationshipKind::Association),
                ("Pet", "Tag", RelationshipKind::Association),
            ]
        );
    }

    #[test]
    fn test_all_of_inheritance() {
        let db = resolve(json!({
            "openapi": "3.0.0",
            "components": {"schemas": {
                "Base": {"type": "object", "properties": {"id": {"type": "integer"}}, "required": ["id"]},
                "Extended": {"type": "object", "properties": {"name": {"type": "string"}}},
                "Combined": {"allOf": [
                    {"$ref": "#/components/schemas/Base"},
                    {"$ref": "#/components/schemas/Extended"}
                ]}
            }}
        }))
        .unwrap();

        let parents: Vec<_> = db
            .relationships_from("Combined")
            .map(|r| r.destination.as_str())
            .collect();
        assert_eq!(parents, vec!["Base", "Extended"]);
        let names: Vec<_> = db
            .effective_properties("Combined")
            .unwrap()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(db.dialect(), Some(SchemaDialect::OpenApi3));
    }

    #[test]
    fn test_unresolved_reference() {
        let err = resolve(json!({
            "swagger": "2.0",
            "definitions": {"Pet": {"properties": {"owner": {"$ref": "#/definitions/Owner"}}}}
        }))
        .unwrap_err();
        assert_eq!(
            err,
            DiagramError::unresolved_reference("#/definitions/Owner", "Pet")
        );
    }

    #[test]
    fn test_inheritance_cycle() {
        let err = resolve(json!({
            "swagger": "2.0",
            "definitions": {
                "A": {"allOf": [{"$ref": "#/definitions/B"}]},
                "B": {"allOf": [{"$ref": "#/definitions/C"}]},
                "C": {"$ref": "#/definitions/A"}
            }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            DiagramError::cyclic_reference(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "A".to_string()
            ])
        );
    }

    #[test]
    fn test_self_reference_through_property_is_not_a_cycle() {
        let db = resolve(json!({
            "swagger": "2.0",
            "definitions": {"Node": {"properties": {"next": {"$ref": "#/definitions/Node"}}}}
        }))
        .unwrap();
        assert_eq!(db.relationships().len(), 1);
        assert_eq!(db.relationships()[0].destination, "Node");
    }

    #[test]
    fn test_failure_leaves_database_untouched() {
        let mut db = SchemaDatabase::new();
        let result = SchemaResolver::new().resolve(
            &json!({"swagger": "2.0", "definitions": {"A": {"type": "array"}}}),
            &mut db,
        );
        assert!(result.is_err());
        assert!(db.definitions().is_empty());
        assert!(db.dialect().is_none());
    }

    #[test]
    fn test_paths_become_interfaces() {
        let db = resolve(json!({
            "swagger": "2.0",
            "definitions": {},
            "paths": {"/pet": {"post": {"operationId": "addPet"}}, "/store": {"get": {"operationId": "inv"}}}
        }))
        .unwrap();
        let paths: Vec<_> = db.interfaces().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/pet", "/store"]);
    }
}

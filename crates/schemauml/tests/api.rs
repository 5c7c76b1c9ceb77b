//! Tests for the public API and plugin traits

use schemauml::prelude::*;
use schemauml::{generate_with_config, model_from_schema, parse};
use serde_json::{json, Value};

fn document() -> Value {
    json!({
        "swagger": "2.0",
        "definitions": {
            "Order": {
                "type": "object",
                "required": ["id"],
                "properties": {
                    "id": {"type": "integer", "format": "int64"},
                    "status": {"type": "string", "enum": ["placed", "approved", "delivered"]},
                    "pet": {"$ref": "#/definitions/Pet"}
                }
            },
            "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
            "Status": {"type": "string", "enum": ["available", "sold"]}
        }
    })
}

#[test]
fn test_parser_plugin_metadata() {
    let parser = PlantUmlParser::new();
    assert_eq!(Parser::<Model>::name(&parser), "plantuml");
    assert_eq!(Parser::<Model>::version(&parser), "0.1.0");
    assert!(parser.can_parse("@startuml\nclass A {\n}\n@enduml\n"));
    assert!(!parser.can_parse("graph TD; A-->B"));
}

#[test]
fn test_renderer_plugin_metadata() {
    let renderer = PlantUmlRenderer::new();
    assert_eq!(Renderer::<SchemaDatabase>::name(&renderer), "plantuml");
    assert_eq!(Renderer::<SchemaDatabase>::format(&renderer), "text/plantuml");
}

#[test]
fn test_detector() {
    let detector = PlantUmlDetector::new();
    assert_eq!(detector.diagram_type(), "plantuml-class");
    assert!(detector.detect("class A {\n{field} string name\n}"));
    assert!(!detector.detect("just some prose"));
    assert_eq!(detector.confidence(""), 0.0);
}

#[test]
fn test_parse_into_database_trait() {
    let parser = PlantUmlParser::new();
    let mut model = Model::new();
    parser
        .parse("class A {\n{field} B b\n}\nclass B {\n}\nB --|> A\n", &mut model)
        .unwrap();

    assert_eq!(model.node_count(), 2);
    assert_eq!(model.edge_count(), 2);
    assert!(model.get_node("A").is_some());
    let sources: Vec<_> = model.edges().map(|r| r.source.as_str()).collect();
    assert_eq!(sources, vec!["B", "A"]);

    model.clear();
    assert_eq!(model.node_count(), 0);
    assert_eq!(model.edge_count(), 0);
}

#[test]
fn test_schema_database_trait() {
    let mut database = SchemaDatabase::new();
    SchemaResolver::new().resolve(&document(), &mut database).unwrap();

    let names: Vec<_> = database.nodes().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Order", "Pet", "Status"]);
    assert!(database.get_node("Status").unwrap().is_enum());
    assert_eq!(database.edge_count(), 1);

    database.clear();
    assert_eq!(database.node_count(), 0);
    assert_eq!(database.dialect(), None);
}

#[test]
fn test_inline_enum_property() {
    let model = model_from_schema(&document()).unwrap();
    assert_eq!(
        model.get_class("Order").unwrap().field_type("status"),
        Some("string {placed, approved, delivered}")
    );
}

#[test]
fn test_model_from_schema_matches_parsed_diagram() {
    let config = GenerateConfig::new();
    let diagram = generate_with_config(&document(), config).unwrap();
    let parsed = parse(&diagram).unwrap();
    assert_eq!(parsed, model_from_schema(&document()).unwrap());
    assert_eq!(parsed.enum_count(), 1);
    assert_eq!(parsed.class_count(), 2);
}

#[test]
fn test_directives_and_indent() {
    let config = GenerateConfig::new()
        .with_directives(["hide empty members", "set namespaceSeparator none"])
        .with_indent(2);
    let diagram = generate_with_config(&document(), config).unwrap();
    assert!(diagram.starts_with("@startuml\nhide empty members\nset namespaceSeparator none\n\n"));
    assert!(diagram.contains("class Pet {\n  {field} string name\n}\n"));
    assert!(diagram.ends_with("@enduml\n"));

    // Directives are not part of the model
    let parsed = parse(&diagram).unwrap();
    assert_eq!(parsed, model_from_schema(&document()).unwrap());
}

#[test]
fn test_parse_config_enum_limit() {
    let values: Vec<String> = (0..6).map(|i| format!("v{}", i)).collect();
    let text = format!("enum E {{\n{}\n}}\n", values.join("\n"));
    let model = schemauml::parse_with_config(&text, ParseConfig::new().with_enum_limit(3)).unwrap();
    assert_eq!(
        model.get_enum("E").unwrap().values,
        vec!["v0", "v1", "v2", "..."]
    );
}

//! schemauml - Swagger/OpenAPI schemas as PlantUML class diagrams, and back
//!
//! Two directions share one domain model:
//!
//! - **Generate**: a decoded Swagger 2 or OpenAPI 3 document is resolved
//!   (`$ref` pointers, `allOf` composition, required flags) and rendered as
//!   PlantUML class diagram text.
//! - **Parse**: class diagram text in the same dialect is read back into a
//!   [`Model`] of classes, enumerations, fields and relationships.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let document = json!({
//!     "swagger": "2.0",
//!     "definitions": {
//!         "Pet": {
//!             "type": "object",
//!             "required": ["id"],
//!             "properties": {
//!                 "id": {"type": "integer", "format": "int64"},
//!                 "category": {"$ref": "#/definitions/Category"}
//!             }
//!         },
//!         "Category": {"type": "object", "properties": {"name": {"type": "string"}}}
//!     }
//! });
//!
//! let diagram = schemauml::generate(&document).unwrap();
//! assert!(diagram.contains("{field} integer (int64) <b>id</b>"));
//! assert!(diagram.contains("Pet ..> Category"));
//!
//! let model = schemauml::parse(&diagram).unwrap();
//! assert!(model.has_association("Pet", "Category"));
//! assert!(model.fields("Pet").unwrap()[0].required);
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use schemauml::prelude::*;
//! use serde_json::json;
//!
//! let document = json!({"openapi": "3.0.0", "components": {"schemas": {
//!     "Base": {"type": "object", "required": ["id"], "properties": {"id": {"type": "integer"}}},
//!     "Combined": {"allOf": [
//!         {"$ref": "#/components/schemas/Base"},
//!         {"type": "object", "properties": {"name": {"type": "string"}}}
//!     ]}
//! }}});
//!
//! let mut database = SchemaDatabase::new();
//! SchemaResolver::new().resolve(&document, &mut database).unwrap();
//! assert_eq!(database.effective_properties("Combined").unwrap().len(), 2);
//!
//! let renderer = PlantUmlRenderer::with_config(GenerateConfig::new().with_paths(false));
//! let diagram = renderer.render(&database).unwrap();
//! assert!(diagram.contains("Combined --|> Base"));
//! ```

pub mod core;
pub mod plugins;

pub use crate::core::*;

use serde_json::Value;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ClassEntity, Database, Detector, DiagramError, DiagramResult, EnumEntity, Field,
        GenerateConfig, Model, ParseConfig, Parser, Relationship, RelationshipKind, Renderer,
    };
    pub use crate::plugins::openapi::{
        Definition, PlantUmlRenderer, SchemaDatabase, SchemaDialect, SchemaResolver,
    };
    pub use crate::plugins::plantuml::{Diagnostic, PlantUmlDetector, PlantUmlParser};
}

/// Parse PlantUML class diagram text with default settings
///
/// Malformed lines are skipped; use [`parse_with_config`] for strict parsing.
///
/// # Example
/// ```rust
/// let model = schemauml::parse("class A {\n{field} B b\n}\nclass B {\n}\n").unwrap();
/// assert!(model.has_association("A", "B"));
/// ```
pub fn parse(input: &str) -> anyhow::Result<Model> {
    parse_with_config(input, ParseConfig::default())
}

/// Parse PlantUML class diagram text with the given settings
pub fn parse_with_config(input: &str, config: ParseConfig) -> anyhow::Result<Model> {
    use crate::core::Parser as _;
    use crate::plugins::plantuml::PlantUmlParser;

    let parser = PlantUmlParser::with_config(config);
    let mut model = Model::new();
    parser.parse(input, &mut model)?;
    Ok(model)
}

/// Render a decoded Swagger/OpenAPI document as PlantUML with default settings
///
/// # Returns
/// * `Ok(String)` - The complete diagram, `@startuml` to `@enduml`
/// * `Err` - A [`DiagramError`] for unresolved or cyclic references and
///   unsupported property shapes; no partial text is returned
pub fn generate(document: &Value) -> anyhow::Result<String> {
    generate_with_config(document, GenerateConfig::default())
}

/// Render a decoded Swagger/OpenAPI document with the given settings
pub fn generate_with_config(document: &Value, config: GenerateConfig) -> anyhow::Result<String> {
    use crate::core::Renderer as _;
    use crate::plugins::openapi::{PlantUmlRenderer, SchemaDatabase, SchemaResolver};

    let mut database = SchemaDatabase::new();
    SchemaResolver::new().resolve(document, &mut database)?;
    PlantUmlRenderer::with_config(config).render(&database)
}

/// Domain model of a decoded document, as parsing its generated diagram would give
pub fn model_from_schema(document: &Value) -> anyhow::Result<Model> {
    use crate::plugins::openapi::{SchemaDatabase, SchemaResolver};

    let mut database = SchemaDatabase::new();
    SchemaResolver::new().resolve(document, &mut database)?;
    Ok(database.to_model())
}

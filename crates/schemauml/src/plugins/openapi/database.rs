//! Resolved schema storage
//!
//! Holds the flattened definitions, the path interfaces and the relationship
//! list produced by [`SchemaResolver`](super::SchemaResolver), in document
//! order.

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::{Definition, DefinitionKind, PathInterface, Property, SchemaDialect};
use crate::core::{
    cap_enum_values, ClassEntity, Database, DiagramError, DiagramResult, EnumEntity, Field,
    GenerateConfig, Model, Relationship,
};

/// Database of resolved model definitions
#[derive(Debug, Clone, Default)]
pub struct SchemaDatabase {
    dialect: Option<SchemaDialect>,
    definitions: IndexMap<String, Definition>,
    interfaces: Vec<PathInterface>,
    relationships: Vec<Relationship>,
}

impl SchemaDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(&self) -> Option<SchemaDialect> {
        self.dialect
    }

    pub fn set_dialect(&mut self, dialect: SchemaDialect) {
        self.dialect = Some(dialect);
    }

    /// Add a definition, replacing any earlier one of the same name
    pub fn add_definition(&mut self, definition: Definition) {
        trace!(model = %definition.name, "Adding definition");
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn add_interface(&mut self, interface: PathInterface) {
        trace!(path = %interface.path, "Adding path interface");
        self.interfaces.push(interface);
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn definitions(&self) -> &IndexMap<String, Definition> {
        &self.definitions
    }

    pub fn get_definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn interfaces(&self) -> &[PathInterface] {
        &self.interfaces
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Relationships whose source is `name`, in insertion order
    pub fn relationships_from<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| r.source == name)
    }

    /// Full property set of a model: inherited properties first, then its own
    ///
    /// Parents are walked depth-first in declaration order and each ancestor
    /// contributes once.
    pub fn effective_properties(&self, name: &str) -> DiagramResult<Vec<&Property>> {
        let mut visited = IndexSet::new();
        let mut properties = Vec::new();
        self.collect_properties(name, &mut visited, &mut properties)?;
        debug!(model = name, count = properties.len(), "Collected effective properties");
        Ok(properties)
    }

    fn collect_properties<'a>(
        &'a self,
        name: &str,
        visited: &mut IndexSet<String>,
        properties: &mut Vec<&'a Property>,
    ) -> DiagramResult<()> {
        if !visited.insert(name.to_string()) {
            return Ok(());
        }
        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| DiagramError::not_found(name))?;
        for parent in &definition.parents {
            self.collect_properties(&parent.name, visited, properties)?;
        }
        properties.extend(definition.properties.iter());
        Ok(())
    }

    /// Domain model the rendered diagram describes, with default settings
    pub fn to_model(&self) -> Model {
        self.to_model_with(&GenerateConfig::default())
    }

    /// Domain model the diagram rendered with `config` describes
    ///
    /// Parsing that diagram yields an equal model.
    pub fn to_model_with(&self, config: &GenerateConfig) -> Model {
        let mut model = Model::new();
        for definition in self.definitions.values() {
            match &definition.kind {
                DefinitionKind::Enum(values) => {
                    let values = cap_enum_values(values.clone(), config.enum_limit);
                    model.add_enum(EnumEntity::new(definition.name.as_str()).with_values(values));
                }
                DefinitionKind::Class => {
                    let mut class = ClassEntity::new(definition.name.as_str())
                        .with_abstract(definition.is_abstract);
                    for property in &definition.properties {
                        class.add_field(
                            Field::new(property.name.as_str(), property.ty.render(config.enum_limit))
                                .with_required(property.required),
                        );
                    }
                    model.add_class(class);
                }
            }
        }

        for relationship in &self.relationships {
            model.add_relationship(relationship.clone());
        }

        if config.include_paths {
            for interface in &self.interfaces {
                let mut class = ClassEntity::interface(interface.path.as_str());
                for operation in &interface.operations {
                    class.add_method(operation.signature());
                }
                model.add_class(class);
            }
        }
        model
    }
}

impl Database for SchemaDatabase {
    type Node = Definition;
    type Edge = Relationship;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.add_definition(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_relationship(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.get_definition(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.definitions.values()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.relationships.iter()
    }

    fn clear(&mut self) {
        self.dialect = None;
        self.definitions.clear();
        self.interfaces.clear();
        self.relationships.clear();
    }

    fn node_count(&self) -> usize {
        self.definitions.len()
    }

    fn edge_count(&self) -> usize {
        self.relationships.len()
    }
}

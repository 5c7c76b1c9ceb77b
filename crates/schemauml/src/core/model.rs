//! Class diagram domain model
//!
//! Stores classes, enumerations, the abstract-class set and relationships.
//! Both the diagram parser and the schema generator produce this model, so it
//! is the contract the two directions agree on.

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, trace};

use super::{
    base_type_name, is_primitive_type, Database, DiagramError, DiagramResult, RelationshipKind,
};

/// A field declared in a class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    /// Rendered in bold; never part of the field's identity
    pub required: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Same name and type, ignoring the required flag
    pub fn same_as(&self, other: &Field) -> bool {
        self.name == other.name && self.type_name == other.type_name
    }
}

/// Declaration keyword a class was introduced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
}

/// A class (or path interface) in the diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassEntity {
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
    pub fields: Vec<Field>,
    pub methods: Vec<String>,
}

impl ClassEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            is_abstract: false,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::new(name)
        }
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn add_method(&mut self, signature: impl Into<String>) {
        self.methods.push(signature.into());
    }

    /// Type of the first field with the given name
    pub fn field_type(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.type_name.as_str())
    }

    /// Fold a re-declaration of this class into it
    ///
    /// Fields and methods the earlier declaration did not have are appended
    /// in their new declaration order, duplicates within the new declaration
    /// included; the abstract flag is sticky.
    fn merge(&mut self, other: ClassEntity) {
        self.is_abstract |= other.is_abstract;
        let known_fields = self.fields.len();
        for field in other.fields {
            if !self.fields[..known_fields].iter().any(|f| f.same_as(&field)) {
                self.fields.push(field);
            }
        }
        let known_methods = self.methods.len();
        for method in other.methods {
            if !self.methods[..known_methods].contains(&method) {
                self.methods.push(method);
            }
        }
    }
}

/// An enumeration in the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumEntity {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }
}

/// A directed relationship between two entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source: String,
    pub destination: String,
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            kind,
        }
    }

    pub fn association(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(source, destination, RelationshipKind::Association)
    }

    pub fn inheritance(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::new(source, destination, RelationshipKind::Inheritance)
    }
}

/// Class diagram model
///
/// Entity maps keep discovery order. Relationships are not deduplicated; the
/// query methods treat repeated edges as one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Model {
    classes: IndexMap<String, ClassEntity>,
    enums: IndexMap<String, EnumEntity>,
    abstract_classes: IndexSet<String>,
    relationships: Vec<Relationship>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, merging it into an existing class of the same name
    pub fn add_class(&mut self, class: ClassEntity) {
        trace!(class = %class.name, fields = class.fields.len(), "Adding class to model");
        if class.is_abstract {
            self.abstract_classes.insert(class.name.clone());
        }
        match self.classes.get_mut(&class.name) {
            Some(existing) => existing.merge(class),
            None => {
                self.classes.insert(class.name.clone(), class);
            }
        }
        debug!(class_count = self.classes.len(), "Class added");
    }

    /// Add an enumeration, appending unseen values to an existing one of the same name
    pub fn add_enum(&mut self, entity: EnumEntity) {
        trace!(name = %entity.name, values = entity.values.len(), "Adding enum to model");
        match self.enums.get_mut(&entity.name) {
            Some(existing) => {
                for value in entity.values {
                    if !existing.values.contains(&value) {
                        existing.values.push(value);
                    }
                }
            }
            None => {
                self.enums.insert(entity.name.clone(), entity);
            }
        }
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        trace!(
            source = %relationship.source,
            destination = %relationship.destination,
            kind = %relationship.kind,
            "Adding relationship to model"
        );
        self.relationships.push(relationship);
    }

    pub fn classes(&self) -> &IndexMap<String, ClassEntity> {
        &self.classes
    }

    pub fn enums(&self) -> &IndexMap<String, EnumEntity> {
        &self.enums
    }

    pub fn abstract_classes(&self) -> &IndexSet<String> {
        &self.abstract_classes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumEntity> {
        self.enums.get(name)
    }

    /// True if a class or enum with this name is declared
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name) || self.enums.contains_key(name)
    }

    pub fn is_abstract(&self, name: &str) -> bool {
        self.abstract_classes.contains(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Fields of a class in declaration order
    ///
    /// Fails with [`DiagramError::NotFound`] when no class has that name, so an
    /// empty slice always means "declared without fields".
    pub fn fields(&self, class_name: &str) -> DiagramResult<&[Field]> {
        self.classes
            .get(class_name)
            .map(|class| class.fields.as_slice())
            .ok_or_else(|| DiagramError::not_found(class_name))
    }

    pub fn has_relationship(&self, source: &str, destination: &str, kind: RelationshipKind) -> bool {
        self.relationships
            .iter()
            .any(|r| r.kind == kind && r.source == source && r.destination == destination)
    }

    pub fn has_association(&self, source: &str, destination: &str) -> bool {
        self.has_relationship(source, destination, RelationshipKind::Association)
    }

    pub fn has_inheritance(&self, source: &str, destination: &str) -> bool {
        self.has_relationship(source, destination, RelationshipKind::Inheritance)
    }

    /// Relationships leaving a declared entity
    pub fn relationships_from(&self, name: &str) -> DiagramResult<Vec<&Relationship>> {
        self.require_entity(name)?;
        Ok(self
            .relationships
            .iter()
            .filter(|r| r.source == name)
            .collect())
    }

    /// Relationships arriving at a declared entity
    pub fn relationships_to(&self, name: &str) -> DiagramResult<Vec<&Relationship>> {
        self.require_entity(name)?;
        Ok(self
            .relationships
            .iter()
            .filter(|r| r.destination == name)
            .collect())
    }

    /// Entities that take part in no relationship and are not used as a field type
    pub fn isolated_elements(&self) -> Vec<&str> {
        let mut connected: IndexSet<&str> = IndexSet::new();
        for rel in &self.relationships {
            connected.insert(rel.source.as_str());
            connected.insert(rel.destination.as_str());
        }
        for class in self.classes.values() {
            for field in &class.fields {
                let base = base_type_name(&field.type_name);
                if !is_primitive_type(base) {
                    connected.insert(base);
                }
            }
        }

        self.classes
            .keys()
            .chain(self.enums.keys())
            .map(String::as_str)
            .filter(|name| !connected.contains(name))
            .collect()
    }

    fn require_entity(&self, name: &str) -> DiagramResult<()> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(DiagramError::not_found(name))
        }
    }
}

impl Database for Model {
    type Node = ClassEntity;
    type Edge = Relationship;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.add_class(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.add_relationship(edge);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.get_class(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.classes.values()
    }

    fn edges(&self) -> impl Iterator<Item = &Self::Edge> {
        self.relationships.iter()
    }

    fn clear(&mut self) {
        self.classes.clear();
        self.enums.clear();
        self.abstract_classes.clear();
        self.relationships.clear();
    }

    fn node_count(&self) -> usize {
        self.classes.len()
    }

    fn edge_count(&self) -> usize {
        self.relationships.len()
    }
}

//! Swagger / OpenAPI plugin
//!
//! Write path: a decoded API description is flattened by [`SchemaResolver`]
//! into a [`SchemaDatabase`], which [`PlantUmlRenderer`] turns into diagram
//! text.

mod database;
mod definition;
mod dialect;
mod paths;
mod property;
mod reference;
mod renderer;
mod resolver;

pub use database::SchemaDatabase;
pub use definition::{Definition, DefinitionKind};
pub use dialect::SchemaDialect;
pub use paths::{Operation, Parameter, PathInterface, OPERATION_VERBS};
pub use property::{object_properties, Property, PropertyType};
pub use reference::{resolve_ref, SchemaRef};
pub use renderer::PlantUmlRenderer;
pub use resolver::SchemaResolver;

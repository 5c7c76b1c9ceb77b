//! PlantUML renderer for resolved schemas
//!
//! Output layout, in database order:
//!
//! ```text
//! @startuml
//! <directives>
//!
//! class Pet {
//!     {field} integer (int64) <b>id</b>
//!     {field} Category category
//! }
//! Pet ..> Category
//!
//! interface "/pet" {
//!     {method} <b>post</b> addPet(body: Pet)
//! }
//!
//! @enduml
//! ```

use anyhow::Result;
use std::fmt::{self, Write as _};
use tracing::{debug, span, Level};

use super::{Definition, DefinitionKind, PathInterface, SchemaDatabase};
use crate::core::{cap_enum_values, diagram_name, GenerateConfig, Renderer, METHOD_MARKER};

/// Renders a [`SchemaDatabase`] as PlantUML class diagram text
pub struct PlantUmlRenderer {
    config: GenerateConfig,
}

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self::with_config(GenerateConfig::default())
    }

    pub fn with_config(config: GenerateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    fn render_definition(
        &self,
        out: &mut String,
        definition: &Definition,
        database: &SchemaDatabase,
    ) -> fmt::Result {
        let indent = " ".repeat(self.config.indent);
        let name = diagram_name(&definition.name);
        match &definition.kind {
            DefinitionKind::Enum(values) => {
                writeln!(out, "enum {} {{", name)?;
                for value in cap_enum_values(values.clone(), self.config.enum_limit) {
                    writeln!(out, "{}{}", indent, value)?;
                }
            }
            DefinitionKind::Class => {
                let keyword = if definition.is_abstract {
                    "abstract class"
                } else {
                    "class"
                };
                writeln!(out, "{} {} {{", keyword, name)?;
                for property in &definition.properties {
                    writeln!(out, "{}{}", indent, property.uml_line(self.config.enum_limit))?;
                }
            }
        }
        out.push_str("}\n");

        for relationship in database.relationships_from(&definition.name) {
            writeln!(
                out,
                "{} {} {}",
                diagram_name(&relationship.source),
                relationship.kind.arrow(),
                diagram_name(&relationship.destination)
            )?;
        }
        out.push('\n');
        Ok(())
    }

    fn render_interface(&self, out: &mut String, interface: &PathInterface) -> fmt::Result {
        let indent = " ".repeat(self.config.indent);
        writeln!(out, "interface \"{}\" {{", interface.path)?;
        for operation in &interface.operations {
            writeln!(out, "{}{} {}", indent, METHOD_MARKER, operation.signature())?;
        }
        out.push_str("}\n\n");
        Ok(())
    }
}

impl Default for PlantUmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer<SchemaDatabase> for PlantUmlRenderer {
    type Output = String;

    fn render(&self, database: &SchemaDatabase) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_plantuml",
            definitions = database.definitions().len(),
            interfaces = database.interfaces().len()
        );
        let _enter = render_span.enter();

        let mut out = String::from("@startuml\n");
        for directive in &self.config.directives {
            out.push_str(directive);
            out.push('\n');
        }
        out.push('\n');

        for definition in database.definitions().values() {
            self.render_definition(&mut out, definition, database)?;
        }

        if self.config.include_paths {
            for interface in database.interfaces() {
                self.render_interface(&mut out, interface)?;
            }
        }

        out.push_str("@enduml\n");
        debug!(bytes = out.len(), "Rendered PlantUML diagram");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "text/plantuml"
    }
}

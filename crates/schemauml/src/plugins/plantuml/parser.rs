//! PlantUML class diagram parser
//!
//! Walks the diagram line by line, classifying each line with the chumsky
//! grammar and tracking which block is open. Parsing is best-effort: lines
//! that cannot be understood are skipped and reported as [`Diagnostic`]s
//! unless [`ParseConfig::strict`] is set.

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};

use super::chumsky_parser::{ChumskyPlantUmlParser, ClassHeader, Statement};
use super::PlantUmlDetector;
use crate::core::{
    base_type_name, cap_enum_values, is_primitive_type, ClassEntity, ClassKind, Detector,
    DiagramError, EnumEntity, Field, Model, ParseConfig, Parser, Relationship,
};

/// A line the parser skipped or had to repair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    /// Trimmed line text
    pub text: String,
    pub message: String,
}

/// Block currently receiving body lines
enum OpenBlock {
    Class { entity: ClassEntity, line: usize },
    Enum { entity: EnumEntity, line: usize },
    /// Body of a declaration that was refused (primitive name); lines are dropped
    Discarded { line: usize },
}

impl OpenBlock {
    fn opened_at(&self) -> usize {
        match self {
            OpenBlock::Class { line, .. }
            | OpenBlock::Enum { line, .. }
            | OpenBlock::Discarded { line } => *line,
        }
    }
}

/// PlantUML class diagram parser
pub struct PlantUmlParser {
    config: ParseConfig,
}

impl PlantUmlParser {
    pub fn new() -> Self {
        Self::with_config(ParseConfig::default())
    }

    pub fn with_config(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse into `model`, returning every line that was skipped or repaired
    ///
    /// In strict mode the first such line fails the parse with
    /// [`DiagramError::ParseError`] instead.
    pub fn parse_with_diagnostics(&self, input: &str, model: &mut Model) -> Result<Vec<Diagnostic>> {
        let parse_span = span!(Level::INFO, "parse_plantuml", input_len = input.len());
        let _enter = parse_span.enter();

        let grammar = ChumskyPlantUmlParser::new();
        let mut state = ParseState {
            config: &self.config,
            model: &mut *model,
            open: None,
            diagnostics: Vec::new(),
        };

        for (index, raw) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            // Enum bodies hold raw literals until "}" or @enduml
            if let Some(OpenBlock::Enum { entity, .. }) = state.open.as_mut() {
                if line != "}" && !line.starts_with("@enduml") {
                    entity.values.push(line.to_string());
                    continue;
                }
            }

            if line.starts_with('@') {
                if line.starts_with("@enduml") {
                    state.close_implicitly(line_no, line, "block closed by @enduml")?;
                }
                trace!(line = line_no, "Skipping directive");
                continue;
            }

            let statement = grammar.parse_statement(line);
            match state.open.take() {
                Some(block) => state.body_line(block, statement, line_no, line)?,
                None => state.top_level_line(statement, line_no, line)?,
            }
        }

        if let Some(block) = state.open.take() {
            let opened_at = block.opened_at();
            state.report(opened_at, "", "unterminated block closed at end of input")?;
            state.finish(block);
        }

        add_implied_associations(state.model);

        let diagnostics = state.diagnostics;
        debug!(
            classes = model.class_count(),
            enums = model.enum_count(),
            relationships = model.relationship_count(),
            skipped = diagnostics.len(),
            "PlantUML parse complete"
        );
        Ok(diagnostics)
    }
}

impl Default for PlantUmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<Model> for PlantUmlParser {
    fn parse(&self, input: &str, database: &mut Model) -> Result<()> {
        self.parse_with_diagnostics(input, database).map(|_| ())
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        PlantUmlDetector::new().detect(input)
    }
}

struct ParseState<'a> {
    config: &'a ParseConfig,
    model: &'a mut Model,
    open: Option<OpenBlock>,
    diagnostics: Vec<Diagnostic>,
}

impl ParseState<'_> {
    /// Record a skipped or repaired line, or fail in strict mode
    fn report(&mut self, line: usize, text: &str, message: &str) -> Result<()> {
        if self.config.strict {
            return Err(DiagramError::parse_error(message, line, 1).into());
        }
        warn!(line, text, message, "Skipping diagram line");
        self.diagnostics.push(Diagnostic {
            line,
            text: text.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn close_implicitly(&mut self, line: usize, text: &str, message: &str) -> Result<()> {
        if let Some(block) = self.open.take() {
            self.report(line, text, message)?;
            self.finish(block);
        }
        Ok(())
    }

    fn finish(&mut self, block: OpenBlock) {
        match block {
            OpenBlock::Class { entity, .. } => self.model.add_class(entity),
            OpenBlock::Enum { entity, .. } => {
                let values = cap_enum_values(entity.values, self.config.enum_limit);
                self.model.add_enum(EnumEntity::new(entity.name).with_values(values));
            }
            OpenBlock::Discarded { .. } => {}
        }
    }

    fn body_line(
        &mut self,
        mut block: OpenBlock,
        statement: Result<Statement>,
        line_no: usize,
        line: &str,
    ) -> Result<()> {
        match statement {
            Ok(Statement::Close) => {
                self.finish(block);
                return Ok(());
            }
            Ok(Statement::Comment) => {}
            Ok(
                statement @ (Statement::ClassOpen(_)
                | Statement::ClassDecl(_)
                | Statement::EnumOpen(_)
                | Statement::EnumDecl(_)
                | Statement::Relationship(_)),
            ) => {
                self.report(line_no, line, "missing closing brace; block closed implicitly")?;
                self.finish(block);
                return self.top_level_line(Ok(statement), line_no, line);
            }
            Ok(Statement::Field(field)) => match &mut block {
                OpenBlock::Class { entity, .. } => {
                    entity.add_field(
                        Field::new(field.name, field.type_name).with_required(field.required),
                    );
                }
                OpenBlock::Enum { .. } | OpenBlock::Discarded { .. } => {}
            },
            Ok(Statement::Method(signature)) => match &mut block {
                OpenBlock::Class { entity, .. } => entity.add_method(signature),
                OpenBlock::Enum { .. } | OpenBlock::Discarded { .. } => {}
            },
            Err(_) => match &mut block {
                OpenBlock::Enum { .. } | OpenBlock::Discarded { .. } => {}
                OpenBlock::Class { .. } => {
                    self.open = Some(block);
                    return self.report(line_no, line, "malformed class body line");
                }
            },
        }
        self.open = Some(block);
        Ok(())
    }

    fn top_level_line(
        &mut self,
        statement: Result<Statement>,
        line_no: usize,
        line: &str,
    ) -> Result<()> {
        let statement = match statement {
            Ok(statement) => statement,
            Err(_) => {
                // Directives such as "hide empty members"
                trace!(line = line_no, text = line, "Ignoring unrecognized line");
                return Ok(());
            }
        };

        match statement {
            Statement::ClassOpen(header) => {
                self.open = Some(match self.class_entity(header, line_no, line)? {
                    Some(entity) => OpenBlock::Class {
                        entity,
                        line: line_no,
                    },
                    None => OpenBlock::Discarded { line: line_no },
                });
            }
            Statement::ClassDecl(header) => {
                if let Some(entity) = self.class_entity(header, line_no, line)? {
                    self.model.add_class(entity);
                }
            }
            Statement::EnumOpen(name) => {
                self.open = Some(if self.accept_name(&name, line_no, line)? {
                    OpenBlock::Enum {
                        entity: EnumEntity::new(name),
                        line: line_no,
                    }
                } else {
                    OpenBlock::Discarded { line: line_no }
                });
            }
            Statement::EnumDecl(name) => {
                if self.accept_name(&name, line_no, line)? {
                    self.model.add_enum(EnumEntity::new(name));
                }
            }
            Statement::Relationship(rel) => {
                if is_primitive_type(&rel.source) || is_primitive_type(&rel.destination) {
                    self.report(line_no, line, "relationship to a built-in type")?;
                } else {
                    self.model
                        .add_relationship(Relationship::new(rel.source, rel.destination, rel.kind));
                }
            }
            Statement::Close => self.report(line_no, line, "closing brace outside a block")?,
            Statement::Field(_) | Statement::Method(_) => {
                self.report(line_no, line, "member declaration outside a block")?
            }
            Statement::Comment => {}
        }
        Ok(())
    }

    fn class_entity(
        &mut self,
        header: ClassHeader,
        line_no: usize,
        line: &str,
    ) -> Result<Option<ClassEntity>> {
        if !self.accept_name(&header.name, line_no, line)? {
            return Ok(None);
        }
        let entity = match header.kind {
            ClassKind::Class => ClassEntity::new(header.name),
            ClassKind::Interface => ClassEntity::interface(header.name),
        };
        Ok(Some(entity.with_abstract(header.is_abstract)))
    }

    /// Built-in type names never become entities
    fn accept_name(&mut self, name: &str, line_no: usize, line: &str) -> Result<bool> {
        if is_primitive_type(name) {
            self.report(line_no, line, "built-in type cannot be declared")?;
            return Ok(false);
        }
        Ok(true)
    }
}

/// Add an association for every field whose type names a declared entity
///
/// Pairs already joined by an explicit association line are left alone.
fn add_implied_associations(model: &mut Model) {
    let mut implied = Vec::new();
    for class in model.classes().values() {
        for field in &class.fields {
            let target = base_type_name(&field.type_name);
            if is_primitive_type(target) || !model.contains(target) {
                continue;
            }
            let already_known = model.has_association(&class.name, target)
                || implied
                    .iter()
                    .any(|r: &Relationship| r.source == class.name && r.destination == target);
            if !already_known {
                implied.push(Relationship::association(class.name.as_str(), target));
            }
        }
    }

    debug!(count = implied.len(), "Adding implied field-type associations");
    for relationship in implied {
        model.add_relationship(relationship);
    }
}

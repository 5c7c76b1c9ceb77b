//! PlantUML line grammar using chumsky
//!
//! Classifies one trimmed diagram line into a [`Statement`]. Block structure
//! (which class a field belongs to, where an enum body ends) is tracked by
//! [`PlantUmlParser`](super::PlantUmlParser); this grammar never looks past a
//! single line.

use anyhow::Result;
use chumsky::error::EmptyErr;
use chumsky::prelude::*;

use crate::core::{
    entity_name, inline_whitespace, inline_whitespace_required, plantuml_comment,
    strip_bold, ClassKind, RelationshipKind, FIELD_MARKER, METHOD_MARKER,
};

/// Header of a class or interface declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub name: String,
    pub kind: ClassKind,
    pub is_abstract: bool,
}

/// A `{field} <type> <name>` declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedField {
    pub type_name: String,
    pub name: String,
    pub required: bool,
}

impl ParsedField {
    /// Split the text after the field marker into type and name
    ///
    /// The name is the last whitespace-separated token, with bold markup
    /// removed; everything before it is the type, which may itself contain
    /// spaces (`integer (int64)`).
    pub fn from_declaration(declaration: &str) -> Option<Self> {
        let (type_part, name_token) = declaration.trim().rsplit_once(char::is_whitespace)?;
        let type_name = type_part.trim();
        let (name, required) = strip_bold(name_token);
        if type_name.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self {
            type_name: type_name.to_string(),
            name: name.to_string(),
            required,
        })
    }
}

/// A relationship line, normalized so `source` is the dependent side
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRelationship {
    pub source: String,
    pub destination: String,
    pub kind: RelationshipKind,
}

/// One classified diagram line
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `class X {`, `abstract class X {`, `interface "/path" {`
    ClassOpen(ClassHeader),
    /// `class X` without a body
    ClassDecl(ClassHeader),
    /// `enum X {`
    EnumOpen(String),
    /// `enum X` without a body
    EnumDecl(String),
    /// `}`
    Close,
    Field(ParsedField),
    /// Raw signature after the method marker
    Method(String),
    Relationship(ParsedRelationship),
    Comment,
}

/// Chumsky-based PlantUML line parser
pub struct ChumskyPlantUmlParser;

impl ChumskyPlantUmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Classify a single diagram line
    pub fn parse_statement(&self, line: &str) -> Result<Statement> {
        Self::statement_parser()
            .parse(line.trim())
            .into_result()
            .map_err(|errors| anyhow::anyhow!("Parse errors: {:?}", errors))
    }

    fn statement_parser<'src>() -> impl Parser<'src, &'src str, Statement> + Clone {
        let eol = inline_whitespace().then(end());

        choice((
            Self::class_parser().then_ignore(eol.clone()),
            Self::enum_parser().then_ignore(eol.clone()),
            just('}').to(Statement::Close).then_ignore(eol.clone()),
            Self::field_parser().map(Statement::Field),
            Self::method_parser().map(Statement::Method),
            Self::relationship_parser()
                .map(Statement::Relationship)
                .then_ignore(eol),
            plantuml_comment().to(Statement::Comment),
        ))
    }

    fn class_parser<'src>() -> impl Parser<'src, &'src str, Statement> + Clone {
        let ws = inline_whitespace_required();

        // Longest keyword form first: "abstract class" before "abstract"
        let keyword = choice((
            text::keyword("abstract")
                .then(ws.clone())
                .then(text::keyword("class"))
                .to((ClassKind::Class, true)),
            text::keyword("abstract").to((ClassKind::Class, true)),
            text::keyword("class").to((ClassKind::Class, false)),
            text::keyword("interface").to((ClassKind::Interface, false)),
        ));

        // <<abstract>> and other stereotypes
        let stereotype = just("<<")
            .ignore_then(none_of('>').repeated().at_least(1).to_slice())
            .then_ignore(just(">>"))
            .map(|s: &str| s.trim().eq_ignore_ascii_case("abstract"));

        keyword
            .then_ignore(ws)
            .then(entity_name())
            .then(inline_whitespace().ignore_then(stereotype).or_not())
            .then_ignore(inline_whitespace())
            .then(just('{').or_not())
            .map(|((((kind, keyword_abstract), name), stereotype), brace)| {
                let header = ClassHeader {
                    name,
                    kind,
                    is_abstract: keyword_abstract || stereotype.unwrap_or(false),
                };
                if brace.is_some() {
                    Statement::ClassOpen(header)
                } else {
                    Statement::ClassDecl(header)
                }
            })
    }

    fn enum_parser<'src>() -> impl Parser<'src, &'src str, Statement> + Clone {
        text::keyword("enum")
            .ignore_then(inline_whitespace_required())
            .ignore_then(entity_name())
            .then_ignore(inline_whitespace())
            .then(just('{').or_not())
            .map(|(name, brace)| {
                if brace.is_some() {
                    Statement::EnumOpen(name)
                } else {
                    Statement::EnumDecl(name)
                }
            })
    }

    fn field_parser<'src>() -> impl Parser<'src, &'src str, ParsedField> + Clone {
        just(FIELD_MARKER)
            .ignore_then(inline_whitespace_required())
            .ignore_then(any().repeated().at_least(1).to_slice())
            .try_map(|declaration: &str, _span| {
                ParsedField::from_declaration(declaration).ok_or_else(EmptyErr::default)
            })
    }

    fn method_parser<'src>() -> impl Parser<'src, &'src str, String> + Clone {
        just(METHOD_MARKER)
            .ignore_then(any().repeated().to_slice())
            .map(|s: &str| s.trim().to_string())
    }

    fn relationship_parser<'src>() -> impl Parser<'src, &'src str, ParsedRelationship> + Clone {
        use RelationshipKind::{Association, Inheritance};

        // (kind, arrow points from right to left)
        let arrow = choice((
            just("--|>").to((Inheritance, false)),
            just("..|>").to((Inheritance, false)),
            just("<|--").to((Inheritance, true)),
            just("<|..").to((Inheritance, true)),
            just("..>").to((Association, false)),
            just("-->").to((Association, false)),
            just("<..").to((Association, true)),
            just("<--").to((Association, true)),
        ));

        // " : label" is accepted and dropped
        let label = inline_whitespace_required()
            .ignore_then(just(':'))
            .ignore_then(any().repeated())
            .ignored();

        entity_name()
            .then_ignore(inline_whitespace())
            .then(arrow)
            .then_ignore(inline_whitespace())
            .then(entity_name())
            .then_ignore(label.or_not())
            .map(|((left, (kind, reversed)), right)| {
                let (source, destination) = if reversed { (right, left) } else { (left, right) };
                ParsedRelationship {
                    source,
                    destination,
                    kind,
                }
            })
    }
}

impl Default for ChumskyPlantUmlParser {
    fn default() -> Self {
        Self::new()
    }
}

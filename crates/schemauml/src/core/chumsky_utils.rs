//! Shared chumsky parser utilities for diagram parsing
//!
//! Common combinators for the line-oriented PlantUML grammar. Every parser
//! here works on a single, already trimmed line, so none of them consume
//! newlines.

use chumsky::prelude::*;
use chumsky::text::ident;

/// Parse inline whitespace only (spaces and tabs, no newlines).
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse at least one space or tab.
pub fn inline_whitespace_required<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    one_of(" \t").repeated().at_least(1).ignored()
}

/// Parse a bare identifier (`temperatureType`, `_Base2`).
pub fn identifier<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    ident().map(|s: &str| s.to_string())
}

/// Parse a double-quoted name (`"/pet/{petId}"`), returning the text between the quotes.
pub fn quoted_name<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    none_of('"')
        .repeated()
        .at_least(1)
        .to_slice()
        .delimited_by(just('"'), just('"'))
        .map(|s: &str| s.to_string())
}

/// Parse an entity name: quoted or bare.
pub fn entity_name<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    quoted_name().or(identifier())
}

/// Parse a PlantUML single-line comment (`' text`).
pub fn plantuml_comment<'src>() -> impl Parser<'src, &'src str, ()> + Clone {
    just('\'').ignore_then(any().repeated()).ignored()
}

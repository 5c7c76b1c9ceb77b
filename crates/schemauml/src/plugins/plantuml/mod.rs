//! PlantUML class diagram plugin
//!
//! Read path: diagram text in the supported PlantUML subset into a [`Model`](crate::core::Model).

mod chumsky_parser;
mod detector;
mod parser;

pub use chumsky_parser::{ChumskyPlantUmlParser, ClassHeader, ParsedField, ParsedRelationship, Statement};
pub use detector::PlantUmlDetector;
pub use parser::{Diagnostic, PlantUmlParser};

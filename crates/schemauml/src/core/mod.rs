//! Core abstractions for diagram processing
//!
//! This module defines the traits both directions implement, the shared
//! domain model, and the vocabulary of the diagram dialect.

mod chumsky_utils;
mod database;
mod detector;
mod error;
pub mod logging;
mod model;
mod parser;
mod renderer;
mod types;

pub use chumsky_utils::*;
pub use database::*;
pub use detector::*;
pub use error::*;
pub use logging::*;
pub use model::*;
pub use parser::*;
pub use renderer::*;
pub use types::*;

//! Plugin implementations for both directions
//!
//! `plantuml` reads class diagram text into the domain model; `openapi`
//! resolves API descriptions and writes them as class diagram text.

pub mod openapi;
pub mod plantuml;

//! PlantUML class diagram detector
//!
//! Identifies class diagram text in the supported PlantUML subset.

use tracing::{debug, trace};

use crate::core::{Detector, FIELD_MARKER};

/// Detector for PlantUML class diagram syntax
pub struct PlantUmlDetector;

// Arrow tokens understood by the parser
const ARROWS: [&str; 8] = ["--|>", "..|>", "<|--", "<|..", "..>", "-->", "<..", "<--"];

impl PlantUmlDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlantUmlDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PlantUmlDetector {
    fn detect(&self, input: &str) -> bool {
        self.confidence(input) > 0.5
    }

    fn confidence(&self, input: &str) -> f64 {
        let trimmed = input.trim();
        trace!(input_len = trimmed.len(), "PlantUmlDetector::confidence called");

        if trimmed.is_empty() {
            return 0.0;
        }

        if trimmed.starts_with("@startuml") {
            debug!("Detected PlantUML via @startuml directive");
            return 1.0;
        }

        let has_block = trimmed.lines().any(|line| {
            let line = line.trim_start();
            (line.starts_with("class ")
                || line.starts_with("abstract ")
                || line.starts_with("interface ")
                || line.starts_with("enum "))
                && line.trim_end().ends_with('{')
        });

        if trimmed.contains(FIELD_MARKER) {
            debug!("Detected PlantUML via field marker");
            return 0.9;
        }

        if has_block {
            return 0.8;
        }

        if ARROWS.iter().any(|arrow| trimmed.contains(arrow)) {
            // Flowchart-style "-->" alone is too common to be decisive
            return if trimmed.contains("-->") && !trimmed.contains("..>") && !trimmed.contains("|") {
                0.4
            } else {
                0.7
            };
        }

        0.0
    }

    fn diagram_type(&self) -> &'static str {
        "plantuml-class"
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["@startuml", FIELD_MARKER, "..>", "--|>"]
    }
}

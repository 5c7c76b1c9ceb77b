//! Core detector trait for diagram type identification
//!
//! This trait defines the interface for detecting diagram types
//! from markup language patterns.

/// Core trait for diagram type detectors
///
/// # Example
/// ```
/// use schemauml::core::Detector;
/// use schemauml::plugins::plantuml::PlantUmlDetector;
///
/// let detector = PlantUmlDetector::new();
/// assert!(detector.detect("@startuml\nclass Pet {\n}\n@enduml"));
/// ```
pub trait Detector: Send + Sync {
    /// Detect if the input matches this diagram type
    fn detect(&self, input: &str) -> bool;

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// Get the diagram type name
    fn diagram_type(&self) -> &'static str;

    /// Get key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}

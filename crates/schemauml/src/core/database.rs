//! Core database trait for diagram data storage
//!
//! This trait defines the interface for storing and managing diagram data.
//! Both directions of the pipeline keep their state behind it: the parsed
//! class-diagram [`Model`](super::Model) and the resolved
//! [`SchemaDatabase`](crate::plugins::openapi::SchemaDatabase).

use anyhow::Result;

/// Core trait for diagram databases
///
/// Each implementation defines its own node and edge structures. Nodes are
/// keyed by name; edges are kept in insertion order so that every pass over a
/// database is deterministic.
pub trait Database: Send + Sync {
    /// The node data type for this database
    type Node: Clone + Send + Sync;

    /// The edge data type for this database
    type Edge: Clone + Send + Sync;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge to the database
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by name
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes in insertion order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges in insertion order
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}

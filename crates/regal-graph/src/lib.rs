//! # regal-graph
//!
//! In-memory typed catalog graph for RegalDB.
//!
//! Provides the data model, identity registry and graph engine:
//! - [`model::Node`]           — category or product, identified by case-folded name
//! - [`model::Edge`]           — directed typed edge between node keys
//! - [`model::Relation`]       — the six relationship kinds and their inverses
//! - [`registry::NameRegistry`] — owning node arena keyed by [`model::NodeName`]
//! - [`adjacency::AdjacencyIndex`] — bidirectional adjacency index
//! - [`graph::Graph`]          — coordinator holding registry, edge set and index
//! - [`import_export`]         — flat-file statement ingestion and DOT export

pub mod adjacency;
pub mod error;
pub mod graph;
pub mod import_export;
pub mod model;
pub mod registry;

pub use adjacency::AdjacencyIndex;
pub use error::GraphError;
pub use graph::Graph;
pub use import_export::{add_statement, export_dot, load_database, LoadReport, Statement};
pub use model::{Edge, Node, NodeKind, NodeName, Relation};
pub use registry::NameRegistry;

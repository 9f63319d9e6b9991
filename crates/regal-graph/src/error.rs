use thiserror::Error;

use crate::model::{Edge, NodeName, Relation};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeName),

    #[error("relationship not found: {0}")]
    EdgeNotFound(Edge),

    #[error("conflicting definition for node: {0}")]
    NodeConflict(NodeName),

    #[error("product id {id} already in use by {existing}")]
    IdConflict { id: u64, existing: NodeName },

    // No field here may be named `source`: thiserror reserves that name for
    // the cause chain and would require the field type to implement Error.
    #[error("{relation} not allowed from {subject} to {object}")]
    InvalidRelationship {
        subject:  NodeName,
        object:   NodeName,
        relation: Relation,
    },

    #[error("relationship already exists: {0}")]
    DuplicateEdge(Edge),

    #[error("invalid statement: {0}")]
    InvalidStatement(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

//! Error types for valueflow-ir
//!
//! Every failure the IR can report is a defect in the caller or in an earlier
//! construction step; none of them is retried. Offset wrap-around is not an
//! error and never shows up here.

use crate::config::error::ConfigError;
use crate::shared::models::{MemObjId, NodeId};
use thiserror::Error;

/// Main error type for IR construction and queries
#[derive(Debug, Error)]
pub enum ValueFlowError {
    /// A node id that was never allocated by this IR
    #[error("unknown node id {0}")]
    UnknownNode(NodeId),

    /// Field resolution or field enumeration requested on a value node
    #[error("node {0} is not an object node")]
    NotAnObject(NodeId),

    /// A memory object id the layout service does not know about
    #[error("unknown memory object {0}")]
    UnknownMemObj(MemObjId),

    /// A node id registered twice
    #[error("node {0} is already registered")]
    DuplicateNode(NodeId),

    /// More than one incoming gep statement on a node
    #[error("node {node} has {count} incoming gep edges, at most one is allowed")]
    MultipleGepEdges { node: NodeId, count: usize },

    /// A field object for (base, offset) registered twice
    #[error("field object for base {base} at offset {offset} already exists")]
    DuplicateFieldObject { base: MemObjId, offset: i64 },

    /// Composed gep offset leaves the `i64` range
    #[error("offset {offset} + {delta} at node {node} overflows")]
    OffsetOverflow { node: NodeId, offset: i64, delta: i64 },

    /// The identifier space for the requested node class is used up
    #[error("identifier space exhausted: {0}")]
    IdSpaceExhausted(String),

    /// Invalid build configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ValueFlowError {
    /// Whether this error reports a broken internal invariant (a bug in an
    /// earlier construction step) rather than a bad argument from the caller
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            ValueFlowError::MultipleGepEdges { .. }
                | ValueFlowError::DuplicateFieldObject { .. }
                | ValueFlowError::DuplicateNode(_)
        )
    }

    /// Node ids named by this error, for defect reports
    pub fn offending_nodes(&self) -> Vec<NodeId> {
        match self {
            ValueFlowError::UnknownNode(id)
            | ValueFlowError::NotAnObject(id)
            | ValueFlowError::OffsetOverflow { node: id, .. }
            | ValueFlowError::UnknownMemObj(id)
            | ValueFlowError::DuplicateNode(id) => vec![*id],
            ValueFlowError::MultipleGepEdges { node, .. } => vec![*node],
            ValueFlowError::DuplicateFieldObject { base, .. } => vec![*base],
            ValueFlowError::IdSpaceExhausted(_) | ValueFlowError::Config(_) => Vec::new(),
        }
    }
}

/// Result type alias for IR operations
pub type Result<T> = std::result::Result<T, ValueFlowError>;

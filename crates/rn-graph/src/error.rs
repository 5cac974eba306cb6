//! Network-specific error types.

use rn_core::{EdgeId, NodeId, ReachId, RnError};

/// Which end of a reach a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachEnd {
    Start,
    End,
}

impl std::fmt::Display for ReachEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReachEnd::Start => f.write_str("start"),
            ReachEnd::End => f.write_str("end"),
        }
    }
}

/// Network construction and validation errors.
///
/// These are structural violations of a network handed to the builder,
/// not data-quality findings; they are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A reach refers to a node that doesn't exist.
    InvalidNodeRef { reach: ReachId, node: NodeId },

    /// Two reaches share the same source identifier.
    DuplicateReach { reach: ReachId },

    /// A reach starts and ends at the same node.
    SelfLoop { reach: ReachId },

    /// A reach geometry endpoint does not lie on its node.
    OrientationMismatch {
        reach: ReachId,
        end: ReachEnd,
        node: NodeId,
    },

    /// Adjacency list is inconsistent with reach endpoints.
    InconsistentAdjacency { edge: EdgeId, node: NodeId },

    /// Following flow direction leads back to this node.
    CycleDetected { node: NodeId },

    /// ID not found in index map.
    IdNotFound { what: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidNodeRef { reach, node } => {
                write!(f, "Reach {} refers to non-existent node {}", reach, node)
            }
            GraphError::DuplicateReach { reach } => {
                write!(f, "Reach {} appears more than once", reach)
            }
            GraphError::SelfLoop { reach } => {
                write!(f, "Reach {} is a loop on a single node", reach)
            }
            GraphError::OrientationMismatch { reach, end, node } => {
                write!(
                    f,
                    "Reach {} geometry {} point does not lie on node {}",
                    reach, end, node
                )
            }
            GraphError::InconsistentAdjacency { edge, node } => {
                write!(
                    f,
                    "Reach {} in node {}'s adjacency list but doesn't reference that node",
                    edge, node
                )
            }
            GraphError::CycleDetected { node } => {
                write!(f, "Flow cycle through node {}", node)
            }
            GraphError::IdNotFound { what } => {
                write!(f, "{} not found in index map", what)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for RnError {
    fn from(err: GraphError) -> Self {
        RnError::Invariant {
            what: err.to_string(),
        }
    }
}

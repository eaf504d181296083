//! Error types for the layout engine.
//!
//! Apart from [`LayoutError::RootNotFound`], none of these abort a layout
//! run: they are logged, collected into the run's report, and the affected
//! value keeps its previous state.

use thiserror::Error;

use crate::types::{Axis, Dim, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Root node {id} is not present in the node lookup")]
    RootNotFound { id: NodeId },

    #[error("Node {id} referenced by {referrer} is not present in the node lookup")]
    NodeNotFound { id: NodeId, referrer: NodeId },

    #[error("Node {node} uses percent on {axis} but has no parent to resolve against")]
    PercentWithoutParent { node: NodeId, axis: Axis },

    #[error("Node {node} uses percent on {axis} inside {parent}, which sizes that axis to its children")]
    PercentInFitChildren {
        node: NodeId,
        parent: NodeId,
        axis: Axis,
    },

    #[error("Node {node} uses percent on {axis} but parent {parent} is not resolved on that axis")]
    UnresolvedParent {
        node: NodeId,
        parent: NodeId,
        axis: Axis,
    },

    #[error("Node {node} uses {dim} for spacing on {axis}, which spacing does not support")]
    InvalidSpacing { node: NodeId, axis: Axis, dim: Dim },

    #[error("Node {node} uses {dim} as a min/max constraint on {axis}, which constraints do not support")]
    InvalidConstraint { node: NodeId, axis: Axis, dim: Dim },

    #[error("Node {node} sizes {axis} to its text but has no label")]
    MissingLabel { node: NodeId, axis: Axis },

    #[error("Children of {parent} still overflow {axis} by {error}px after solving")]
    ResidualViolation {
        parent: NodeId,
        axis: Axis,
        error: f32,
    },
}

impl LayoutError {
    /// The node the error is about.
    pub fn node(&self) -> NodeId {
        match self {
            LayoutError::RootNotFound { id } | LayoutError::NodeNotFound { id, .. } => *id,
            LayoutError::PercentWithoutParent { node, .. }
            | LayoutError::PercentInFitChildren { node, .. }
            | LayoutError::UnresolvedParent { node, .. }
            | LayoutError::InvalidSpacing { node, .. }
            | LayoutError::InvalidConstraint { node, .. }
            | LayoutError::MissingLabel { node, .. } => *node,
            LayoutError::ResidualViolation { parent, .. } => *parent,
        }
    }

    /// Configuration errors stem from how a node was declared, as opposed to
    /// missing ids or an over-constrained parent.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LayoutError::PercentWithoutParent { .. }
                | LayoutError::PercentInFitChildren { .. }
                | LayoutError::UnresolvedParent { .. }
                | LayoutError::InvalidSpacing { .. }
                | LayoutError::InvalidConstraint { .. }
                | LayoutError::MissingLabel { .. }
        )
    }
}

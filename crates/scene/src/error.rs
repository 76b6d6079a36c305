//! Error types for scene graph operations.

use thiserror::Error;

use crate::node::NodeId;

/// Error type for scene graph operations.
///
/// Every variant is recoverable: the operation that returned it left the
/// graph unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The child already has a parent.
    #[error("node '{child}' is already attached to '{parent}'")]
    AlreadyAttached {
        /// Name of the node that was being attached.
        child: String,
        /// Name of its current parent.
        parent: String,
    },

    /// Attaching would make a node its own ancestor, or re-parent the root.
    #[error("cannot attach '{child}' under '{parent}': it would create a cycle")]
    SelfAttach {
        /// Name of the requested parent.
        parent: String,
        /// Name of the requested child.
        child: String,
    },

    /// The node has no parent to detach from.
    #[error("node '{0}' is not attached to a parent")]
    NotAttached(String),

    /// No node with this name exists in the searched subtree.
    #[error("no node named '{0}' in the subtree")]
    NotFound(String),

    /// A node with this name already exists in the graph.
    #[error("a node named '{0}' already exists")]
    DuplicateName(String),

    /// The handle does not refer to a live node of this graph.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// The root of the graph cannot be removed.
    #[error("the root node '{0}' cannot be removed")]
    RootRemoval(String),

    /// The frame time step was negative or not finite.
    #[error("invalid time step {0}: must be finite and non-negative")]
    InvalidTimeStep(f32),
}

/// Result type alias for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

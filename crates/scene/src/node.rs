//! Scene nodes and their handles.

use crate::transform::Transform;

/// Handle to a node stored in a [`SceneGraph`](crate::SceneGraph).
///
/// A handle is an arena slot plus the generation of that slot. Removing a
/// node bumps the generation, so a stale handle never aliases the node that
/// later reuses its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Arena slot of this handle.
    pub fn index(self) -> usize {
        self.index
    }

    /// Generation of the slot when the handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// A named transform container.
///
/// A node with a drawable is a leaf the host renders; a node without one is
/// a grouping or pivot node. `D` is owned by the host and never inspected here.
#[derive(Clone, Debug)]
pub struct Node<D> {
    pub(crate) name: String,
    pub(crate) local: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) drawable: Option<D>,
}

impl<D> Node<D> {
    pub(crate) fn new(name: String, drawable: Option<D>) -> Self {
        Self {
            name,
            local: Transform::IDENTITY,
            parent: None,
            children: Vec::new(),
            drawable,
        }
    }

    /// The node's name, unique within its graph.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent's frame.
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// The parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The host's drawable, if this node carries one.
    pub fn drawable(&self) -> Option<&D> {
        self.drawable.as_ref()
    }

    /// Whether this node is a pure grouping/pivot node.
    pub fn is_pivot(&self) -> bool {
        self.drawable.is_none()
    }
}

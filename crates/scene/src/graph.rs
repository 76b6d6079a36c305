//! Arena-backed scene graph.
//!
//! [`SceneGraph`] owns every node and hands out [`NodeId`] handles. The tree
//! has a single root created with the graph; nodes created afterwards float
//! unattached until [`SceneGraph::attach`] wires them under a parent.
//!
//! World transforms are never cached. They are recomputed from the local
//! transforms on every query, since pivots rotate every frame.
//!
//! # Example
//!
//! ```
//! use orrery_scene::SceneGraph;
//! use glam::Vec3;
//!
//! let mut graph: SceneGraph<()> = SceneGraph::new("root");
//! let pivot = graph.create_node("pivot").unwrap();
//! let planet = graph.create_drawable_node("planet", ()).unwrap();
//!
//! graph.attach(graph.root(), pivot).unwrap();
//! graph.attach(pivot, planet).unwrap();
//! graph.set_translation(planet, Vec3::new(6.0, 0.0, 0.0)).unwrap();
//!
//! graph.rotate(pivot, 0.0, std::f32::consts::PI, 0.0).unwrap();
//! let world = graph.world_transform(planet).unwrap();
//! assert!((world.translation - Vec3::new(-6.0, 0.0, 0.0)).length() < 1e-4);
//! ```

use std::collections::HashMap;

use glam::{Quat, Vec3};
use tracing::{debug, trace};

use crate::error::{SceneError, SceneResult};
use crate::node::{Node, NodeId};
use crate::transform::Transform;

#[derive(Clone, Debug)]
struct Slot<D> {
    generation: u32,
    node: Option<Node<D>>,
}

/// A tree of named transform nodes carrying optional drawables of type `D`.
#[derive(Clone, Debug)]
pub struct SceneGraph<D> {
    slots: Vec<Slot<D>>,
    free: Vec<usize>,
    names: HashMap<String, NodeId>,
    root: NodeId,
}

impl<D> SceneGraph<D> {
    /// Create a graph containing only a root node with the given name.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        let root = NodeId {
            index: 0,
            generation: 0,
        };
        let mut names = HashMap::new();
        names.insert(root_name.clone(), root);

        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new(root_name, None)),
            }],
            free: Vec::new(),
            names,
            root,
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the root cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `id` refers to a live node of this graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Whether a node called `name` exists anywhere in the graph.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Look up a node by handle.
    pub fn node(&self, id: NodeId) -> SceneResult<&Node<D>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(SceneError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> SceneResult<&mut Node<D>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(SceneError::UnknownNode(id))
    }

    /// Create an unattached grouping node.
    pub fn create_node(&mut self, name: impl Into<String>) -> SceneResult<NodeId> {
        self.insert(name.into(), None)
    }

    /// Create an unattached node carrying a drawable.
    pub fn create_drawable_node(
        &mut self,
        name: impl Into<String>,
        drawable: D,
    ) -> SceneResult<NodeId> {
        self.insert(name.into(), Some(drawable))
    }

    fn insert(&mut self, name: String, drawable: Option<D>) -> SceneResult<NodeId> {
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }

        let node = Some(Node::new(name.clone(), drawable));
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = node;
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node,
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };

        debug!(node = %name, index = id.index, generation = id.generation, "created node");
        self.names.insert(name, id);
        Ok(id)
    }

    /// Name of a node.
    pub fn name(&self, id: NodeId) -> SceneResult<&str> {
        Ok(self.node(id)?.name())
    }

    /// Parent of a node, `None` for the root and for detached nodes.
    pub fn parent(&self, id: NodeId) -> SceneResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children of a node in insertion order.
    pub fn children(&self, id: NodeId) -> SceneResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Local transform of a node.
    pub fn local(&self, id: NodeId) -> SceneResult<&Transform> {
        Ok(&self.node(id)?.local)
    }

    /// Drawable carried by a node, if any.
    pub fn drawable(&self, id: NodeId) -> SceneResult<Option<&D>> {
        Ok(self.node(id)?.drawable.as_ref())
    }

    /// Mutable access to the drawable carried by a node, if any.
    pub fn drawable_mut(&mut self, id: NodeId) -> SceneResult<Option<&mut D>> {
        Ok(self.node_mut(id)?.drawable.as_mut())
    }

    /// Replace the drawable of a node, returning the previous one.
    pub fn set_drawable(&mut self, id: NodeId, drawable: Option<D>) -> SceneResult<Option<D>> {
        let node = self.node_mut(id)?;
        Ok(std::mem::replace(&mut node.drawable, drawable))
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> SceneResult<bool> {
        self.node(ancestor)?;
        self.node(node)?;
        Ok(self.has_ancestor(node, ancestor))
    }

    fn has_ancestor(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.node(node).ok().and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).ok().and_then(|n| n.parent);
        }
        false
    }

    /// Append `child` to the children of `parent`.
    ///
    /// # Errors
    ///
    /// - [`SceneError::SelfAttach`] if `parent == child`, if `child` is an
    ///   ancestor of `parent`, or if `child` is the root.
    /// - [`SceneError::AlreadyAttached`] if `child` already has a parent.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if parent == child || child == self.root || self.has_ancestor(parent, child) {
            return Err(SceneError::SelfAttach {
                parent: parent_node.name.clone(),
                child: child_node.name.clone(),
            });
        }

        if let Some(current) = child_node.parent {
            return Err(SceneError::AlreadyAttached {
                child: child_node.name.clone(),
                parent: self.node(current)?.name.clone(),
            });
        }

        debug!(parent = %parent_node.name, child = %child_node.name, "attach");
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove `id` from its parent's children, returning the former parent.
    ///
    /// The node and its subtree stay alive in the graph and can be attached
    /// again.
    pub fn detach(&mut self, id: NodeId) -> SceneResult<NodeId> {
        let node = self.node(id)?;
        let Some(parent) = node.parent else {
            return Err(SceneError::NotAttached(node.name.clone()));
        };

        debug!(node = %node.name, "detach");
        self.node_mut(parent)?.children.retain(|&c| c != id);
        self.node_mut(id)?.parent = None;
        Ok(parent)
    }

    /// Detach `id` if attached and drop it together with its subtree.
    ///
    /// Returns the number of nodes removed. Their names and arena slots
    /// become free again; handles to them turn stale.
    pub fn remove(&mut self, id: NodeId) -> SceneResult<usize> {
        let node = self.node(id)?;
        if id == self.root {
            return Err(SceneError::RootRemoval(node.name.clone()));
        }
        if node.parent.is_some() {
            self.detach(id)?;
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                self.names.remove(&node.name);
                stack.extend(node.children);
                removed += 1;
            }
        }

        debug!(index = id.index, removed, "removed subtree");
        Ok(removed)
    }

    /// Find the node called `name` within the subtree rooted at `root`.
    ///
    /// # Errors
    ///
    /// [`SceneError::NotFound`] if no such node exists in that subtree, even
    /// if one exists elsewhere in the graph.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> SceneResult<NodeId> {
        self.node(root)?;
        match self.names.get(name) {
            Some(&id) if id == root || self.has_ancestor(id, root) => Ok(id),
            _ => Err(SceneError::NotFound(name.to_string())),
        }
    }

    /// Compose an incremental rotation onto the local rotation of `id`.
    ///
    /// Angles are in radians about the node's own X, Y, and Z axes, applied
    /// as described in [`Transform::euler_delta`]. Rotations accumulate
    /// across calls.
    pub fn rotate(
        &mut self,
        id: NodeId,
        x_angle: f32,
        y_angle: f32,
        z_angle: f32,
    ) -> SceneResult<()> {
        self.rotate_by(id, Transform::euler_delta(x_angle, y_angle, z_angle))
    }

    /// Compose an incremental quaternion rotation onto the local rotation of `id`.
    pub fn rotate_by(&mut self, id: NodeId, delta: Quat) -> SceneResult<()> {
        let node = self.node_mut(id)?;
        node.local.rotate_local(delta);
        trace!(node = %node.name, rotation = ?node.local.rotation, "rotate");
        Ok(())
    }

    /// Shift the local translation of `id`.
    pub fn translate(&mut self, id: NodeId, offset: Vec3) -> SceneResult<()> {
        self.node_mut(id)?.local.translate(offset);
        Ok(())
    }

    /// Set the local translation of `id`.
    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) -> SceneResult<()> {
        self.node_mut(id)?.local.translation = translation;
        Ok(())
    }

    /// Set the local rotation of `id`, discarding any accumulated rotation.
    pub fn set_rotation(&mut self, id: NodeId, rotation: Quat) -> SceneResult<()> {
        self.node_mut(id)?.local.rotation = rotation;
        Ok(())
    }

    /// Set the local scale of `id`.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec3) -> SceneResult<()> {
        self.node_mut(id)?.local.scale = scale;
        Ok(())
    }

    /// Replace the whole local transform of `id`.
    pub fn set_local(&mut self, id: NodeId, local: Transform) -> SceneResult<()> {
        self.node_mut(id)?.local = local;
        Ok(())
    }

    /// World transform of `id`: every ancestor's local transform composed
    /// parent-first, ending with the node's own.
    ///
    /// For a detached subtree the topmost detached node acts as the origin.
    pub fn world_transform(&self, id: NodeId) -> SceneResult<Transform> {
        let mut chain = vec![self.node(id)?];
        while let Some(parent) = chain[chain.len() - 1].parent {
            chain.push(self.node(parent)?);
        }

        Ok(chain
            .iter()
            .rev()
            .fold(Transform::IDENTITY, |world, node| world.mul_transform(&node.local)))
    }

    /// Pre-order walk of the subtree rooted at `root`, children in insertion
    /// order, pairing each node with its world transform.
    pub fn traverse(&self, root: NodeId) -> SceneResult<Vec<(NodeId, Transform)>> {
        let parent_world = match self.node(root)?.parent {
            Some(parent) => self.world_transform(parent)?,
            None => Transform::IDENTITY,
        };

        let mut visited = Vec::new();
        let mut stack = vec![(root, parent_world)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = self.node(id)?;
            let world = parent_world.mul_transform(&node.local);
            visited.push((id, world));
            stack.extend(node.children.iter().rev().map(|&child| (child, world)));
        }
        Ok(visited)
    }

    /// The same walk as [`traverse`](Self::traverse), restricted to nodes
    /// carrying a drawable. This is what a host submits for drawing.
    pub fn drawables(&self, root: NodeId) -> SceneResult<Vec<(NodeId, &D, Transform)>> {
        let visited = self.traverse(root)?;
        let mut drawables = Vec::new();
        for (id, world) in visited {
            if let Some(drawable) = self.node(id)?.drawable.as_ref() {
                drawables.push((id, drawable, world));
            }
        }
        Ok(drawables)
    }
}

//! Hierarchical transform scene graph.
//!
//! This crate provides the scene side of the orrery:
//! - Transforms and their parent-first composition
//! - An arena scene graph with named lookup and incremental rotation
//! - The solar-system layout and its per-frame orbit update

pub mod error;
pub mod graph;
pub mod node;
pub mod solar;
pub mod transform;

pub use error::{SceneError, SceneResult};
pub use graph::SceneGraph;
pub use node::{Node, NodeId};
pub use solar::{AngularRate, BodyDesc, OrbitRates, SolarSystem};
pub use transform::Transform;

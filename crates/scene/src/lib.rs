//! Scene graph: meshes, nodes, materials, lights and animated characters.
//!
//! # Invariants
//! - The scene owns every mesh; meshes never change after [`Scene::add_mesh`].
//! - Node iteration is deterministic (BTreeMap), so draw order is stable.
//! - Each character owns exactly one animation state, stepped once per frame.
//! - Only the vertical axis of a character root is animated.

mod character;
mod graph;
mod presets;
pub mod primitives;

pub use character::{RigMeshes, spawn_humanoid};
pub use graph::{
    CameraPlacement, Character, DrawItem, Lighting, Material, MeshHandle, Node, Renderable, Scene,
};
pub use presets::{MeadowOptions, ScenePreset};

use meadow_common::{ColorError, NodeId};
use meadow_terrain::TerrainError;

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("node {0} is not a character")]
    NotACharacter(NodeId),
    #[error("mesh handle {0:?} does not exist")]
    UnknownMesh(MeshHandle),
    #[error("parenting {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },
    #[error("unknown scene preset {0:?} (expected cube or meadow)")]
    UnknownPreset(String),
    #[error("terrain: {0}")]
    Terrain(#[from] TerrainError),
    #[error("colour: {0}")]
    Color(#[from] ColorError),
}

pub fn crate_info() -> &'static str {
    "meadow-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}

//! Terrain: procedural height field, the subdivided plane it displaces, and the
//! grid overlay drawn on top.
//!
//! # Invariants
//! - Elevation is a pure function of its inputs; no hidden state.
//! - Terrain meshes are built once and never mutated afterwards.
//! - Normals are recomputed from displaced positions before a mesh is handed out.

mod grid;
pub mod height_field;
mod plane;

pub use grid::{GridLine, GridOverlay};
pub use height_field::{GroundSample, HeightField};
pub use plane::{MAX_PLANE_VERTICES, PlaneSpec, TerrainMesh, ground_height, plane_orientation};

/// Errors from terrain construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TerrainError {
    #[error("plane needs at least one segment per axis, got {x}x{y}")]
    ZeroSegments { x: u32, y: u32 },
    #[error("plane extent must be finite and positive, got {0}")]
    InvalidSize(f32),
    #[error("plane of {x}x{y} segments exceeds {max} vertices")]
    TooManyVertices { x: u32, y: u32, max: u32 },
}

pub fn crate_info() -> &'static str {
    "meadow-terrain v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("terrain"));
    }

    #[test]
    fn errors_render_readably() {
        let err = TerrainError::ZeroSegments { x: 0, y: 3 };
        assert_eq!(
            err.to_string(),
            "plane needs at least one segment per axis, got 0x3"
        );
    }
}

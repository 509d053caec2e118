//! Shared types for the meadow viewport.
//!
//! Everything here is plain data: ids, transforms, colours and CPU-side meshes.
//! No GPU or windowing types leak into this crate.

mod mesh;
mod types;

pub use mesh::MeshData;
pub use types::{Color, ColorError, NodeId, Transform};

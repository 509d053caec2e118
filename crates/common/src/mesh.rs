use glam::Vec3;
use serde::{Deserialize, Serialize};

/// CPU-side triangle mesh: positions, per-vertex normals, triangle-list indices.
///
/// `positions` and `normals` always have the same length. Meshes are built once
/// and then treated as immutable by the scene graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create a mesh with zeroed normals. Call [`MeshData::compute_vertex_normals`]
    /// before rendering.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let normals = vec![Vec3::ZERO; positions.len()];
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recompute smooth per-vertex normals from the current positions.
    ///
    /// Face normals are accumulated unnormalized, so larger triangles weigh more,
    /// then each vertex normal is normalized. Vertices touched by no triangle
    /// keep a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        self.normals = acc.into_iter().map(|n| n.normalize_or_zero()).collect();
    }

    /// De-indexed copy where every triangle carries its own face normal.
    pub fn flat_shaded(&self) -> Self {
        let mut positions = Vec::with_capacity(self.indices.len());
        let mut normals = Vec::with_capacity(self.indices.len());
        for tri in self.indices.chunks_exact(3) {
            let pa = self.positions[tri[0] as usize];
            let pb = self.positions[tri[1] as usize];
            let pc = self.positions[tri[2] as usize];
            let n = (pb - pa).cross(pc - pa).normalize_or_zero();
            positions.extend([pa, pb, pc]);
            normals.extend([n, n, n]);
        }
        let indices = (0..positions.len() as u32).collect();
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit quad in the XZ plane, counter-clockwise seen from +Y.
    fn quad() -> MeshData {
        MeshData::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            vec![0, 1, 2, 2, 3, 0],
        )
    }

    #[test]
    fn smooth_normals_point_up_on_flat_quad() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        for n in &mesh.normals {
            assert!((*n - Vec3::Y).length() < 1e-6, "normal was {n}");
        }
    }

    #[test]
    fn flat_shading_deindexes() {
        let mut mesh = quad();
        mesh.compute_vertex_normals();
        let flat = mesh.flat_shaded();
        assert_eq!(flat.vertex_count(), 6);
        assert_eq!(flat.triangle_count(), 2);
        assert_eq!(flat.indices, vec![0, 1, 2, 3, 4, 5]);
        for n in &flat.normals {
            assert!((*n - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn unused_vertices_keep_zero_normal() {
        let mut mesh = quad();
        mesh.positions.push(Vec3::new(5.0, 5.0, 5.0));
        mesh.normals.push(Vec3::ZERO);
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals[4], Vec3::ZERO);
    }

    #[test]
    fn bounds_cover_all_vertices() {
        assert!(MeshData::default().bounds().is_none());
        let (lo, hi) = quad().bounds().unwrap();
        assert_eq!(lo, Vec3::ZERO);
        assert_eq!(hi, Vec3::new(1.0, 0.0, 1.0));
    }
}

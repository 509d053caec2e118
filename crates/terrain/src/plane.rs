use glam::{Quat, Vec3};
use meadow_common::MeshData;
use std::f32::consts::FRAC_PI_2;

use crate::TerrainError;
use crate::height_field::{GroundSample, HeightField};

/// Upper bound on plane vertices, so vertex indices always fit in `u32`.
pub const MAX_PLANE_VERTICES: u32 = 1 << 20;

/// Dimensions and subdivision of the terrain plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneSpec {
    pub width: f32,
    pub depth: f32,
    pub segments_x: u32,
    pub segments_y: u32,
}

impl Default for PlaneSpec {
    fn default() -> Self {
        Self {
            width: 50.0,
            depth: 50.0,
            segments_x: 32,
            segments_y: 32,
        }
    }
}

impl PlaneSpec {
    pub fn new(
        width: f32,
        depth: f32,
        segments_x: u32,
        segments_y: u32,
    ) -> Result<Self, TerrainError> {
        let spec = Self {
            width,
            depth,
            segments_x,
            segments_y,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Square plane with the same subdivision on both axes.
    pub fn square(size: f32, segments: u32) -> Result<Self, TerrainError> {
        Self::new(size, size, segments, segments)
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.segments_x == 0 || self.segments_y == 0 {
            return Err(TerrainError::ZeroSegments {
                x: self.segments_x,
                y: self.segments_y,
            });
        }
        let vertices = self
            .segments_x
            .checked_add(1)
            .zip(self.segments_y.checked_add(1))
            .and_then(|(columns, rows)| columns.checked_mul(rows));
        if !vertices.is_some_and(|v| v <= MAX_PLANE_VERTICES) {
            return Err(TerrainError::TooManyVertices {
                x: self.segments_x,
                y: self.segments_y,
                max: MAX_PLANE_VERTICES,
            });
        }
        for extent in [self.width, self.depth] {
            if !extent.is_finite() || extent <= 0.0 {
                return Err(TerrainError::InvalidSize(extent));
            }
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        (self.segments_x as usize + 1) * (self.segments_y as usize + 1)
    }

    pub fn triangle_count(&self) -> usize {
        self.segments_x as usize * self.segments_y as usize * 2
    }
}

/// Rotation that lays the plane's local XY onto world XZ, elevation on world +Y.
pub fn plane_orientation() -> Quat {
    Quat::from_rotation_x(-FRAC_PI_2)
}

/// Height of the terrain under world point `(x, z)` once the plane is laid flat
/// with [`plane_orientation`]. Local `y` maps to world `-z`.
pub fn ground_height(field: &HeightField, x: f32, z: f32) -> f32 {
    field.elevation(x, -z)
}

/// Terrain mesh baked from a [`HeightField`] over a subdivided plane.
///
/// The mesh is in plane-local space: `x` across, `y` along, elevation on `z`,
/// with the front face towards `+z`. Rows run from `+y` to `-y`, columns from
/// `-x` to `+x`. Immutable once built.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    spec: PlaneSpec,
    samples: Vec<GroundSample>,
    mesh: MeshData,
}

impl TerrainMesh {
    pub fn build(field: &HeightField, spec: &PlaneSpec) -> Result<Self, TerrainError> {
        let _span = tracing::debug_span!("terrain_build").entered();
        spec.validate()?;

        let columns = spec.segments_x + 1;
        let rows = spec.segments_y + 1;
        let cell_w = spec.width / spec.segments_x as f32;
        let cell_h = spec.depth / spec.segments_y as f32;
        let half_w = spec.width / 2.0;
        let half_h = spec.depth / 2.0;

        let mut samples = Vec::with_capacity(spec.vertex_count());
        let mut positions = Vec::with_capacity(spec.vertex_count());
        for row in 0..rows {
            let y = half_h - row as f32 * cell_h;
            for col in 0..columns {
                let x = col as f32 * cell_w - half_w;
                let sample = field.sample(x, y);
                positions.push(Vec3::new(x, y, sample.elevation));
                samples.push(sample);
            }
        }

        let mut indices = Vec::with_capacity(spec.triangle_count() * 3);
        for row in 0..spec.segments_y {
            for col in 0..spec.segments_x {
                let a = col + columns * row;
                let b = col + columns * (row + 1);
                let c = (col + 1) + columns * (row + 1);
                let d = (col + 1) + columns * row;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let mut mesh = MeshData::new(positions, indices);
        mesh.compute_vertex_normals();

        tracing::debug!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "terrain mesh built"
        );

        Ok(Self {
            spec: *spec,
            samples,
            mesh,
        })
    }

    pub fn spec(&self) -> &PlaneSpec {
        &self.spec
    }

    /// Height samples in vertex order.
    pub fn samples(&self) -> &[GroundSample] {
        &self.samples
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn into_mesh(self) -> MeshData {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_terrain() -> TerrainMesh {
        TerrainMesh::build(&HeightField::default(), &PlaneSpec::default()).unwrap()
    }

    #[test]
    fn default_plane_counts() {
        let terrain = default_terrain();
        assert_eq!(terrain.mesh().vertex_count(), 33 * 33);
        assert_eq!(terrain.mesh().triangle_count(), 32 * 32 * 2);
        assert_eq!(terrain.samples().len(), 33 * 33);
    }

    #[test]
    fn vertices_are_displaced_by_the_field() {
        let hf = HeightField::default();
        let terrain = default_terrain();
        for p in &terrain.mesh().positions {
            assert_eq!(p.z, hf.elevation(p.x, p.y));
        }
    }

    #[test]
    fn layout_starts_top_left() {
        let terrain = default_terrain();
        let positions = &terrain.mesh().positions;
        assert_eq!((positions[0].x, positions[0].y), (-25.0, 25.0));
        let last = positions[positions.len() - 1];
        assert_eq!((last.x, last.y), (25.0, -25.0));
    }

    #[test]
    fn normals_are_unit_and_face_up() {
        let terrain = default_terrain();
        for n in &terrain.mesh().normals {
            assert!((n.length() - 1.0).abs() < 1e-4);
            // Slopes never exceed 0.2, so normals stay close to +z.
            assert!(n.z > 0.9, "normal {n} leans too far");
        }
    }

    #[test]
    fn normals_follow_slope() {
        // At the origin dh/dx = 0.2, so the normal tilts towards -x.
        let terrain = default_terrain();
        let idx = terrain
            .mesh()
            .positions
            .iter()
            .position(|p| p.x == 0.0 && p.y == 0.0)
            .unwrap();
        let n = terrain.mesh().normals[idx];
        assert!(n.x < -0.1);
        assert!(n.y.abs() < 1e-2);
    }

    #[test]
    fn orientation_maps_elevation_to_world_up() {
        let hf = HeightField::default();
        let terrain = default_terrain();
        let rot = plane_orientation();
        for p in terrain.mesh().positions.iter().step_by(37) {
            let world = rot * *p;
            assert!((world.y - p.z).abs() < 1e-4);
            assert!((world.z + p.y).abs() < 1e-4);
            assert!((ground_height(&hf, world.x, world.z) - world.y).abs() < 1e-4);
        }
        let up = rot * Vec3::Z;
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn rejects_degenerate_specs() {
        assert!(matches!(
            PlaneSpec::new(50.0, 50.0, 0, 4),
            Err(TerrainError::ZeroSegments { x: 0, y: 4 })
        ));
        assert!(matches!(
            PlaneSpec::square(-1.0, 4),
            Err(TerrainError::InvalidSize(_))
        ));
        assert!(matches!(
            PlaneSpec::square(f32::NAN, 4),
            Err(TerrainError::InvalidSize(_))
        ));

        let bad = PlaneSpec {
            segments_x: 0,
            ..PlaneSpec::default()
        };
        assert!(TerrainMesh::build(&HeightField::default(), &bad).is_err());
    }

    #[test]
    fn rejects_oversized_planes() {
        assert!(matches!(
            PlaneSpec::new(50.0, 50.0, u32::MAX, 1),
            Err(TerrainError::TooManyVertices { x: u32::MAX, y: 1, .. })
        ));
        assert!(matches!(
            PlaneSpec::square(50.0, 1 << 16),
            Err(TerrainError::TooManyVertices { .. })
        ));
        // 1023 segments per side is exactly the vertex limit.
        assert!(PlaneSpec::square(50.0, 1023).is_ok());
        assert!(PlaneSpec::new(50.0, 50.0, 1024, 1023).is_err());

        let huge = PlaneSpec {
            segments_x: u32::MAX,
            ..PlaneSpec::default()
        };
        assert!(matches!(
            TerrainMesh::build(&HeightField::default(), &huge),
            Err(TerrainError::TooManyVertices { .. })
        ));
    }

    #[test]
    fn single_cell_plane() {
        let spec = PlaneSpec::square(2.0, 1).unwrap();
        let terrain = TerrainMesh::build(&HeightField::default(), &spec).unwrap();
        assert_eq!(terrain.mesh().indices, vec![0, 2, 1, 2, 3, 1]);
    }
}

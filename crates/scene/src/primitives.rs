//! Primitive shape meshes: box, cylinder, cone.
//!
//! All primitives are centred on the origin with Y up. Normals are filled in,
//! so the meshes can be drawn smooth as-is or passed through
//! [`MeshData::flat_shaded`].

use glam::Vec3;
use meadow_common::MeshData;
use std::f32::consts::TAU;

/// Axis-aligned box with per-face normals.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
    #[rustfmt::skip]
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        // +Z
        (Vec3::Z,     [Vec3::new(-x, -y,  z), Vec3::new( x, -y,  z), Vec3::new( x,  y,  z), Vec3::new(-x,  y,  z)]),
        // -Z
        (Vec3::NEG_Z, [Vec3::new( x, -y, -z), Vec3::new(-x, -y, -z), Vec3::new(-x,  y, -z), Vec3::new( x,  y, -z)]),
        // +X
        (Vec3::X,     [Vec3::new( x, -y,  z), Vec3::new( x, -y, -z), Vec3::new( x,  y, -z), Vec3::new( x,  y,  z)]),
        // -X
        (Vec3::NEG_X, [Vec3::new(-x, -y, -z), Vec3::new(-x, -y,  z), Vec3::new(-x,  y,  z), Vec3::new(-x,  y, -z)]),
        // +Y
        (Vec3::Y,     [Vec3::new(-x,  y,  z), Vec3::new( x,  y,  z), Vec3::new( x,  y, -z), Vec3::new(-x,  y, -z)]),
        // -Y
        (Vec3::NEG_Y, [Vec3::new(-x, -y, -z), Vec3::new( x, -y, -z), Vec3::new( x, -y,  z), Vec3::new(-x, -y,  z)]),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = positions.len() as u32;
        positions.extend(corners);
        normals.extend([normal; 4]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    MeshData {
        positions,
        normals,
        indices,
    }
}

/// Capped cylinder (or frustum) along Y. `radial_segments` is raised to 3.
///
/// A zero radius at either end collapses that ring to a point and skips its cap.
pub fn cylinder_mesh(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> MeshData {
    let segments = radial_segments.max(3);
    let half = height / 2.0;
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    // Side wall: a top ring and a bottom ring, seam duplicated.
    let ring = |radius: f32, y: f32| -> Vec<Vec3> {
        (0..=segments)
            .map(|i| {
                let theta = i as f32 / segments as f32 * TAU;
                Vec3::new(radius * theta.sin(), y, radius * theta.cos())
            })
            .collect()
    };
    positions.extend(ring(radius_top, half));
    positions.extend(ring(radius_bottom, -half));
    let stride = segments + 1;
    for i in 0..segments {
        let a = i;
        let b = stride + i;
        let c = stride + i + 1;
        let d = i + 1;
        if radius_top > 0.0 {
            indices.extend_from_slice(&[a, b, d]);
        }
        if radius_bottom > 0.0 {
            indices.extend_from_slice(&[b, c, d]);
        }
    }

    let mut mesh = MeshData::new(positions, indices);
    mesh.compute_vertex_normals();

    if radius_top > 0.0 {
        add_cap(&mut mesh, radius_top, half, segments, true);
    }
    if radius_bottom > 0.0 {
        add_cap(&mut mesh, radius_bottom, -half, segments, false);
    }
    mesh
}

/// Cone along Y with its apex at `+height / 2`.
pub fn cone_mesh(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    cylinder_mesh(0.0, radius, height, radial_segments)
}

fn add_cap(mesh: &mut MeshData, radius: f32, y: f32, segments: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.positions.len() as u32;
    mesh.positions.push(Vec3::new(0.0, y, 0.0));
    mesh.normals.push(normal);
    for i in 0..=segments {
        let theta = i as f32 / segments as f32 * TAU;
        mesh.positions
            .push(Vec3::new(radius * theta.sin(), y, radius * theta.cos()));
        mesh.normals.push(normal);
    }
    for i in 0..segments {
        let a = center + 1 + i;
        let b = a + 1;
        if top {
            mesh.indices.extend_from_slice(&[center, a, b]);
        } else {
            mesh.indices.extend_from_slice(&[center, b, a]);
        }
    }
}

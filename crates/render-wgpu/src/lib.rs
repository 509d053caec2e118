//! wgpu render backend for meadow scenes.
//!
//! Draws the grid overlay as lines and every renderable node as an instanced,
//! lit mesh. The viewer uses an orbit camera around a target point.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Camera motion is not part of scene state.
//! - Frame rate is independent of animation; the scene is advanced by
//!   elapsed time, not by frame count.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::{GpuContext, GpuError, SceneRenderer};

use meadow_render::RenderView;

impl From<&OrbitCamera> for RenderView {
    fn from(camera: &OrbitCamera) -> Self {
        Self {
            eye: camera.position(),
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn orbit_camera_converts_to_render_view() {
        let cam = OrbitCamera::from_eye(Vec3::new(0.0, 4.0, 8.0), Vec3::Y, 75.0);
        let view = RenderView::from(&cam);
        assert!((view.eye - Vec3::new(0.0, 4.0, 8.0)).length() < 1e-4);
        assert_eq!(view.target, Vec3::Y);
        assert!((view.fov_degrees - 75.0).abs() < 1e-4);
    }
}

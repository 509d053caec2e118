use glam::Vec3;
use meadow_scene::{CameraPlacement, Scene};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        CameraPlacement::default().into()
    }
}

impl From<CameraPlacement> for RenderView {
    fn from(c: CameraPlacement) -> Self {
        Self {
            eye: c.eye,
            target: c.target,
            fov_degrees: c.fov_degrees,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable dump of the scene: view, lighting, every drawn
/// mesh at its world position, and each character's bob state. Used by the
/// CLI and in tests where no GPU is available.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let out = write_scene(scene, view);
        tracing::trace!(bytes = out.len(), "debug frame rendered");
        out
    }
}

fn write_scene(scene: &Scene, view: &RenderView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Scene (frame={}, t={:.3}s) ===\n",
        scene.frames(),
        scene.elapsed()
    ));
    out.push_str(&format!(
        "Meshes: {}  Nodes: {}  Characters: {}\n",
        scene.meshes().len(),
        scene.node_count(),
        scene.characters().count()
    ));
    out.push_str(&format!(
        "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
        view.eye.x,
        view.eye.y,
        view.eye.z,
        view.target.x,
        view.target.y,
        view.target.z,
        view.fov_degrees
    ));
    let light = scene.lighting();
    let lp = light.point_light_position;
    out.push_str(&format!(
        "Lights: ambient={:.2} point=({:.1}, {:.1}, {:.1}) x{:.2}\n",
        light.ambient_intensity, lp.x, lp.y, lp.z, light.point_light_intensity
    ));
    if let Some(grid) = scene.grid() {
        out.push_str(&format!(
            "Grid: size={} divisions={} color={}\n",
            grid.size,
            grid.divisions,
            grid.color.to_hex()
        ));
    }

    for item in scene.draw_list() {
        let name = scene.get(item.node).map(|n| n.name.as_str()).unwrap_or("?");
        let p = item.model.transform_point3(Vec3::ZERO);
        let tris = scene
            .mesh(item.mesh)
            .map(|m| m.triangle_count())
            .unwrap_or(0);
        out.push_str(&format!(
            "  {name:<20} pos=({:.2}, {:.2}, {:.2}) tris={tris} color={}{}\n",
            p.x,
            p.y,
            p.z,
            item.material.color.to_hex(),
            if item.material.flat_shading { " flat" } else { "" }
        ));
    }

    for c in scene.characters() {
        out.push_str(&format!(
            "  character [{}] moving={} phase={:.4} offset={:+.4}\n",
            c.root.short(),
            c.moving,
            c.animation.phase,
            c.offset
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_scene::MeadowOptions;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &RenderView::default());

        assert!(output.contains("frame=0"));
        assert!(output.contains("Nodes: 0"));
        assert!(!output.contains("Grid:"));
    }

    #[test]
    fn debug_renderer_cube() {
        let scene = Scene::cube();
        let view = RenderView::from(*scene.camera());
        let output = DebugTextRenderer::new().render(&scene, &view);

        assert!(output.contains("box"));
        assert!(output.contains("tris=12"));
        assert!(output.contains("color=#ffa500"));
        assert!(output.contains("eye=(0.0, 0.0, 5.0)"));
    }

    #[test]
    fn debug_renderer_meadow_after_frames() {
        let mut scene = Scene::meadow(&MeadowOptions::default()).unwrap();
        for frame in 1..=10 {
            scene.advance(frame as f32 / 60.0);
        }
        let output = DebugTextRenderer::new().render(&scene, &RenderView::from(*scene.camera()));

        assert!(output.contains("frame=10"));
        assert!(output.contains("terrain"));
        assert!(output.contains("character/hat"));
        assert!(output.contains("moving=false"));
        assert!(output.contains("Grid: size=50 divisions=50 color=#306850"));
    }

    #[test]
    fn debug_renderer_writes_one_line_per_entry() {
        let scene = Scene::meadow(&MeadowOptions::default()).unwrap();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());

        let expected = 4
            + usize::from(scene.grid().is_some())
            + scene.draw_list().len()
            + scene.characters().count();
        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), expected);
        assert!(output.lines().all(|line| !line.trim().is_empty()));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 75.0);
        assert_eq!(view.target, Vec3::ZERO);
    }
}

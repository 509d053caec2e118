use glam::Vec3;
use meadow_common::{Color, Transform};
use meadow_terrain::{
    GridOverlay, HeightField, PlaneSpec, TerrainMesh, ground_height, plane_orientation,
};
use std::str::FromStr;

use crate::SceneError;
use crate::character::{RigMeshes, spawn_humanoid};
use crate::graph::{CameraPlacement, Material, Renderable, Scene};
use crate::primitives::box_mesh;

pub const TERRAIN_COLOR: &str = "#88c070";

/// The scenes the viewport knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScenePreset {
    /// A single orange cube in front of the camera.
    Cube,
    /// A humanoid on rolling terrain with a grid overlay.
    #[default]
    Meadow,
}

impl FromStr for ScenePreset {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cube" | "box" => Ok(Self::Cube),
            "meadow" | "terrain" => Ok(Self::Meadow),
            _ => Err(SceneError::UnknownPreset(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScenePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cube => f.write_str("cube"),
            Self::Meadow => f.write_str("meadow"),
        }
    }
}

/// Knobs for [`Scene::meadow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeadowOptions {
    pub field: HeightField,
    pub plane: PlaneSpec,
    pub grid: Option<GridOverlay>,
    /// Character position; `y` is measured from the ground under `(x, z)`.
    pub character_position: Vec3,
    pub moving: bool,
}

impl Default for MeadowOptions {
    fn default() -> Self {
        Self {
            field: HeightField::default(),
            plane: PlaneSpec::default(),
            grid: Some(GridOverlay::default()),
            character_position: Vec3::ZERO,
            moving: false,
        }
    }
}

impl Scene {
    pub fn from_preset(preset: ScenePreset, options: &MeadowOptions) -> Result<Self, SceneError> {
        match preset {
            ScenePreset::Cube => Ok(Self::cube()),
            ScenePreset::Meadow => Self::meadow(options),
        }
    }

    /// Orange unit cube at the origin, viewed from `(0, 0, 5)`.
    pub fn cube() -> Self {
        let mut scene = Self::new();
        let mesh = scene.add_mesh(box_mesh(1.0, 1.0, 1.0));
        let node = scene.spawn("box", Transform::default());
        if let Err(e) = scene.set_renderable(
            node,
            Renderable {
                mesh,
                material: Material::smooth(Color::ORANGE),
            },
        ) {
            tracing::error!("cube preset: {e}");
        }
        scene.set_camera(CameraPlacement::default());
        tracing::info!("cube scene built");
        scene
    }

    /// Terrain, grid overlay and one humanoid standing on the ground.
    pub fn meadow(options: &MeadowOptions) -> Result<Self, SceneError> {
        let _span = tracing::info_span!("meadow_build").entered();
        let mut scene = Self::new();

        let terrain = TerrainMesh::build(&options.field, &options.plane)?;
        let terrain_mesh = scene.add_mesh(terrain.into_mesh().flat_shaded());
        scene.spawn_mesh(
            "terrain",
            Transform {
                rotation: plane_orientation(),
                ..Transform::default()
            },
            terrain_mesh,
            Material::flat(Color::from_hex(TERRAIN_COLOR)?),
        )?;
        scene.set_grid(options.grid);

        let p = options.character_position;
        let ground = ground_height(&options.field, p.x, p.z);
        let rig = RigMeshes::build(&mut scene);
        spawn_humanoid(
            &mut scene,
            &rig,
            "character",
            Vec3::new(p.x, ground + p.y, p.z),
            options.moving,
        )?;

        scene.set_camera(CameraPlacement {
            eye: Vec3::new(0.0, 4.0, 8.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_degrees: 75.0,
        });

        tracing::info!(
            meshes = scene.meshes().len(),
            nodes = scene.node_count(),
            "meadow scene built"
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meadow_terrain::TerrainError;

    #[test]
    fn parse_presets() {
        assert_eq!("cube".parse::<ScenePreset>().unwrap(), ScenePreset::Cube);
        assert_eq!("Meadow".parse::<ScenePreset>().unwrap(), ScenePreset::Meadow);
        assert!(matches!(
            "castle".parse::<ScenePreset>(),
            Err(SceneError::UnknownPreset(_))
        ));
        assert_eq!(ScenePreset::Cube.to_string(), "cube");
    }

    #[test]
    fn cube_scene_has_one_orange_box() {
        let scene = Scene::cube();
        let items = scene.draw_list();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].material.color, Color::ORANGE);
        assert_eq!(scene.camera().eye, Vec3::new(0.0, 0.0, 5.0));
        assert!(scene.grid().is_none());
        assert_eq!(scene.characters().count(), 0);
    }

    #[test]
    fn meadow_scene_contents() {
        let scene = Scene::meadow(&MeadowOptions::default()).unwrap();
        // Terrain plus seven body parts.
        assert_eq!(scene.draw_list().len(), 8);
        // Terrain mesh plus five rig meshes.
        assert_eq!(scene.meshes().len(), 6);
        assert_eq!(scene.characters().count(), 1);
        assert!(scene.grid().is_some());
        assert_eq!(scene.lighting().point_light_position, Vec3::splat(10.0));
    }

    #[test]
    fn terrain_is_flat_shaded_and_laid_flat() {
        let scene = Scene::meadow(&MeadowOptions::default()).unwrap();
        let terrain = scene
            .nodes()
            .values()
            .find(|n| n.name == "terrain")
            .unwrap();
        let renderable = terrain.renderable.unwrap();
        let mesh = scene.mesh(renderable.mesh).unwrap();
        assert_eq!(mesh.vertex_count(), 32 * 32 * 2 * 3);
        let up = terrain.transform.rotation * Vec3::Z;
        assert!((up - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn character_stands_on_the_ground() {
        let options = MeadowOptions {
            character_position: Vec3::new(7.0, 0.0, -4.0),
            ..MeadowOptions::default()
        };
        let scene = Scene::meadow(&options).unwrap();
        let c = scene.characters().next().unwrap();
        let expected = options.field.elevation(7.0, 4.0);
        assert_eq!(c.rest_position, Vec3::new(7.0, expected, -4.0));
    }

    #[test]
    fn bad_plane_is_reported() {
        let options = MeadowOptions {
            plane: PlaneSpec {
                segments_x: 0,
                ..PlaneSpec::default()
            },
            ..MeadowOptions::default()
        };
        assert!(matches!(
            Scene::meadow(&options),
            Err(SceneError::Terrain(TerrainError::ZeroSegments { .. }))
        ));
    }

    #[test]
    fn from_preset_dispatches() {
        let options = MeadowOptions::default();
        let cube = Scene::from_preset(ScenePreset::Cube, &options).unwrap();
        assert_eq!(cube.node_count(), 1);
        let meadow = Scene::from_preset(ScenePreset::Meadow, &options).unwrap();
        assert_eq!(meadow.node_count(), 1 + 8);
    }
}

use glam::Vec3;
use meadow_common::{Color, NodeId, Transform};

use crate::SceneError;
use crate::graph::{Material, MeshHandle, Renderable, Scene};
use crate::primitives::{box_mesh, cone_mesh, cylinder_mesh};

pub const SKIN_COLOR: &str = "#f8f8d8";
pub const TUNIC_COLOR: &str = "#88c070";
pub const PANTS_COLOR: &str = "#886840";
pub const HAT_COLOR: &str = "#306850";

/// Flat-shaded meshes shared by every humanoid in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigMeshes {
    pub hat: MeshHandle,
    pub head: MeshHandle,
    pub tunic: MeshHandle,
    pub arm: MeshHandle,
    pub leg: MeshHandle,
}

impl RigMeshes {
    pub fn build(scene: &mut Scene) -> Self {
        Self {
            hat: scene.add_mesh(cone_mesh(0.25, 0.3, 4).flat_shaded()),
            head: scene.add_mesh(box_mesh(0.4, 0.4, 0.4).flat_shaded()),
            tunic: scene.add_mesh(box_mesh(0.5, 0.6, 0.3).flat_shaded()),
            arm: scene.add_mesh(cylinder_mesh(0.08, 0.08, 0.4, 6).flat_shaded()),
            leg: scene.add_mesh(cylinder_mesh(0.1, 0.1, 0.5, 6).flat_shaded()),
        }
    }
}

/// One body part: name, mesh, offset from the character root, colour.
struct Part {
    name: &'static str,
    mesh: MeshHandle,
    offset: Vec3,
    color: Color,
}

/// Low-poly humanoid: hat, head, tunic, two arms, two legs.
///
/// Spawns a root group at `rest_position` with one child per body part and
/// registers the root as an animated character.
pub fn spawn_humanoid(
    scene: &mut Scene,
    rig: &RigMeshes,
    name: &str,
    rest_position: Vec3,
    moving: bool,
) -> Result<NodeId, SceneError> {
    let skin = Color::from_hex(SKIN_COLOR)?;
    let tunic = Color::from_hex(TUNIC_COLOR)?;
    let pants = Color::from_hex(PANTS_COLOR)?;
    let hat = Color::from_hex(HAT_COLOR)?;

    #[rustfmt::skip]
    let parts = [
        Part { name: "hat", mesh: rig.hat, offset: Vec3::new(0.0, 1.72, 0.0), color: hat },
        Part { name: "head", mesh: rig.head, offset: Vec3::new(0.0, 1.35, 0.0), color: skin },
        Part { name: "tunic", mesh: rig.tunic, offset: Vec3::new(0.0, 0.8, 0.0), color: tunic },
        Part { name: "right_arm", mesh: rig.arm, offset: Vec3::new(-0.35, 0.7, 0.0), color: skin },
        Part { name: "left_arm", mesh: rig.arm, offset: Vec3::new(0.35, 0.7, 0.0), color: skin },
        Part { name: "right_leg", mesh: rig.leg, offset: Vec3::new(-0.15, 0.22, 0.0), color: pants },
        Part { name: "left_leg", mesh: rig.leg, offset: Vec3::new(0.15, 0.22, 0.0), color: pants },
    ];

    let root = scene.spawn(name, Transform::from_position(rest_position));
    for part in parts {
        let child = scene.spawn_child(
            root,
            format!("{name}/{}", part.name),
            Transform::from_position(part.offset),
        )?;
        scene.set_renderable(
            child,
            Renderable {
                mesh: part.mesh,
                material: Material::flat(part.color),
            },
        )?;
    }
    scene.add_character(root, rest_position, moving)?;

    tracing::info!(
        root = %root.short(),
        x = rest_position.x,
        y = rest_position.y,
        z = rest_position.z,
        moving,
        "humanoid spawned"
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanoid_has_seven_parts() {
        let mut scene = Scene::new();
        let rig = RigMeshes::build(&mut scene);
        let root = spawn_humanoid(&mut scene, &rig, "hero", Vec3::ZERO, false).unwrap();

        assert_eq!(scene.children(root).len(), 7);
        assert_eq!(scene.node_count(), 8);
        assert_eq!(scene.draw_list().len(), 7);
        assert_eq!(scene.meshes().len(), 5);
        assert!(scene.character(root).is_some());
    }

    #[test]
    fn parts_follow_the_bob() {
        let mut scene = Scene::new();
        let rig = RigMeshes::build(&mut scene);
        let rest = Vec3::new(0.0, 1.0, 0.0);
        let root = spawn_humanoid(&mut scene, &rig, "hero", rest, true).unwrap();
        let hat = scene
            .children(root)
            .into_iter()
            .find(|id| scene.get(*id).unwrap().name == "hero/hat")
            .unwrap();

        scene.advance(0.5);
        let offset = scene.character(root).unwrap().offset;
        let p = scene.world_position(hat).unwrap();
        assert!((p.y - (1.0 + 1.72 + offset)).abs() < 1e-5);
    }

    #[test]
    fn parts_are_flat_shaded_with_palette() {
        let mut scene = Scene::new();
        let rig = RigMeshes::build(&mut scene);
        spawn_humanoid(&mut scene, &rig, "hero", Vec3::ZERO, false).unwrap();

        let colors: Vec<String> = scene
            .draw_list()
            .iter()
            .map(|item| {
                assert!(item.material.flat_shading);
                item.material.color.to_hex()
            })
            .collect();
        for hex in [SKIN_COLOR, TUNIC_COLOR, PANTS_COLOR, HAT_COLOR] {
            assert!(colors.iter().any(|c| c == hex), "missing {hex}");
        }
    }

    #[test]
    fn rig_meshes_are_shared() {
        let mut scene = Scene::new();
        let rig = RigMeshes::build(&mut scene);
        spawn_humanoid(&mut scene, &rig, "a", Vec3::ZERO, false).unwrap();
        spawn_humanoid(&mut scene, &rig, "b", Vec3::new(3.0, 0.0, 0.0), true).unwrap();
        assert_eq!(scene.meshes().len(), 5);
        assert_eq!(scene.characters().count(), 2);
    }
}

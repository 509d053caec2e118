use glam::{Mat4, Vec3};
use meadow_animation::{AnimationState, BobAnimator};
use meadow_common::{Color, MeshData, NodeId, Transform};
use meadow_terrain::GridOverlay;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::SceneError;

/// Index of a mesh owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

/// Surface appearance of a renderable node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub flat_shading: bool,
}

impl Material {
    pub fn flat(color: Color) -> Self {
        Self {
            color,
            flat_shading: true,
        }
    }

    pub fn smooth(color: Color) -> Self {
        Self {
            color,
            flat_shading: false,
        }
    }
}

/// Renderable component: which mesh to draw and how it looks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub material: Material,
}

/// A node in the scene graph. Transforms are local to the parent.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub parent: Option<NodeId>,
    pub renderable: Option<Renderable>,
}

/// Ambient plus a single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_intensity: f32,
    pub point_light_position: Vec3,
    pub point_light_intensity: f32,
    pub background: Color,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.5,
            point_light_position: Vec3::new(10.0, 10.0, 10.0),
            point_light_intensity: 1.0,
            background: Color::rgb(0.1, 0.1, 0.15),
        }
    }
}

/// Where the viewer starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraPlacement {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// An animated character rooted at a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Character {
    pub root: NodeId,
    /// Root position the bob is applied on top of.
    pub rest_position: Vec3,
    pub moving: bool,
    pub animation: AnimationState,
    /// Offset written on the most recent frame.
    pub offset: f32,
}

/// One mesh to draw this frame, with its world matrix resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub mesh: MeshHandle,
    pub model: Mat4,
    pub material: Material,
}

/// The scene graph.
///
/// Owns every mesh, node and character. Meshes are immutable once added.
/// Nodes live in a BTreeMap so iteration (and therefore draw order and the
/// state hash) is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<MeshData>,
    nodes: BTreeMap<NodeId, Node>,
    characters: BTreeMap<NodeId, Character>,
    animator: BobAnimator,
    lighting: Lighting,
    camera: CameraPlacement,
    grid: Option<GridOverlay>,
    elapsed: f32,
    frames: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn camera(&self) -> &CameraPlacement {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: CameraPlacement) {
        self.camera = camera;
    }

    pub fn grid(&self) -> Option<&GridOverlay> {
        self.grid.as_ref()
    }

    pub fn set_grid(&mut self, grid: Option<GridOverlay>) {
        self.grid = grid;
    }

    /// Elapsed time passed to the most recent [`Scene::advance`].
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    // --- Meshes ---

    /// Take ownership of a mesh. Returns its handle.
    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        tracing::debug!(
            handle = handle.0,
            vertices = mesh.vertex_count(),
            "mesh added"
        );
        self.meshes.push(mesh);
        handle
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    // --- Nodes ---

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Read-only access to all nodes (BTreeMap for deterministic iteration).
    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Spawn a root-level node.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(
            id,
            Node {
                name: name.into(),
                transform,
                parent: None,
                renderable: None,
            },
        );
        id
    }

    /// Spawn a node under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.spawn(name, transform);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(parent);
        }
        Ok(id)
    }

    /// Spawn a root-level node that draws `mesh` with `material`.
    pub fn spawn_mesh(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        mesh: MeshHandle,
        material: Material,
    ) -> Result<NodeId, SceneError> {
        let id = self.spawn(name, transform);
        self.set_renderable(id, Renderable { mesh, material })?;
        Ok(id)
    }

    pub fn set_renderable(&mut self, id: NodeId, renderable: Renderable) -> Result<(), SceneError> {
        if self.mesh(renderable.mesh).is_none() {
            return Err(SceneError::UnknownMesh(renderable.mesh));
        }
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.renderable = Some(renderable);
        Ok(())
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.transform = transform;
        Ok(())
    }

    /// Move `id` under `parent` (or to the root with `None`). Refuses cycles.
    pub fn reparent(&mut self, id: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::NodeNotFound(id));
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                return Err(SceneError::NodeNotFound(p));
            }
            if p == id || self.ancestors(p).contains(&id) {
                return Err(SceneError::Cycle { node: id, parent: p });
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
        Ok(())
    }

    /// Direct children of `id`, in id order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Remove `id` and all of its descendants. Characters rooted in the removed
    /// subtree are dropped with it. Returns the number of nodes removed.
    pub fn despawn(&mut self, id: NodeId) -> Result<usize, SceneError> {
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::NodeNotFound(id));
        }
        let mut stack = vec![id];
        let mut removed = 0;
        while let Some(next) = stack.pop() {
            stack.extend(self.children(next));
            if self.nodes.remove(&next).is_some() {
                removed += 1;
            }
            if self.characters.remove(&next).is_some() {
                tracing::debug!(root = %next.short(), "character removed");
            }
        }
        Ok(removed)
    }

    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(&id).and_then(|n| n.parent);
        while let Some(p) = cursor {
            if out.contains(&p) || out.len() > self.nodes.len() {
                break;
            }
            out.push(p);
            cursor = self.nodes.get(&p).and_then(|n| n.parent);
        }
        out
    }

    /// World matrix of `id`: its local transform composed with every ancestor's.
    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?;
        let mut matrix = node.transform.to_matrix();
        let mut cursor = node.parent;
        let mut depth = 0;
        while let Some(p) = cursor {
            depth += 1;
            if depth > self.nodes.len() {
                return Err(SceneError::Cycle { node: id, parent: p });
            }
            let parent = self.nodes.get(&p).ok_or(SceneError::NodeNotFound(p))?;
            matrix = parent.transform.to_matrix() * matrix;
            cursor = parent.parent;
        }
        Ok(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vec3, SceneError> {
        Ok(self.world_matrix(id)?.transform_point3(Vec3::ZERO))
    }

    /// Everything renderable, with world matrices resolved, in node id order.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| {
                let renderable = node.renderable?;
                match self.world_matrix(*id) {
                    Ok(model) => Some(DrawItem {
                        node: *id,
                        mesh: renderable.mesh,
                        model,
                        material: renderable.material,
                    }),
                    Err(e) => {
                        tracing::warn!("skipping {}: {e}", node.name);
                        None
                    }
                }
            })
            .collect()
    }

    // --- Characters ---

    /// Register `root` as an animated character resting at `rest_position`.
    pub fn add_character(
        &mut self,
        root: NodeId,
        rest_position: Vec3,
        moving: bool,
    ) -> Result<(), SceneError> {
        self.set_transform(root, Transform::from_position(rest_position))?;
        self.characters.insert(
            root,
            Character {
                root,
                rest_position,
                moving,
                animation: AnimationState::default(),
                offset: 0.0,
            },
        );
        Ok(())
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn character(&self, root: NodeId) -> Option<&Character> {
        self.characters.get(&root)
    }

    pub fn set_moving(&mut self, root: NodeId, moving: bool) -> Result<(), SceneError> {
        let character = self
            .characters
            .get_mut(&root)
            .ok_or(SceneError::NotACharacter(root))?;
        character.moving = moving;
        Ok(())
    }

    /// Flip every character between idle and walking.
    pub fn toggle_moving(&mut self) {
        for character in self.characters.values_mut() {
            character.moving = !character.moving;
        }
    }

    /// Advance every character to `elapsed` seconds since scene start.
    ///
    /// The bob offset is added to the rest height; X and Z are reset to the
    /// rest position on every frame.
    pub fn advance(&mut self, elapsed: f32) {
        let _span = tracing::trace_span!("scene_advance", elapsed).entered();
        self.elapsed = elapsed;
        self.frames += 1;
        for character in self.characters.values_mut() {
            let offset = self
                .animator
                .step(elapsed, character.moving, &mut character.animation);
            character.offset = offset;
            if let Some(node) = self.nodes.get_mut(&character.root) {
                node.transform.position = character.rest_position + Vec3::Y * offset;
            }
        }
    }

    /// Deterministic hash of node transforms and animation state.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.frames.to_le_bytes());
        mix(&mut h, &self.elapsed.to_le_bytes());
        for (id, node) in &self.nodes {
            mix(&mut h, id.0.as_bytes());
            let t = &node.transform;
            for v in t.position.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.rotation.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
            for v in t.scale.to_array() {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        for (id, c) in &self.characters {
            mix(&mut h, id.0.as_bytes());
            mix(&mut h, &c.animation.phase.to_le_bytes());
            mix(&mut h, &c.animation.last_sample_time.to_le_bytes());
            mix(&mut h, &[c.moving as u8]);
        }
        h
    }
}

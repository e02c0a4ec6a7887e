use std::sync::Arc;

use crate::foundation::core::{BoundingSphere, Mat4, PixelBuffer, UvBounds, Vec2, Vec3};
use crate::overlay::compositor::Overlay;

/// Index of a mesh in a [`Model`]'s flattened mesh list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// Base (non-overlay) surface description of a mesh.
#[derive(Clone, Debug)]
pub struct BaseMaterial {
    /// Linear base color factor, straight alpha.
    pub base_color: [f32; 4],
    /// Optional base color texture, sampled with the mesh's first UV set.
    pub texture: Option<Arc<PixelBuffer>>,
}

impl Default for BaseMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
        }
    }
}

/// One drawable triangle mesh with its world transform.
#[derive(Clone, Debug)]
pub struct MeshNode {
    /// Display name as authored in the source file.
    pub name: String,
    /// Object-space vertex positions.
    pub positions: Vec<Vec3>,
    /// First texture-coordinate set, one per vertex when present.
    pub uvs: Option<Vec<Vec2>>,
    /// Triangle list indices into `positions`.
    pub indices: Vec<u32>,
    /// Object-to-world transform.
    pub world: Mat4,
    /// Base surface.
    pub material: BaseMaterial,
    pub(crate) overlay: Option<Overlay>,
}

impl MeshNode {
    /// Mesh with identity transform, default material and no UVs.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            positions,
            uvs: None,
            indices,
            world: Mat4::IDENTITY,
            material: BaseMaterial::default(),
            overlay: None,
        }
    }

    /// Attach a texture-coordinate set.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Replace the world transform.
    pub fn with_world(mut self, world: Mat4) -> Self {
        self.world = world;
        self
    }

    /// Replace the base material.
    pub fn with_material(mut self, material: BaseMaterial) -> Self {
        self.material = material;
        self
    }

    /// `true` when the mesh carries a non-empty UV set.
    pub fn has_uvs(&self) -> bool {
        self.uvs.as_ref().is_some_and(|uvs| !uvs.is_empty())
    }

    /// Texture-space bounding box, or `None` without usable UVs.
    pub fn uv_bounds(&self) -> Option<UvBounds> {
        UvBounds::from_uvs(self.uvs.as_deref()?)
    }

    /// The overlay bound to this mesh, if any.
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Number of complete triangles in `indices`.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Summary of one mesh, as handed to the piece indexer and to callers listing a model.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MeshDescriptor {
    /// Position in the flattened mesh list.
    #[serde(skip)]
    pub id: MeshId,
    /// Raw display name.
    pub name: String,
    /// Whether texture coordinates are present.
    pub has_uv: bool,
    /// UV bounding box when available.
    pub bounds: Option<UvBounds>,
}

/// A loaded model: meshes flattened in scene traversal order.
#[derive(Clone, Debug, Default)]
pub struct Model {
    meshes: Vec<MeshNode>,
}

impl Model {
    /// Build a model from already flattened meshes.
    pub fn from_meshes(meshes: Vec<MeshNode>) -> Self {
        Self { meshes }
    }

    /// All meshes in traversal order.
    pub fn meshes(&self) -> &[MeshNode] {
        &self.meshes
    }

    /// Mesh by id.
    pub fn mesh(&self, id: MeshId) -> Option<&MeshNode> {
        self.meshes.get(id.0)
    }

    /// Mutable mesh by id.
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut MeshNode> {
        self.meshes.get_mut(id.0)
    }

    /// `true` for a model without meshes.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Describe every mesh.
    pub fn descriptors(&self) -> Vec<MeshDescriptor> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| MeshDescriptor {
                id: MeshId(i),
                name: m.name.clone(),
                has_uv: m.has_uvs(),
                bounds: m.uv_bounds(),
            })
            .collect()
    }

    /// World-space axis-aligned bounds `(min, max)` over every referenced vertex.
    pub fn world_aabb(&self) -> Option<(Vec3, Vec3)> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut any = false;
        for mesh in &self.meshes {
            for p in &mesh.positions {
                let w = mesh.world.transform_point3(*p);
                if !w.is_finite() {
                    continue;
                }
                min = min.min(w);
                max = max.max(w);
                any = true;
            }
        }
        any.then_some((min, max))
    }

    /// Sphere around [`Model::world_aabb`]: box center, half diagonal radius.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        let (min, max) = self.world_aabb()?;
        Some(BoundingSphere {
            center: (min + max) * 0.5,
            radius: ((max - min).length() * 0.5).max(1e-6),
        })
    }

    /// Number of meshes currently carrying an overlay.
    pub fn overlay_count(&self) -> usize {
        self.meshes.iter().filter(|m| m.overlay.is_some()).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

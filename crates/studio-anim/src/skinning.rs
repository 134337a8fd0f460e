//! Rigid vertex skinning
//!
//! Every vertex belongs to exactly one bone, so skinning is a single
//! matrix-vector multiply per vertex:
//!
//! - `position = M[bone] · local` (affine)
//! - `normal = normalize(upper3x3(M[bone]) · local_normal)`
//!
//! UVs pass through unchanged. Only the submodel selected for each bodypart
//! by the instance's `body` value is skinned, and mesh textures are remapped
//! through the instance's skin family.
//!
//! # Example
//!
//! ```rust,ignore
//! use studio_anim::skinning::{MeshSkinner, SkinningOptions};
//!
//! let skinner = MeshSkinner::new(SkinningOptions::default());
//! let meshes = skinner.skin_model(&model, &world_matrices, state.body, state.skin);
//!
//! for mesh in &meshes {
//!     println!("{:?}: {} vertices", mesh.source, mesh.vertices.len());
//! }
//! ```

use glam::{Mat4, Vec2, Vec3};

use crate::model::{Model, RenderFlags, Vertex};

/// Options for controlling the skinning behavior
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SkinningOptions {
    /// Renormalize normals after transformation
    ///
    /// Bone matrices only scale through the instance transform; turning this
    /// off keeps that scale in the normals.
    pub normalize_normals: bool,
}

impl Default for SkinningOptions {
    fn default() -> Self {
        Self {
            normalize_normals: true,
        }
    }
}

/// A vertex in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinnedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Location of a mesh inside the model's bodypart tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshRef {
    pub bodypart: usize,
    pub submodel: usize,
    pub mesh: usize,
}

/// World-space geometry of one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedMesh {
    pub source: MeshRef,
    /// Texture after the skin family remap
    pub texture: usize,
    pub flags: RenderFlags,
    /// One entry per source vertex, in source order
    pub vertices: Vec<SkinnedVertex>,
}

/// Rigid skinner for studio models
#[derive(Debug, Clone, Default)]
pub struct MeshSkinner {
    options: SkinningOptions,
}

impl MeshSkinner {
    pub fn new(options: SkinningOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SkinningOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SkinningOptions) {
        self.options = options;
    }

    /// Transform a single vertex by its bone's world matrix
    ///
    /// Panics if the vertex references a bone outside `world`.
    pub fn skin_vertex(&self, world: &[Mat4], vertex: &Vertex) -> SkinnedVertex {
        let matrix = &world[vertex.bone];
        let normal = matrix.transform_vector3(vertex.normal);

        SkinnedVertex {
            position: matrix.transform_point3(vertex.position),
            normal: if self.options.normalize_normals {
                normal.normalize_or_zero()
            } else {
                normal
            },
            uv: vertex.uv,
        }
    }

    /// Transform a vertex slice
    pub fn skin_vertices(&self, world: &[Mat4], vertices: &[Vertex]) -> Vec<SkinnedVertex> {
        vertices
            .iter()
            .map(|vertex| self.skin_vertex(world, vertex))
            .collect()
    }

    /// Skin every mesh of the selected submodels
    pub fn skin_model(
        &self,
        model: &Model,
        world: &[Mat4],
        body: u32,
        skin: usize,
    ) -> Vec<SkinnedMesh> {
        let mut out = Vec::new();
        self.skin_model_into(model, world, body, skin, &mut out);
        out
    }

    /// Like [`Self::skin_model`], reusing the vertex buffers already in `out`
    pub fn skin_model_into(
        &self,
        model: &Model,
        world: &[Mat4],
        body: u32,
        skin: usize,
        out: &mut Vec<SkinnedMesh>,
    ) {
        let mut count = 0;

        for (bodypart, part) in model.bodyparts.iter().enumerate() {
            let Some(submodel) = part.submodel_index(body) else {
                continue;
            };

            for (mesh_index, mesh) in part.submodels[submodel].meshes.iter().enumerate() {
                let source = MeshRef {
                    bodypart,
                    submodel,
                    mesh: mesh_index,
                };
                let texture = model.texture_for(mesh.texture, skin);

                if count == out.len() {
                    out.push(SkinnedMesh {
                        source,
                        texture,
                        flags: mesh.flags,
                        vertices: Vec::with_capacity(mesh.vertices.len()),
                    });
                }

                let target = &mut out[count];
                target.source = source;
                target.texture = texture;
                target.flags = mesh.flags;
                target.vertices.clear();
                target
                    .vertices
                    .extend(mesh.vertices.iter().map(|vertex| self.skin_vertex(world, vertex)));

                count += 1;
            }
        }

        out.truncate(count);
        log::trace!("Skinned {} meshes of '{}'", count, model.name);
    }
}

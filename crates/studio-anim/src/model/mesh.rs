use glam::{Vec2, Vec3};

bitflags::bitflags! {
    /// Per-mesh blend mode
    ///
    /// Bits other than the named ones are retained and passed through to
    /// draw batches untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde-support",
        derive(serde::Serialize, serde::Deserialize)
    )]
    pub struct RenderFlags: u32 {
        /// Composited additively; drawn after everything else
        const ADDITIVE = 0x20;
        /// Alpha-tested; drawn before plain opaque meshes
        const MASKED = 0x40;
    }
}

/// A vertex rigidly bound to one bone
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Vertex {
    /// Position in the owning bone's space
    pub position: Vec3,
    /// Normal in the owning bone's space
    pub normal: Vec3,
    pub uv: Vec2,
    pub bone: usize,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2, bone: usize) -> Self {
        Self {
            position,
            normal,
            uv,
            bone,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Mesh {
    pub name: String,
    pub texture: usize,
    pub flags: RenderFlags,
    pub vertices: Vec<Vertex>,
    /// Triangle list into `vertices`
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, texture: usize, flags: RenderFlags) -> Self {
        Self {
            name: name.into(),
            texture,
            flags,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn with_geometry(mut self, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        self.vertices = vertices;
        self.indices = indices;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Submodel {
    pub name: String,
    pub meshes: Vec<Mesh>,
}

/// A slot of interchangeable submodels (e.g. head variants)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Bodypart {
    pub name: String,
    /// Stride of this bodypart inside the packed `body` selector
    pub base: u32,
    pub submodels: Vec<Submodel>,
}

impl Bodypart {
    /// Index of the submodel chosen by a packed `body` selector
    pub fn submodel_index(&self, body: u32) -> Option<usize> {
        if self.submodels.is_empty() {
            return None;
        }
        Some((body / self.base.max(1)) as usize % self.submodels.len())
    }

    /// Submodel chosen by a packed `body` selector
    pub fn submodel_for(&self, body: u32) -> Option<&Submodel> {
        self.submodel_index(body)
            .and_then(|index| self.submodels.get(index))
    }
}

//! Bone hierarchy composition
//!
//! Local poses are composed into world matrices in one forward pass over
//! the bone array. Bones are stored in topological order, so a parent's
//! world matrix is always final before any of its children read it.

use glam::{Mat4, Vec3};

use crate::animation::{LocalPose, euler_to_quat};
use crate::model::Bone;

/// Placement of one rendered instance in the world
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct InstanceTransform {
    pub origin: Vec3,
    /// Euler angles in degrees, applied Z·Y·X
    pub angles: Vec3,
    /// Per-axis scale; the only scale in the whole pipeline
    pub scale: Vec3,
}

impl InstanceTransform {
    pub const IDENTITY: Self = Self {
        origin: Vec3::ZERO,
        angles: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn new(origin: Vec3, angles: Vec3, scale: Vec3) -> Self {
        Self {
            origin,
            angles,
            scale,
        }
    }

    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            origin,
            ..Self::IDENTITY
        }
    }

    pub fn with_angles(mut self, angles: Vec3) -> Self {
        self.angles = angles;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Translation · rotation · scale
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            euler_to_quat(self.angles.map(f32::to_radians)),
            self.origin,
        )
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composes local bone poses into world matrices
///
/// Keeps the parent table and the output matrices between evaluations so a
/// per-tick compose does not allocate.
#[derive(Debug, Clone, Default)]
pub struct HierarchyComposer {
    /// Parent of each bone, `None` for roots
    parents: Vec<Option<usize>>,
    /// World matrix of each bone after the last compose
    world: Vec<Mat4>,
}

impl HierarchyComposer {
    /// Create a composer for a validated bone array
    pub fn new(bones: &[Bone]) -> Self {
        Self {
            parents: bones.iter().map(Bone::parent_index).collect(),
            world: vec![Mat4::IDENTITY; bones.len()],
        }
    }

    pub fn bone_count(&self) -> usize {
        self.parents.len()
    }

    /// Reload the parent table from `bones`, keeping both allocations
    pub fn rebuild(&mut self, bones: &[Bone]) {
        self.parents.clear();
        self.parents.extend(bones.iter().map(Bone::parent_index));
        self.world.resize(bones.len(), Mat4::IDENTITY);
    }

    /// Compose world matrices for one pose
    ///
    /// Roots are `instance · local`; every other bone is
    /// `world(parent) · local`. Panics if `locals` does not hold exactly
    /// one pose per bone.
    pub fn compose(&mut self, locals: &[LocalPose], instance: &InstanceTransform) -> &[Mat4] {
        assert_eq!(
            locals.len(),
            self.parents.len(),
            "pose covers {} bones, skeleton has {}",
            locals.len(),
            self.parents.len()
        );

        let instance = instance.to_mat4();
        for (index, local) in locals.iter().enumerate() {
            let local = Mat4::from_rotation_translation(local.rotation, local.position);
            let parent = match self.parents[index] {
                Some(parent) => self.world[parent],
                None => instance,
            };
            self.world[index] = parent * local;
        }

        &self.world
    }

    /// World matrices of the last compose
    pub fn world(&self) -> &[Mat4] {
        &self.world
    }

    /// World matrix of a bone; identity for unknown bones
    pub fn get_transform(&self, bone: usize) -> Mat4 {
        self.world.get(bone).copied().unwrap_or(Mat4::IDENTITY)
    }

    /// All bone matrices as a flat array for GPU upload
    ///
    /// Each bone contributes one row-major 3x4 matrix (12 floats); the
    /// constant bottom row is dropped.
    pub fn gpu_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.world.len() * 12);
        for matrix in &self.world {
            data.extend_from_slice(&as_3x4(matrix));
        }
        data
    }
}

/// Row-major upper three rows of an affine matrix
pub fn as_3x4(matrix: &Mat4) -> [f32; 12] {
    let rows = matrix.transpose().to_cols_array();
    let mut out = [0.0; 12];
    out.copy_from_slice(&rows[..12]);
    out
}

/// Compose a pose into freshly allocated world matrices
pub fn compose(bones: &[Bone], locals: &[LocalPose], instance: &InstanceTransform) -> Vec<Mat4> {
    let mut composer = HierarchyComposer::new(bones);
    composer.compose(locals, instance);
    composer.world
}

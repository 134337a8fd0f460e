//! Static model data
//!
//! Everything in this module is produced once by a loader and read by the
//! animation pipeline. Bones are a flat array in topological order: every
//! bone's parent is stored before it, so a single forward pass composes the
//! hierarchy. [`Model::validate`] checks that and every other cross
//! reference the pipeline relies on.
//!
//! Structural edits take `&mut Model`. Any pipeline evaluation borrows the
//! model immutably, so edits can never overlap one.

mod bone;
mod edit;
mod hitbox;
mod mesh;
mod sequence;
mod validate;

pub use bone::{Bone, BoneController, CONTROLLER_SLOTS, Channel, MOUTH_SLOT, NO_PARENT};
pub use hitbox::{Attachment, Hitbox};
pub use mesh::{Bodypart, Mesh, RenderFlags, Submodel, Vertex};
pub use sequence::{
    AnimEvent, Animation, BlendAxis, BoneTrack, MotionFlags, Sequence, SequenceFlags,
    SequenceGroup,
};

/// An immutable skinned model
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Model {
    pub name: String,
    pub bones: Vec<Bone>,
    pub bone_controllers: Vec<BoneController>,
    pub sequences: Vec<Sequence>,
    pub sequence_groups: Vec<SequenceGroup>,
    pub hitboxes: Vec<Hitbox>,
    pub attachments: Vec<Attachment>,
    pub bodyparts: Vec<Bodypart>,
    /// `skin_families[skin][texture]` remaps a mesh texture for a skin
    pub skin_families: Vec<Vec<usize>>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Index of the first bone with the given name
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|bone| bone.name == name)
    }

    /// Index of the first sequence with the given label
    pub fn find_sequence(&self, label: &str) -> Option<usize> {
        self.sequences.iter().position(|seq| seq.label == label)
    }

    /// Track data of a sequence
    ///
    /// Panics if the sequence or its group reference is out of range; a
    /// validated model never triggers this.
    pub fn animation(&self, sequence: usize) -> &Animation {
        let seq = &self.sequences[sequence];
        &self.sequence_groups[seq.group].animations[seq.animation]
    }

    /// Controller driving a bone channel, if any
    pub fn controller_for(&self, bone: usize, channel: Channel) -> Option<usize> {
        self.bone_controllers
            .iter()
            .position(|ctl| ctl.bone == bone && ctl.channel == channel)
    }

    /// Texture used by a mesh texture slot under a skin family
    ///
    /// Out-of-range skins or slots fall back to the mesh's own texture.
    pub fn texture_for(&self, texture: usize, skin: usize) -> usize {
        self.skin_families
            .get(skin)
            .and_then(|family| family.get(texture))
            .copied()
            .unwrap_or(texture)
    }

    /// Submodels drawn for a packed `body` selector, one per bodypart
    pub fn active_submodels(&self, body: u32) -> impl Iterator<Item = &Submodel> {
        self.bodyparts
            .iter()
            .filter_map(move |part| part.submodel_for(body))
    }

    /// Iterate every mesh of every submodel, selected or not
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> {
        self.bodyparts
            .iter()
            .flat_map(|part| part.submodels.iter())
            .flat_map(|sub| sub.meshes.iter())
    }
}

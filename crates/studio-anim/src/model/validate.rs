use std::collections::HashMap;

use super::{Channel, MOUTH_SLOT, Model};
use crate::error::{ModelError, Result};

impl Model {
    /// Check every invariant the animation pipeline relies on
    ///
    /// A model that passes can be evaluated without any index going out of
    /// range. Loaders should call this once before handing the model out.
    pub fn validate(&self) -> Result<()> {
        self.validate_bones()?;
        self.validate_controllers()?;
        self.validate_sequences()?;
        self.validate_attachments()?;
        self.validate_meshes()?;

        log::debug!(
            "Validated model '{}': {} bones, {} controllers, {} sequences, {} hitboxes",
            self.name,
            self.bones.len(),
            self.bone_controllers.len(),
            self.sequences.len(),
            self.hitboxes.len()
        );
        Ok(())
    }

    fn check_bone(&self, entity: &'static str, index: usize, bone: usize) -> Result<()> {
        if bone < self.bones.len() {
            Ok(())
        } else {
            Err(ModelError::DanglingBone {
                entity,
                index,
                bone,
                bone_count: self.bones.len(),
            })
        }
    }

    fn validate_bones(&self) -> Result<()> {
        for (index, bone) in self.bones.iter().enumerate() {
            let topological = match bone.parent_index() {
                Some(parent) => parent < index,
                None => bone.parent == super::NO_PARENT,
            };
            if !topological {
                return Err(ModelError::NonTopologicalParent {
                    bone: index,
                    parent: bone.parent,
                });
            }
        }
        Ok(())
    }

    fn validate_controllers(&self) -> Result<()> {
        let mut driven: HashMap<(usize, Channel), usize> = HashMap::new();

        for (index, controller) in self.bone_controllers.iter().enumerate() {
            self.check_bone("Bone controller", index, controller.bone)?;

            if controller.slot > MOUTH_SLOT {
                return Err(ModelError::InvalidControllerSlot {
                    controller: index,
                    slot: controller.slot,
                    max: MOUTH_SLOT,
                });
            }

            if let Some(first) = driven.insert((controller.bone, controller.channel), index) {
                return Err(ModelError::DuplicateController {
                    bone: controller.bone,
                    channel: controller.channel,
                    first,
                    second: index,
                });
            }
        }
        Ok(())
    }

    fn validate_sequences(&self) -> Result<()> {
        let bone_count = self.bones.len();

        for (index, seq) in self.sequences.iter().enumerate() {
            if seq.blend_axes.len() > 2 {
                return Err(ModelError::TooManyBlendAxes {
                    sequence: index,
                    axes: seq.blend_axes.len(),
                });
            }

            if !seq.motion.is_empty() {
                self.check_bone("Sequence motion", index, seq.motion_bone)?;
            }

            let group = self.sequence_groups.get(seq.group).ok_or(
                ModelError::MissingSequenceGroup {
                    sequence: index,
                    group: seq.group,
                },
            )?;
            let animation =
                group
                    .animations
                    .get(seq.animation)
                    .ok_or(ModelError::MissingAnimation {
                        sequence: index,
                        group: seq.group,
                        animation: seq.animation,
                    })?;

            if animation.blends.len() != seq.blend_count() {
                return Err(ModelError::BlendCountMismatch {
                    sequence: index,
                    axes: seq.blend_axes.len(),
                    expected: seq.blend_count(),
                    actual: animation.blends.len(),
                });
            }

            for (blend, tracks) in animation.blends.iter().enumerate() {
                if tracks.len() != bone_count {
                    return Err(ModelError::TrackCountMismatch {
                        sequence: index,
                        blend,
                        expected: bone_count,
                        actual: tracks.len(),
                    });
                }
            }

            if seq.frame_count == 0 {
                log::warn!(
                    "Sequence {} '{}' has no frames and will hold the rest pose",
                    index,
                    seq.label
                );
            }
        }
        Ok(())
    }

    fn validate_attachments(&self) -> Result<()> {
        for (index, hitbox) in self.hitboxes.iter().enumerate() {
            self.check_bone("Hitbox", index, hitbox.bone)?;
        }
        for (index, attachment) in self.attachments.iter().enumerate() {
            self.check_bone("Attachment", index, attachment.bone)?;
        }
        Ok(())
    }

    fn validate_meshes(&self) -> Result<()> {
        for mesh in self.meshes() {
            for (index, vertex) in mesh.vertices.iter().enumerate() {
                self.check_bone("Vertex", index, vertex.bone)?;
            }
            if let Some(&index) = mesh
                .indices
                .iter()
                .find(|&&index| index as usize >= mesh.vertices.len())
            {
                return Err(ModelError::InvalidVertexIndex {
                    mesh: mesh.name.clone(),
                    index,
                    vertex_count: mesh.vertices.len(),
                });
            }
        }
        Ok(())
    }
}

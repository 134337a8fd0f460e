use super::Model;
use crate::error::{ModelError, Result};

fn check_factor(factor: f32) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidEdit(format!(
            "scale factor must be positive and finite, got {factor}"
        )))
    }
}

impl Model {
    /// Rename a bone; names must stay non-empty and unique
    pub fn rename_bone(&mut self, bone: usize, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if bone >= self.bones.len() {
            return Err(ModelError::NoSuchEntity {
                entity: "bone",
                index: bone,
            });
        }
        if name.is_empty() {
            return Err(ModelError::InvalidEdit("bone name cannot be empty".into()));
        }
        if let Some(existing) = self.find_bone(&name).filter(|&existing| existing != bone) {
            return Err(ModelError::InvalidEdit(format!(
                "bone {existing} is already named '{name}'"
            )));
        }

        log::debug!("Renaming bone {} '{}' to '{}'", bone, self.bones[bone].name, name);
        self.bones[bone].name = name;
        Ok(())
    }

    /// Scale the skeleton and everything placed in bone space except vertices
    ///
    /// Bone rest positions, position sample scales, hitboxes, attachment
    /// origins, sequence bounds and position controller ranges all scale.
    pub fn scale_bones(&mut self, factor: f32) -> Result<()> {
        check_factor(factor)?;
        log::debug!("Scaling bones of '{}' by {}", self.name, factor);

        for bone in &mut self.bones {
            for i in 0..3 {
                bone.value[i] *= factor;
                bone.scale[i] *= factor;
            }
        }
        for controller in &mut self.bone_controllers {
            if !controller.channel.is_rotation() {
                controller.start *= factor;
                controller.end *= factor;
                controller.rest *= factor;
            }
        }
        for hitbox in &mut self.hitboxes {
            hitbox.min *= factor;
            hitbox.max *= factor;
        }
        for attachment in &mut self.attachments {
            attachment.origin *= factor;
        }
        for seq in &mut self.sequences {
            seq.bbox_min *= factor;
            seq.bbox_max *= factor;
        }
        Ok(())
    }

    /// Scale every vertex position in its bone's space
    pub fn scale_meshes(&mut self, factor: f32) -> Result<()> {
        check_factor(factor)?;
        log::debug!("Scaling meshes of '{}' by {}", self.name, factor);

        for part in &mut self.bodyparts {
            for sub in &mut part.submodels {
                for mesh in &mut sub.meshes {
                    for vertex in &mut mesh.vertices {
                        vertex.position *= factor;
                    }
                }
            }
        }
        Ok(())
    }

    /// Uniformly rescale the whole model
    pub fn scale(&mut self, factor: f32) -> Result<()> {
        self.scale_bones(factor)?;
        self.scale_meshes(factor)
    }

    /// Move a hitbox onto another bone
    pub fn retarget_hitbox(&mut self, hitbox: usize, bone: usize) -> Result<()> {
        self.check_edit_bone(bone)?;
        let target = self.hitboxes.get_mut(hitbox).ok_or(ModelError::NoSuchEntity {
            entity: "hitbox",
            index: hitbox,
        })?;
        target.bone = bone;
        Ok(())
    }

    /// Move an attachment onto another bone
    pub fn retarget_attachment(&mut self, attachment: usize, bone: usize) -> Result<()> {
        self.check_edit_bone(bone)?;
        let target = self
            .attachments
            .get_mut(attachment)
            .ok_or(ModelError::NoSuchEntity {
                entity: "attachment",
                index: attachment,
            })?;
        target.bone = bone;
        Ok(())
    }

    fn check_edit_bone(&self, bone: usize) -> Result<()> {
        if bone < self.bones.len() {
            Ok(())
        } else {
            Err(ModelError::NoSuchEntity {
                entity: "bone",
                index: bone,
            })
        }
    }
}

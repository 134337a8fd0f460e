//! Per-tick evaluation of one model instance
//!
//! A [`Pipeline`] borrows a validated model and runs every stage in order:
//! controller mapping, sequence blending, motion extraction, hierarchy
//! composition, skinning, draw sorting, and the auxiliary transforms. All
//! per-instance buffers live in a caller-owned [`PoseScratch`], so
//! steady-state evaluation does not allocate and any number of instances
//! can share one model.
//!
//! # Example
//!
//! ```rust,ignore
//! use studio_anim::{AnimationState, InstanceTransform, Pipeline, PoseScratch};
//!
//! let pipeline = Pipeline::new(&model)?;
//! let mut state = AnimationState::new(&model);
//! let mut scratch = PoseScratch::default();
//!
//! state.advance(&model, 1.0 / 60.0);
//! let frame = pipeline.evaluate(&state, &InstanceTransform::IDENTITY, &mut scratch);
//! renderer.upload(&frame.bone_matrices, &frame.meshes, &frame.batches);
//! ```

use glam::Mat4;

use crate::animation::{
    AnimationState, ControllerDeltas, LocalPose, SequenceBlender, rest_pose, strip_motion,
};
use crate::auxiliary::{
    Bounds, BoundsSource, WorldAttachment, WorldHitbox, pose_bounds, transform_attachments,
    transform_hitboxes,
};
use crate::error::Result;
use crate::model::Model;
use crate::skeleton::{HierarchyComposer, InstanceTransform};
use crate::skinning::{MeshSkinner, SkinnedMesh, SkinningOptions};
use crate::sorting::{DrawBatch, build_batches};

/// Pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PipelineOptions {
    /// Zero the motion bone's position on the sequence's motion axes
    pub strip_motion: bool,
    /// Geometry used for pose-dependent bounds
    pub bounds_source: BoundsSource,
    /// Renormalize skinned normals
    pub normalize_normals: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            strip_motion: true,
            bounds_source: BoundsSource::Auto,
            normalize_normals: true,
        }
    }
}

impl PipelineOptions {
    pub fn with_strip_motion(mut self, strip_motion: bool) -> Self {
        self.strip_motion = strip_motion;
        self
    }

    pub fn with_bounds_source(mut self, bounds_source: BoundsSource) -> Self {
        self.bounds_source = bounds_source;
        self
    }

    pub fn with_normalize_normals(mut self, normalize_normals: bool) -> Self {
        self.normalize_normals = normalize_normals;
        self
    }

    pub fn skinning(&self) -> SkinningOptions {
        SkinningOptions {
            normalize_normals: self.normalize_normals,
        }
    }
}

/// Everything produced by one evaluation
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Parent-relative pose of each bone
    pub local_poses: Vec<LocalPose>,
    /// World matrix of each bone
    pub bone_matrices: Vec<Mat4>,
    /// World-space geometry of the selected submodels
    pub meshes: Vec<SkinnedMesh>,
    /// Draws in blend-mode order
    pub batches: Vec<DrawBatch>,
    pub hitboxes: Vec<WorldHitbox>,
    pub attachments: Vec<WorldAttachment>,
    pub bounds: Bounds,
}

/// Reusable per-instance buffers
#[derive(Debug, Clone, Default)]
pub struct PoseScratch {
    deltas: ControllerDeltas,
    blender: SequenceBlender,
    composer: HierarchyComposer,
    output: FrameOutput,
}

impl PoseScratch {
    /// Result of the last evaluation into this scratch
    pub fn output(&self) -> &FrameOutput {
        &self.output
    }

    pub fn into_output(self) -> FrameOutput {
        self.output
    }
}

/// Animation pipeline over a validated model
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    model: &'a Model,
    options: PipelineOptions,
    skinner: MeshSkinner,
}

impl<'a> Pipeline<'a> {
    /// Validate a model and build a pipeline with default options
    pub fn new(model: &'a Model) -> Result<Self> {
        Self::with_options(model, PipelineOptions::default())
    }

    /// Validate a model and build a pipeline
    pub fn with_options(model: &'a Model, options: PipelineOptions) -> Result<Self> {
        model.validate()?;

        if model.bones.is_empty() {
            log::warn!("Model '{}' has no bones", model.name);
        }
        log::debug!(
            "Pipeline for '{}': {} bones, {} sequences, {:?}",
            model.name,
            model.bones.len(),
            model.sequences.len(),
            options
        );

        Ok(Self {
            model,
            options,
            skinner: MeshSkinner::new(options.skinning()),
        })
    }

    pub fn model(&self) -> &'a Model {
        self.model
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Evaluate one instance
    ///
    /// Panics if `state.sequence` is out of range on a model that has
    /// sequences. A model without sequences holds its rest pose.
    pub fn evaluate<'s>(
        &self,
        state: &AnimationState,
        instance: &InstanceTransform,
        scratch: &'s mut PoseScratch,
    ) -> &'s FrameOutput {
        let model = self.model;
        let PoseScratch {
            deltas,
            blender,
            composer,
            output,
        } = scratch;

        deltas.resolve_into(model, &state.controllers, state.mouth);

        if model.sequences.is_empty() {
            rest_pose(model, deltas, &mut output.local_poses);
        } else {
            blender.blend(
                model,
                state.sequence,
                state.frame,
                state.blending,
                deltas,
                &mut output.local_poses,
            );
            if self.options.strip_motion {
                strip_motion(&model.sequences[state.sequence], &mut output.local_poses);
            }
        }

        composer.rebuild(&model.bones);
        let world = composer.compose(&output.local_poses, instance);
        output.bone_matrices.clear();
        output.bone_matrices.extend_from_slice(world);

        self.skinner.skin_model_into(
            model,
            &output.bone_matrices,
            state.body,
            state.skin,
            &mut output.meshes,
        );
        build_batches(&output.meshes, &mut output.batches);

        transform_hitboxes(model, &output.bone_matrices, &mut output.hitboxes);
        transform_attachments(model, &output.bone_matrices, &mut output.attachments);
        output.bounds = pose_bounds(
            self.options.bounds_source,
            &output.hitboxes,
            &output.meshes,
            &output.bone_matrices,
            instance.origin,
        );

        log::trace!(
            "Evaluated '{}' sequence {} frame {}: {} meshes, bounds {:?}",
            model.name,
            state.sequence,
            state.frame,
            output.meshes.len(),
            output.bounds
        );

        output
    }

    /// Evaluate into fresh buffers
    pub fn evaluate_owned(
        &self,
        state: &AnimationState,
        instance: &InstanceTransform,
    ) -> FrameOutput {
        let mut scratch = PoseScratch::default();
        self.evaluate(state, instance, &mut scratch);
        scratch.into_output()
    }
}

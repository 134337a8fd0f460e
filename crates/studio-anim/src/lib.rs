//! Skeletal animation pipeline for rigid-skinned studio models
//!
//! The crate takes an immutable [`Model`] built by an external loader and,
//! once per displayed frame, turns an [`AnimationState`] into bone matrices,
//! world-space geometry, sorted draw batches, hitboxes, attachments and
//! bounds. Everything is synchronous and allocation-free in steady state.
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
//! loop {
//!     state.advance(&model, dt);
//!     let frame = pipeline.evaluate(&state, &InstanceTransform::IDENTITY, &mut scratch);
//!     draw(&frame.meshes, &frame.batches);
//! }
//! ```

pub mod animation;
pub mod auxiliary;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod skeleton;
pub mod skinning;
pub mod sorting;

// Re-export common types
pub use animation::{AnimationState, ChannelTrack, ControllerDeltas, LocalPose};
pub use auxiliary::{Bounds, BoundsSource, WorldAttachment, WorldHitbox};
pub use error::{ModelError, Result};
pub use model::{Bone, BoneController, Channel, Model, RenderFlags, Sequence};
pub use pipeline::{FrameOutput, Pipeline, PipelineOptions, PoseScratch};
pub use skeleton::{HierarchyComposer, InstanceTransform};
pub use skinning::{MeshSkinner, SkinnedMesh, SkinningOptions};
pub use sorting::DrawBatch;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

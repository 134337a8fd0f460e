//! Studio model animation
//!
//! This module turns compressed per-bone tracks into local bone poses:
//! - Run-length channel tracks and their decoding at fractional frames
//! - Bone controllers mapping external inputs onto channels
//! - Blending of up to two blend axes, cross-fades and motion extraction
//! - Per-instance playback state
//!
//! # Example
//!
//! ```rust,ignore
//! use studio_anim::animation::{AnimationState, ControllerDeltas, blend_sequence};
//!
//! let mut state = AnimationState::new(&model);
//! state.advance(&model, 1.0 / 30.0);
//!
//! let deltas = ControllerDeltas::resolve(&model, &state.controllers, state.mouth);
//! let poses = blend_sequence(&model, state.sequence, state.frame, state.blending, &deltas);
//! ```

mod blend;
mod controller;
mod decoder;
mod state;
mod track;

pub use blend::{
    LocalPose, SequenceBlender, blend_sequence, crossfade, euler_to_quat, rest_pose, strip_motion,
};
pub use controller::ControllerDeltas;
pub use decoder::{ChannelDecoder, FrameCursor, decode_channel};
pub use state::AnimationState;
pub use track::{AnimRun, ChannelTrack, MAX_RUN_FRAMES};

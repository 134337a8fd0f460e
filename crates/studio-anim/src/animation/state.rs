//! Per-instance animation state

use crate::model::{CONTROLLER_SLOTS, Model};

/// Playback inputs of one rendered instance
///
/// The pipeline only reads this; a host timeline mutates it once per tick,
/// either directly or through [`AnimationState::advance`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnimationState {
    /// Index of the current sequence
    pub sequence: usize,
    /// Current fractional frame
    pub frame: f32,
    /// Playback speed multiplier
    pub speed: f32,
    /// Raw inputs of the sequence's blend axes
    pub blending: [f32; 2],
    /// Raw inputs of the controller slots
    pub controllers: [f32; CONTROLLER_SLOTS],
    /// Mouth opening in `[0, 1]`
    pub mouth: f32,
    /// Packed submodel selector
    pub body: u32,
    /// Skin family
    pub skin: usize,
}

impl AnimationState {
    /// Fresh state on the model's first sequence with controllers at rest
    pub fn new(model: &Model) -> Self {
        let mut state = Self {
            sequence: 0,
            frame: 0.0,
            speed: 1.0,
            blending: [0.0; 2],
            controllers: [0.0; CONTROLLER_SLOTS],
            mouth: 0.0,
            body: 0,
            skin: 0,
        };
        for controller in &model.bone_controllers {
            if controller.is_mouth() {
                state.mouth = controller.rest_mouth();
            } else if let Some(slot) = state.controllers.get_mut(controller.slot) {
                *slot = controller.rest;
            }
        }
        state.reset_blending(model);
        state
    }

    /// Switch sequence, rewinding to frame 0 with blend axes at their start
    ///
    /// Returns `false` and leaves the state untouched if the index is out of
    /// range.
    pub fn set_sequence(&mut self, model: &Model, sequence: usize) -> bool {
        if sequence >= model.sequences.len() {
            log::warn!(
                "Ignoring sequence {} (model '{}' has {})",
                sequence,
                model.name,
                model.sequences.len()
            );
            return false;
        }
        self.sequence = sequence;
        self.frame = 0.0;
        self.reset_blending(model);
        true
    }

    /// Set one controller slot; out-of-range slots are ignored
    pub fn set_controller(&mut self, slot: usize, value: f32) {
        match self.controllers.get_mut(slot) {
            Some(input) => *input = value,
            None => log::warn!("Ignoring controller slot {}", slot),
        }
    }

    /// Set one blend axis input; out-of-range axes are ignored
    pub fn set_blending(&mut self, axis: usize, value: f32) {
        match self.blending.get_mut(axis) {
            Some(input) => *input = value,
            None => log::warn!("Ignoring blend axis {}", axis),
        }
    }

    fn reset_blending(&mut self, model: &Model) {
        self.blending = [0.0; 2];
        if let Some(seq) = model.sequences.get(self.sequence) {
            for (input, axis) in self.blending.iter_mut().zip(&seq.blend_axes) {
                *input = axis.start;
            }
        }
    }

    /// Advance playback by `dt` seconds at the sequence's frame rate
    ///
    /// Looping sequences wrap with period `frame_count`; others stop on the
    /// last frame. Returns the frame before the step, which together with
    /// the new frame brackets the events crossed this tick.
    pub fn advance(&mut self, model: &Model, dt: f32) -> f32 {
        let previous = self.frame;
        let Some(seq) = model.sequences.get(self.sequence) else {
            return previous;
        };

        if seq.frame_count <= 1 {
            self.frame = 0.0;
            return previous;
        }

        let frame = self.frame + dt * seq.fps * self.speed;
        self.frame = if !frame.is_finite() {
            0.0
        } else if seq.is_looping() {
            frame.rem_euclid(seq.frame_count as f32)
        } else {
            frame.clamp(0.0, seq.last_frame())
        };
        previous
    }

    /// Check if a non-looping sequence has reached its last frame
    pub fn is_finished(&self, model: &Model) -> bool {
        model
            .sequences
            .get(self.sequence)
            .is_some_and(|seq| !seq.is_looping() && self.frame >= seq.last_frame())
    }
}

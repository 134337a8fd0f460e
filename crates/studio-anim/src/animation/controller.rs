//! Mapping of external controller inputs onto bone channels

use crate::model::{BoneController, CONTROLLER_SLOTS, Channel, Model};

/// Degrees in a full turn, the wrap period of looping rotation controllers
const FULL_TURN: f32 = 360.0;

impl BoneController {
    /// Map a raw input to the delta added to the driven channel
    ///
    /// Inputs clamp to the controller range, except rotations whose range
    /// runs backwards (`start > end`): those wrap modulo 360° into
    /// `[end, end + 360)` so a part can spin continuously. Rotation deltas
    /// are returned in radians.
    pub fn apply(&self, value: f32) -> f32 {
        let value = if value.is_finite() { value } else { self.rest };

        let value = if self.wraps() {
            self.end + (value - self.end).rem_euclid(FULL_TURN)
        } else {
            value.clamp(self.start.min(self.end), self.start.max(self.end))
        };

        self.to_channel_units(value)
    }

    /// Map a mouth opening in `[0, 1]` linearly onto the controller range
    pub fn apply_mouth(&self, mouth: f32) -> f32 {
        let t = if mouth.is_finite() {
            mouth.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.to_channel_units(self.start + (self.end - self.start) * t)
    }

    /// Mouth opening that reproduces the rest value
    ///
    /// The rest value is expressed in range units; a degenerate range
    /// opens to 0.
    pub fn rest_mouth(&self) -> f32 {
        let span = self.end - self.start;
        if span == 0.0 || !self.rest.is_finite() {
            return 0.0;
        }
        ((self.rest - self.start) / span).clamp(0.0, 1.0)
    }

    fn to_channel_units(&self, value: f32) -> f32 {
        if self.channel.is_rotation() {
            value.to_radians()
        } else {
            value
        }
    }
}

/// Per-bone, per-channel controller adjustments for one evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerDeltas {
    deltas: Vec<[f32; 6]>,
}

impl ControllerDeltas {
    /// No adjustment on any channel
    pub fn none(bone_count: usize) -> Self {
        Self {
            deltas: vec![[0.0; 6]; bone_count],
        }
    }

    /// Evaluate every controller of a model against the current inputs
    pub fn resolve(model: &Model, controllers: &[f32; CONTROLLER_SLOTS], mouth: f32) -> Self {
        let mut deltas = Self::default();
        deltas.resolve_into(model, controllers, mouth);
        deltas
    }

    /// Like [`Self::resolve`], reusing this table's storage
    pub fn resolve_into(
        &mut self,
        model: &Model,
        controllers: &[f32; CONTROLLER_SLOTS],
        mouth: f32,
    ) {
        self.deltas.clear();
        self.deltas.resize(model.bones.len(), [0.0; 6]);

        for controller in &model.bone_controllers {
            let delta = if controller.is_mouth() {
                controller.apply_mouth(mouth)
            } else {
                controller.apply(controllers[controller.slot])
            };
            self.deltas[controller.bone][controller.channel.index()] += delta;
        }
    }

    pub fn bone_count(&self) -> usize {
        self.deltas.len()
    }

    /// Delta for a bone channel; bones outside the table have none
    pub fn get(&self, bone: usize, channel: Channel) -> f32 {
        self.deltas
            .get(bone)
            .map_or(0.0, |channels| channels[channel.index()])
    }

    /// Override the delta of a bone channel, growing the table if needed
    pub fn set(&mut self, bone: usize, channel: Channel, delta: f32) {
        if bone >= self.deltas.len() {
            self.deltas.resize(bone + 1, [0.0; 6]);
        }
        self.deltas[bone][channel.index()] = delta;
    }
}

//! Channel value decoding at fractional frames

use super::track::ChannelTrack;
use crate::model::{Animation, Bone, Channel, Model, Sequence};

/// Integer sample pair and weight resolved from a fractional frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCursor {
    /// Frame at or before the requested frame
    pub lo: usize,
    /// Frame after `lo`; wraps to 0 for loops, holds at the end otherwise
    pub hi: usize,
    /// Weight of `hi`, in `[0, 1)`
    pub fraction: f32,
}

impl FrameCursor {
    /// Resolve a frame against a sequence's frame count and loop mode
    ///
    /// Returns `None` for a sequence without frames. Non-finite frames are
    /// treated as frame 0.
    pub fn new(sequence: &Sequence, frame: f32) -> Option<Self> {
        Self::resolve(sequence.frame_count, sequence.is_looping(), frame)
    }

    /// Resolve a frame against an explicit frame count
    pub fn resolve(frame_count: usize, looping: bool, frame: f32) -> Option<Self> {
        if frame_count == 0 {
            return None;
        }

        let count = frame_count as f32;
        let frame = if frame.is_finite() { frame } else { 0.0 };

        let frame = if looping {
            let wrapped = frame.rem_euclid(count);
            // rem_euclid can round up to `count` for tiny negative inputs
            if wrapped >= count { 0.0 } else { wrapped }
        } else {
            frame.clamp(0.0, count - 1.0)
        };

        let lo = (frame.floor() as usize).min(frame_count - 1);
        let hi = if looping {
            (lo + 1) % frame_count
        } else {
            (lo + 1).min(frame_count - 1)
        };

        Some(Self {
            lo,
            hi,
            fraction: frame - lo as f32,
        })
    }
}

/// Decode one channel of one bone from a track
///
/// `base + lerp(sample(lo), sample(hi), fraction) * scale`; no track or no
/// frames yields the base value.
///
/// Rotation channels are Euler angles and lerp independently, so between
/// two keyframes that turn about several axes at once the pose follows the
/// angle path rather than the shortest arc. Keyframes are expected to be
/// dense enough for the difference not to show.
pub fn decode_channel(
    bone: &Bone,
    channel: Channel,
    track: Option<&ChannelTrack>,
    cursor: Option<FrameCursor>,
) -> f32 {
    let base = bone.value[channel.index()];
    let (Some(track), Some(cursor)) = (track, cursor) else {
        return base;
    };

    let a = track.sample(cursor.lo) as f32;
    let b = track.sample(cursor.hi) as f32;
    let sample = a + (b - a) * cursor.fraction;

    base + sample * bone.scale[channel.index()]
}

/// Reads channel values of one sequence
///
/// Decoding is a pure function of its inputs: repeated queries return
/// identical values.
#[derive(Debug, Clone, Copy)]
pub struct ChannelDecoder<'a> {
    model: &'a Model,
    sequence: &'a Sequence,
    animation: &'a Animation,
}

impl<'a> ChannelDecoder<'a> {
    /// Create a decoder for a sequence of a validated model
    ///
    /// Panics if `sequence` is out of range.
    pub fn new(model: &'a Model, sequence: usize) -> Self {
        assert!(
            sequence < model.sequences.len(),
            "sequence {} out of range ({} sequences)",
            sequence,
            model.sequences.len()
        );
        Self {
            model,
            sequence: &model.sequences[sequence],
            animation: model.animation(sequence),
        }
    }

    pub fn sequence(&self) -> &'a Sequence {
        self.sequence
    }

    /// Resolve a frame for this decoder's sequence
    pub fn cursor(&self, frame: f32) -> Option<FrameCursor> {
        FrameCursor::new(self.sequence, frame)
    }

    /// Channel value of the base pose at a fractional frame
    pub fn value(&self, bone: usize, channel: Channel, frame: f32) -> f32 {
        self.value_at(0, bone, channel, self.cursor(frame))
    }

    /// Channel value of a blend corner at a pre-resolved frame
    ///
    /// Panics if `blend` or `bone` is out of range.
    pub fn value_at(
        &self,
        blend: usize,
        bone: usize,
        channel: Channel,
        cursor: Option<FrameCursor>,
    ) -> f32 {
        assert!(
            bone < self.model.bones.len(),
            "bone {} out of range ({} bones)",
            bone,
            self.model.bones.len()
        );
        assert!(
            blend < self.animation.blends.len(),
            "blend {} out of range ({} blends)",
            blend,
            self.animation.blends.len()
        );

        let track = self.animation.blends[blend][bone].channel(channel);
        decode_channel(&self.model.bones[bone], channel, track, cursor)
    }
}

use glam::Vec3;

use super::bone::Channel;
use crate::animation::ChannelTrack;

bitflags::bitflags! {
    /// Sequence playback flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(
        feature = "serde-support",
        derive(serde::Serialize, serde::Deserialize)
    )]
    pub struct SequenceFlags: u32 {
        /// Playback wraps around instead of holding the last frame
        const LOOPING = 0x1;
    }
}

bitflags::bitflags! {
    /// Axes of linear motion baked into the motion bone
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(
        feature = "serde-support",
        derive(serde::Serialize, serde::Deserialize)
    )]
    pub struct MotionFlags: u32 {
        const X = 0x1;
        const Y = 0x2;
        const Z = 0x4;
    }
}

/// Input range of one blend axis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BlendAxis {
    /// Channel the authoring tool associated with this axis (informational)
    pub kind: Channel,
    pub start: f32,
    pub end: f32,
}

impl BlendAxis {
    pub fn new(kind: Channel, start: f32, end: f32) -> Self {
        Self { kind, start, end }
    }

    /// Map an input into `[0, 1]` through this axis' range
    ///
    /// Inputs outside the range clamp; a degenerate range maps to 0.
    pub fn fraction(&self, value: f32) -> f32 {
        let span = self.end - self.start;
        if span.abs() <= f32::EPSILON || !value.is_finite() {
            return 0.0;
        }
        ((value - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Event fired when playback crosses a frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnimEvent {
    pub frame: usize,
    pub code: i32,
    pub options: String,
}

/// Channel tracks of one bone; `None` channels hold the rest value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneTrack {
    pub channels: [Option<ChannelTrack>; 6],
}

impl BoneTrack {
    /// A bone track with no animated channels
    pub fn rest() -> Self {
        Self::default()
    }

    /// Attach dense samples to one channel
    pub fn with_samples(mut self, channel: Channel, samples: &[i16]) -> Self {
        self.channels[channel.index()] = Some(ChannelTrack::from_samples(samples));
        self
    }

    pub fn channel(&self, channel: Channel) -> Option<&ChannelTrack> {
        self.channels[channel.index()].as_ref()
    }
}

/// Track data of one sequence: `blends[corner][bone]`
///
/// A sequence with `n` blend axes carries `1 << n` corners. Corner bit `i`
/// selects the alternate pose of axis `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Animation {
    pub blends: Vec<Vec<BoneTrack>>,
}

impl Animation {
    pub fn new(blends: Vec<Vec<BoneTrack>>) -> Self {
        Self { blends }
    }

    /// Animation with a single corner
    pub fn single(bones: Vec<BoneTrack>) -> Self {
        Self {
            blends: vec![bones],
        }
    }
}

/// Bucket of animations that may be stored apart from the sequence list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SequenceGroup {
    pub label: String,
    /// Name of the external store holding the track data, if any
    pub name: String,
    pub animations: Vec<Animation>,
}

/// A named animation clip
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Sequence {
    pub label: String,
    pub fps: f32,
    pub flags: SequenceFlags,
    pub activity: i32,
    pub activity_weight: i32,
    pub frame_count: usize,
    pub events: Vec<AnimEvent>,
    pub motion: MotionFlags,
    pub motion_bone: usize,
    pub bbox_min: Vec3,
    pub bbox_max: Vec3,
    pub blend_axes: Vec<BlendAxis>,
    /// Sequence group holding the track data
    pub group: usize,
    /// Index of the animation inside the group
    pub animation: usize,
}

impl Sequence {
    pub fn new(label: impl Into<String>, frame_count: usize, fps: f32) -> Self {
        Self {
            label: label.into(),
            fps,
            flags: SequenceFlags::empty(),
            activity: 0,
            activity_weight: 0,
            frame_count,
            events: Vec::new(),
            motion: MotionFlags::empty(),
            motion_bone: 0,
            bbox_min: Vec3::ZERO,
            bbox_max: Vec3::ZERO,
            blend_axes: Vec::new(),
            group: 0,
            animation: 0,
        }
    }

    pub fn looping(mut self) -> Self {
        self.flags |= SequenceFlags::LOOPING;
        self
    }

    pub fn with_animation(mut self, group: usize, animation: usize) -> Self {
        self.group = group;
        self.animation = animation;
        self
    }

    pub fn with_blend_axis(mut self, axis: BlendAxis) -> Self {
        self.blend_axes.push(axis);
        self
    }

    pub fn with_event(mut self, frame: usize, code: i32, options: impl Into<String>) -> Self {
        self.events.push(AnimEvent {
            frame,
            code,
            options: options.into(),
        });
        self
    }

    pub fn is_looping(&self) -> bool {
        self.flags.contains(SequenceFlags::LOOPING)
    }

    /// Number of blend corners the track data must provide
    pub fn blend_count(&self) -> usize {
        1 << self.blend_axes.len().min(2)
    }

    /// Last frame a non-looping playback can reach
    pub fn last_frame(&self) -> f32 {
        self.frame_count.saturating_sub(1) as f32
    }

    /// Playback length in seconds at the authored frame rate
    pub fn duration(&self) -> f32 {
        if self.fps <= 0.0 {
            return 0.0;
        }
        self.last_frame() / self.fps
    }

    /// Events crossed when playback moves from `previous` to `current`
    ///
    /// The interval is `(previous, current]`. For looping sequences a
    /// `current` below `previous` means playback wrapped, so events after
    /// `previous` and events up to `current` both fire.
    pub fn events_between(&self, previous: f32, current: f32) -> Vec<&AnimEvent> {
        let wrapped = self.is_looping() && current < previous;

        self.events
            .iter()
            .filter(|event| {
                let frame = event.frame as f32;
                if wrapped {
                    frame > previous || frame <= current
                } else {
                    frame > previous && frame <= current
                }
            })
            .collect()
    }
}

//! Sequence blending into per-bone local poses
//!
//! Every blend corner of a sequence is decoded at the same frame, controller
//! deltas are added to the raw channel values of each corner, and the
//! corners are then folded axis by axis: positions lerp, rotations slerp.
//! Adding controller deltas before the quaternion is built keeps the order
//! fixed for every corner, so blending never reorders the adjustment.

use glam::{Quat, Vec3};

use super::controller::ControllerDeltas;
use super::decoder::{ChannelDecoder, FrameCursor, decode_channel};
use crate::model::{Channel, Model, MotionFlags, Sequence};

/// Build a rotation from Euler angles in radians, applied Z·Y·X
pub fn euler_to_quat(angles: Vec3) -> Quat {
    Quat::from_rotation_z(angles.z)
        * Quat::from_rotation_y(angles.y)
        * Quat::from_rotation_x(angles.x)
}

/// Parent-relative transform of one bone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LocalPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose from six channel values (`[pos xyz, rot xyz]`, radians)
    pub fn from_channels(channels: [f32; 6]) -> Self {
        Self {
            position: Vec3::new(channels[0], channels[1], channels[2]),
            rotation: euler_to_quat(Vec3::new(channels[3], channels[4], channels[5])),
        }
    }

    /// Interpolate toward `other`; `t <= 0` and `t >= 1` return an operand exactly
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        if t.is_nan() || t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t).normalize(),
        }
    }
}

impl Default for LocalPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rest pose of every bone with controller deltas applied
pub fn rest_pose(model: &Model, deltas: &ControllerDeltas, out: &mut Vec<LocalPose>) {
    out.clear();
    out.extend(model.bones.iter().enumerate().map(|(index, bone)| {
        LocalPose::from_channels(adjusted_channels(index, deltas, |channel| {
            decode_channel(bone, channel, None, None)
        }))
    }));
}

fn adjusted_channels(
    index: usize,
    deltas: &ControllerDeltas,
    mut decode: impl FnMut(Channel) -> f32,
) -> [f32; 6] {
    Channel::ALL.map(|channel| decode(channel) + deltas.get(index, channel))
}

/// Combines a sequence's blend corners into one local pose per bone
///
/// Holds the per-corner scratch buffers so repeated evaluations do not
/// allocate.
#[derive(Debug, Clone, Default)]
pub struct SequenceBlender {
    corners: Vec<Vec<LocalPose>>,
}

impl SequenceBlender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend a sequence at a fractional frame
    ///
    /// `blend_values[i]` is the raw input of blend axis `i`; it is mapped
    /// through the axis range and clamped. Panics if `sequence` is out of
    /// range.
    pub fn blend(
        &mut self,
        model: &Model,
        sequence: usize,
        frame: f32,
        blend_values: [f32; 2],
        deltas: &ControllerDeltas,
        out: &mut Vec<LocalPose>,
    ) {
        let decoder = ChannelDecoder::new(model, sequence);
        let seq = decoder.sequence();
        let cursor = decoder.cursor(frame);
        let corner_count = seq.blend_count();

        if self.corners.len() < corner_count {
            self.corners.resize_with(corner_count, Vec::new);
        }

        for (corner, poses) in self.corners.iter_mut().take(corner_count).enumerate() {
            Self::decode_corner(model, &decoder, corner, cursor, deltas, poses);
        }

        // Fold axis 0 over corner pairs (0,1) and (2,3), then axis 1 over (0,2)
        for (axis_index, axis) in seq.blend_axes.iter().take(2).enumerate() {
            let t = axis.fraction(blend_values[axis_index]);
            let stride = 1 << axis_index;
            let step = stride * 2;

            for low in (0..corner_count).step_by(step) {
                let (head, tail) = self.corners.split_at_mut(low + stride);
                for (a, b) in head[low].iter_mut().zip(tail[0].iter()) {
                    *a = a.interpolate(b, t);
                }
            }
        }

        out.clear();
        out.extend_from_slice(&self.corners[0]);

        log::trace!(
            "Blended sequence {} '{}' at frame {} ({} corners)",
            sequence,
            seq.label,
            frame,
            corner_count
        );
    }

    fn decode_corner(
        model: &Model,
        decoder: &ChannelDecoder<'_>,
        corner: usize,
        cursor: Option<FrameCursor>,
        deltas: &ControllerDeltas,
        poses: &mut Vec<LocalPose>,
    ) {
        poses.clear();
        poses.extend((0..model.bones.len()).map(|index| {
            LocalPose::from_channels(adjusted_channels(index, deltas, |channel| {
                decoder.value_at(corner, index, channel, cursor)
            }))
        }));
    }
}

/// Blend a sequence into a freshly allocated pose
pub fn blend_sequence(
    model: &Model,
    sequence: usize,
    frame: f32,
    blend_values: [f32; 2],
    deltas: &ControllerDeltas,
) -> Vec<LocalPose> {
    let mut out = Vec::with_capacity(model.bones.len());
    SequenceBlender::new().blend(model, sequence, frame, blend_values, deltas, &mut out);
    out
}

/// Cross-fade two poses of the same skeleton; `weight` 0 keeps `from`
pub fn crossfade(from: &[LocalPose], to: &[LocalPose], weight: f32, out: &mut Vec<LocalPose>) {
    assert_eq!(
        from.len(),
        to.len(),
        "cross-faded poses must cover the same bones"
    );
    out.clear();
    out.extend(from.iter().zip(to).map(|(a, b)| a.interpolate(b, weight)));
}

/// Zero the motion bone's position on the sequence's linear motion axes
pub fn strip_motion(sequence: &Sequence, poses: &mut [LocalPose]) {
    if sequence.motion.is_empty() {
        return;
    }
    let Some(pose) = poses.get_mut(sequence.motion_bone) else {
        return;
    };
    if sequence.motion.contains(MotionFlags::X) {
        pose.position.x = 0.0;
    }
    if sequence.motion.contains(MotionFlags::Y) {
        pose.position.y = 0.0;
    }
    if sequence.motion.contains(MotionFlags::Z) {
        pose.position.z = 0.0;
    }
}

//! Common test utilities and fixtures

#![allow(dead_code)]

use glam::{Quat, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;
use studio_anim::LocalPose;
use studio_anim::animation::ChannelTrack;
use studio_anim::model::{
    Animation, Bodypart, Bone, BoneTrack, Channel, Hitbox, Mesh, Model, NO_PARENT, RenderFlags,
    Sequence, SequenceGroup, Submodel, Vertex,
};

pub const TOLERANCE: f32 = 1e-4;

/// Sample value that decodes to a quarter turn with [`ROT_SCALE`]
pub const QUARTER_TURN: i16 = 1000;

/// Rotation channel scale turning [`QUARTER_TURN`] into 90 degrees
pub const ROT_SCALE: f32 = FRAC_PI_2 / QUARTER_TURN as f32;

pub fn assert_pose_eq(actual: &LocalPose, expected: &LocalPose) {
    assert!(
        actual.position.abs_diff_eq(expected.position, TOLERANCE),
        "position {:?} != {:?}",
        actual.position,
        expected.position
    );
    assert!(
        actual.rotation.dot(expected.rotation).abs() > 1.0 - TOLERANCE,
        "rotation {:?} != {:?}",
        actual.rotation,
        expected.rotation
    );
}

pub fn assert_vec_eq(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, TOLERANCE),
        "{actual:?} != {expected:?}"
    );
}

pub fn assert_quat_eq(actual: Quat, expected: Quat) {
    assert!(
        actual.dot(expected).abs() > 1.0 - TOLERANCE,
        "{actual:?} != {expected:?}"
    );
}

/// Single sequence group holding the given animations
pub fn group(animations: Vec<Animation>) -> Vec<SequenceGroup> {
    vec![SequenceGroup {
        label: "default".into(),
        name: String::new(),
        animations,
    }]
}

/// Root plus a child offset `(0, 0, 10)`; one non-looping two-frame
/// sequence turning the child 0 -> 90 degrees about X
pub fn two_bone_arm() -> Model {
    let mut model = Model::new("arm");
    model.bones = vec![
        Bone::new("root", NO_PARENT),
        Bone::new("child", 0)
            .with_rest(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
            .with_scale(Vec3::ONE, Vec3::splat(ROT_SCALE)),
    ];
    model.sequence_groups = group(vec![Animation::single(vec![
        BoneTrack::rest(),
        BoneTrack::rest().with_samples(Channel::RotX, &[0, QUARTER_TURN]),
    ])]);
    model.sequences = vec![Sequence::new("raise", 2, 10.0)];
    model
}

/// One bone with a unit hitbox and one triangle, rotated by the Z channel
pub fn boxed_bone(z_samples: &[i16]) -> Model {
    let mut model = Model::new("box");
    model.bones = vec![
        Bone::new("root", NO_PARENT).with_scale(Vec3::ONE, Vec3::splat(ROT_SCALE)),
    ];
    model.sequence_groups = group(vec![Animation::single(vec![
        BoneTrack::rest().with_samples(Channel::RotZ, z_samples),
    ])]);
    model.sequences = vec![Sequence::new("turn", z_samples.len(), 10.0)];
    model.hitboxes = vec![Hitbox::new(0, 0, Vec3::splat(-1.0), Vec3::splat(1.0))];
    model.bodyparts = vec![Bodypart {
        name: "body".into(),
        base: 1,
        submodels: vec![Submodel {
            name: "main".into(),
            meshes: vec![Mesh::new("tri", 0, RenderFlags::empty()).with_geometry(
                vec![
                    Vertex::new(Vec3::new(2.0, 0.0, 0.0), Vec3::Z, Vec2::ZERO, 0),
                    Vertex::new(Vec3::new(0.0, 3.0, 0.0), Vec3::Z, Vec2::X, 0),
                    Vertex::new(Vec3::new(0.0, 0.0, 4.0), Vec3::X, Vec2::Y, 0),
                ],
                vec![0, 1, 2],
            )],
        }],
    }];
    model
}

/// A looping single-bone clip over arbitrary samples on every channel
pub fn looping_clip(samples: &[i16]) -> Model {
    let mut model = Model::new("loop");
    model.bones = vec![
        Bone::new("root", NO_PARENT)
            .with_rest(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO)
            .with_scale(Vec3::splat(0.1), Vec3::splat(ROT_SCALE)),
    ];
    let track = Channel::ALL
        .iter()
        .fold(BoneTrack::rest(), |track, &channel| {
            track.with_samples(channel, samples)
        });
    model.sequence_groups = group(vec![Animation::single(vec![track])]);
    model.sequences = vec![Sequence::new("cycle", samples.len(), 24.0).looping()];
    model
}

/// A track decoding back to the given dense samples
pub fn track(samples: &[i16]) -> ChannelTrack {
    ChannelTrack::from_samples(samples)
}

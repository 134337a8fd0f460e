//! Level 2: Property Tests
//!
//! Laws every pipeline stage must hold for arbitrary inputs.

use glam::{Mat4, Vec2, Vec3};
use proptest::prelude::*;
use studio_anim::animation::{
    ChannelDecoder, ControllerDeltas, LocalPose, blend_sequence, euler_to_quat,
};
use studio_anim::model::{
    Animation, BlendAxis, Bone, BoneTrack, Channel, Model, NO_PARENT, RenderFlags, Sequence,
    Vertex,
};
use studio_anim::skeleton::{InstanceTransform, compose};
use studio_anim::skinning::MeshSkinner;
use studio_anim::sorting::{sort_key, sorted_order};

use crate::common::{ROT_SCALE, group, looping_clip, track};

fn local_pose() -> impl Strategy<Value = LocalPose> {
    (
        prop::array::uniform3(-50.0f32..50.0),
        prop::array::uniform3(-3.0f32..3.0),
    )
        .prop_map(|(position, angles)| {
            LocalPose::new(Vec3::from(position), euler_to_quat(Vec3::from(angles)))
        })
}

/// Parent table in topological order: every parent precedes its child
fn parents(max_bones: usize) -> impl Strategy<Value = Vec<i32>> {
    (1..=max_bones).prop_flat_map(|count| {
        (0..count)
            .map(|index| (-1..index as i32).boxed())
            .collect::<Vec<_>>()
    })
}

fn render_flags() -> impl Strategy<Value = RenderFlags> {
    (0u32..0x80).prop_map(RenderFlags::from_bits_retain)
}

/// Single bone with one blend axis; corner 0 and corner 1 carry independent samples
fn blended_bone(base: &[i16], alternate: &[i16]) -> Model {
    let mut model = Model::new("blend");
    model.bones = vec![
        Bone::new("root", NO_PARENT).with_scale(Vec3::splat(0.1), Vec3::splat(ROT_SCALE)),
    ];
    let corner = |samples: &[i16]| {
        vec![
            BoneTrack::rest()
                .with_samples(Channel::PosY, samples)
                .with_samples(Channel::RotX, samples)
                .with_samples(Channel::RotZ, samples),
        ]
    };
    let blends = vec![corner(base), corner(alternate)];
    model.sequence_groups = group(vec![Animation::new(blends)]);
    model.sequences = vec![
        Sequence::new("aim", base.len().min(alternate.len()), 15.0)
            .with_blend_axis(BlendAxis::new(Channel::RotY, -30.0, 60.0)),
    ];
    model
}

proptest! {
    #[test]
    fn hierarchy_law(
        (parent_table, locals) in parents(12).prop_flat_map(|table| {
            let count = table.len();
            (Just(table), prop::collection::vec(local_pose(), count))
        }),
        origin in prop::array::uniform3(-100.0f32..100.0),
    ) {
        let bones: Vec<Bone> = parent_table
            .iter()
            .enumerate()
            .map(|(index, &parent)| Bone::new(format!("bone{index}"), parent))
            .collect();
        let instance = InstanceTransform::from_origin(Vec3::from(origin))
            .with_angles(Vec3::new(10.0, 20.0, 30.0));

        let world = compose(&bones, &locals, &instance);
        prop_assert_eq!(world.len(), bones.len());

        for (index, bone) in bones.iter().enumerate() {
            let pose = &locals[index];
            let local = Mat4::from_rotation_translation(pose.rotation, pose.position);
            let parent = match bone.parent_index() {
                Some(parent) => world[parent],
                None => instance.to_mat4(),
            };
            prop_assert!(world[index].abs_diff_eq(parent * local, 1e-2));
        }
    }

    #[test]
    fn decoding_is_idempotent(
        samples in prop::collection::vec(any::<i16>(), 1..40),
        frame in -10.0f32..60.0,
    ) {
        let model = looping_clip(&samples);
        let decoder = ChannelDecoder::new(&model, 0);

        for channel in Channel::ALL {
            let first = decoder.value(0, channel, frame);
            let second = decoder.value(0, channel, frame);
            prop_assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[test]
    fn looping_is_periodic(
        samples in prop::collection::vec(-1000i16..1000, 2..12),
        frame in 0.0f32..24.0,
    ) {
        let model = looping_clip(&samples);
        let decoder = ChannelDecoder::new(&model, 0);
        let period = samples.len() as f32;

        for channel in Channel::ALL {
            let here = decoder.value(0, channel, frame);
            let later = decoder.value(0, channel, frame + period);
            prop_assert!((here - later).abs() < 1e-2, "{:?}: {} vs {}", channel, here, later);
        }
    }

    #[test]
    fn track_round_trips_dense_samples(
        samples in prop::collection::vec(any::<i16>(), 0..600),
    ) {
        let track = track(&samples);
        prop_assert_eq!(track.frame_count(), samples.len());
        for (frame, &sample) in samples.iter().enumerate() {
            prop_assert_eq!(track.sample(frame), sample);
        }
    }

    #[test]
    fn blend_endpoints_reproduce_corners(
        base in prop::collection::vec(-1000i16..1000, 2..8),
        alternate in prop::collection::vec(-1000i16..1000, 2..8),
        frame in 0.0f32..8.0,
    ) {
        let model = blended_bone(&base, &alternate);
        let deltas = ControllerDeltas::none(1);
        let decoder = ChannelDecoder::new(&model, 0);
        let cursor = decoder.cursor(frame);
        let corner = |blend: usize| {
            LocalPose::from_channels(
                Channel::ALL.map(|channel| decoder.value_at(blend, 0, channel, cursor)),
            )
        };

        let start = blend_sequence(&model, 0, frame, [-30.0, 0.0], &deltas);
        let end = blend_sequence(&model, 0, frame, [60.0, 0.0], &deltas);
        prop_assert_eq!(start[0], corner(0));
        prop_assert_eq!(end[0], corner(1));

        let mid = blend_sequence(&model, 0, frame, [15.0, 0.0], &deltas);
        let expected = corner(0).interpolate(&corner(1), 0.5);
        prop_assert!(mid[0].position.abs_diff_eq(expected.position, 1e-4));
        prop_assert!(mid[0].rotation.dot(expected.rotation).abs() > 1.0 - 1e-4);
    }

    #[test]
    fn sorting_is_ordered_stable_and_idempotent(
        flags in prop::collection::vec(render_flags(), 0..24),
    ) {
        let order = sorted_order(&flags);

        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(sort_key(flags[a]) <= sort_key(flags[b]));
            if sort_key(flags[a]) == sort_key(flags[b]) {
                prop_assert!(a < b);
            }
        }

        let sorted: Vec<RenderFlags> = order.iter().map(|&i| flags[i]).collect();
        prop_assert_eq!(sorted_order(&sorted), (0..sorted.len()).collect::<Vec<_>>());
    }

    #[test]
    fn skinning_with_identity_is_a_no_op(
        points in prop::collection::vec(prop::array::uniform3(-100.0f32..100.0), 1..16),
        angles in prop::array::uniform3(-3.0f32..3.0),
    ) {
        let normal = euler_to_quat(Vec3::from(angles)) * Vec3::Z;
        let vertices: Vec<Vertex> = points
            .iter()
            .map(|&p| Vertex::new(Vec3::from(p), normal, Vec2::new(0.5, 0.5), 0))
            .collect();
        let world = [InstanceTransform::IDENTITY.to_mat4()];

        let skinned = MeshSkinner::default().skin_vertices(&world, &vertices);
        for (vertex, out) in vertices.iter().zip(&skinned) {
            prop_assert_eq!(out.position, vertex.position);
            prop_assert!(out.normal.abs_diff_eq(vertex.normal, 1e-5));
            prop_assert_eq!(out.uv, vertex.uv);
        }
    }

    #[test]
    fn interpolated_rotations_stay_unit(
        pose in local_pose(),
        other in local_pose(),
        t in 0.0f32..1.0,
    ) {
        let blended = pose.interpolate(&other, t);
        prop_assert!(blended.rotation.is_finite());
        prop_assert!((blended.rotation.length() - 1.0).abs() < 1e-4);
    }
}

//! Level 3: End-to-End Scenario Tests
//!
//! Small rigs evaluated through the public pipeline, checked against
//! results computed directly with glam.

use glam::{Mat4, Quat, Vec3};
use pretty_assertions::assert_eq;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use studio_anim::animation::{AnimationState, ControllerDeltas, LocalPose, blend_sequence};
use studio_anim::model::{BoneController, Channel, MotionFlags, RenderFlags};
use studio_anim::sorting::sorted_order;
use studio_anim::{
    Bounds, BoundsSource, InstanceTransform, Pipeline, PipelineOptions, PoseScratch,
};

use crate::common::{
    QUARTER_TURN, assert_pose_eq, assert_quat_eq, assert_vec_eq, boxed_bone, two_bone_arm,
};

mod arm_rotation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_half_frame_is_slerp_midpoint() {
        let model = two_bone_arm();
        let pipeline = Pipeline::new(&model).unwrap();
        let mut state = AnimationState::new(&model);
        state.frame = 0.5;

        let out = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);

        assert_pose_eq(
            &out.local_poses[1],
            &LocalPose::new(Vec3::new(0.0, 0.0, 10.0), Quat::from_rotation_x(FRAC_PI_4)),
        );

        let (_, rotation, translation) = out.bone_matrices[1].to_scale_rotation_translation();
        assert_quat_eq(rotation, Quat::from_rotation_x(FRAC_PI_4));
        assert_vec_eq(translation, Vec3::new(0.0, 0.0, 10.0));

        // A point one offset further along the child swings with the child
        let tip = out.bone_matrices[1].transform_point3(Vec3::new(0.0, 0.0, 10.0));
        let swung = Quat::from_rotation_x(FRAC_PI_4) * Vec3::new(0.0, 0.0, 10.0);
        assert_vec_eq(tip, Vec3::new(0.0, 0.0, 10.0) + swung);
    }

    #[test]
    fn test_past_last_frame_clamps() {
        let model = two_bone_arm();
        let pipeline = Pipeline::new(&model).unwrap();
        let mut state = AnimationState::new(&model);

        state.frame = 1.0;
        let at_end = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);
        state.frame = 1.5;
        let beyond = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);

        assert_eq!(beyond.local_poses, at_end.local_poses);
        assert_eq!(beyond.bone_matrices, at_end.bone_matrices);
        assert_quat_eq(
            at_end.local_poses[1].rotation,
            Quat::from_rotation_x(FRAC_PI_2),
        );
    }

    #[test]
    fn test_controller_adds_before_blending() {
        let mut model = two_bone_arm();
        model.bone_controllers = vec![BoneController::new(1, Channel::RotX, -90.0, 90.0, 0)];
        let pipeline = Pipeline::new(&model).unwrap();
        let mut state = AnimationState::new(&model);
        state.frame = 0.5;
        state.set_controller(0, 45.0);

        let out = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);
        assert_quat_eq(out.local_poses[1].rotation, Quat::from_rotation_x(FRAC_PI_2));
    }

    #[test]
    fn test_instance_transform_moves_roots_only() {
        let model = two_bone_arm();
        let pipeline = Pipeline::new(&model).unwrap();
        let state = AnimationState::new(&model);
        let instance = InstanceTransform::from_origin(Vec3::new(5.0, 0.0, 0.0))
            .with_angles(Vec3::new(0.0, 0.0, 90.0));

        let out = pipeline.evaluate_owned(&state, &instance);
        let instance_matrix = instance.to_mat4();

        assert_eq!(out.bone_matrices[0], instance_matrix * Mat4::IDENTITY);
        assert_vec_eq(
            out.bone_matrices[1].transform_point3(Vec3::ZERO),
            Vec3::new(5.0, 0.0, 10.0),
        );
    }
}

mod hitbox_bounds {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounds_follow_rotated_corners() {
        // Elongated along X so a quarter turn about Z shows in the bounds
        let mut model = boxed_bone(&[QUARTER_TURN]);
        model.hitboxes[0].max = Vec3::new(3.0, 1.0, 1.0);
        let pipeline = Pipeline::new(&model).unwrap();
        let state = AnimationState::new(&model);

        let out = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);

        let rotation = Mat4::from_quat(Quat::from_rotation_z(FRAC_PI_2));
        let corners = model.hitboxes[0].corners();
        let expected = Bounds::from_points(corners.map(|c| rotation.transform_point3(c)));

        assert_vec_eq(out.bounds.min, expected.min);
        assert_vec_eq(out.bounds.max, expected.max);
        // Not the unrotated box
        assert_vec_eq(out.bounds.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_vec_eq(out.bounds.max, Vec3::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn test_unit_box_bounds_after_quarter_turn() {
        let model = boxed_bone(&[QUARTER_TURN]);
        let pipeline = Pipeline::new(&model).unwrap();
        let state = AnimationState::new(&model);
        let out = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);

        assert_vec_eq(out.bounds.min, Vec3::splat(-1.0));
        assert_vec_eq(out.bounds.max, Vec3::splat(1.0));
        assert_eq!(out.hitboxes.len(), 1);
        assert_vec_eq(out.hitboxes[0].corners[1], Vec3::new(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_vertex_bounds_source() {
        let model = boxed_bone(&[QUARTER_TURN]);
        let options = PipelineOptions::default().with_bounds_source(BoundsSource::Vertices);
        let pipeline = Pipeline::with_options(&model, options).unwrap();
        let state = AnimationState::new(&model);
        let out = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);

        // (2,0,0) -> (0,2,0); (0,3,0) -> (-3,0,0); (0,0,4) stays
        assert_vec_eq(out.bounds.min, Vec3::new(-3.0, 0.0, 0.0));
        assert_vec_eq(out.bounds.max, Vec3::new(0.0, 2.0, 4.0));

        let normals: Vec<Vec3> = out.meshes[0].vertices.iter().map(|v| v.normal).collect();
        assert_vec_eq(normals[0], Vec3::Z);
        assert_vec_eq(normals[2], Vec3::Y);
    }
}

mod draw_order {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_masked_none_additive() {
        let flags = [
            RenderFlags::ADDITIVE,
            RenderFlags::empty(),
            RenderFlags::MASKED,
        ];
        let ordered: Vec<RenderFlags> =
            sorted_order(&flags).into_iter().map(|i| flags[i]).collect();

        assert_eq!(
            ordered,
            vec![
                RenderFlags::MASKED,
                RenderFlags::empty(),
                RenderFlags::ADDITIVE,
            ]
        );
    }

    #[test]
    fn test_pipeline_batches_follow_blend_modes() {
        let mut model = boxed_bone(&[0]);
        let template = model.bodyparts[0].submodels[0].meshes[0].clone();
        model.bodyparts[0].submodels[0].meshes = [
            RenderFlags::ADDITIVE,
            RenderFlags::empty(),
            RenderFlags::MASKED,
        ]
        .into_iter()
        .map(|flags| {
            let mut mesh = template.clone();
            mesh.flags = flags;
            mesh
        })
        .collect();

        let pipeline = Pipeline::new(&model).unwrap();
        let mut scratch = PoseScratch::default();
        let out = pipeline.evaluate(
            &AnimationState::new(&model),
            &InstanceTransform::IDENTITY,
            &mut scratch,
        );

        let order: Vec<usize> = out.batches.iter().map(|b| b.mesh).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }
}

mod playback {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_advance_and_events_drive_timeline() {
        let mut model = two_bone_arm();
        model.sequences[0] = model.sequences[0].clone().with_event(1, 5004, "step");
        let mut state = AnimationState::new(&model);

        let previous = state.advance(&model, 0.1);
        let seq = &model.sequences[state.sequence];
        let events = seq.events_between(previous, state.frame);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].options, "step");
        assert!(state.is_finished(&model));
    }

    #[test]
    fn test_motion_extraction_keeps_clip_in_place() {
        let mut model = boxed_bone(&[0, 0]);
        model.sequences[0].motion = MotionFlags::X | MotionFlags::Y;
        model.bones[0].value[0] = 4.0;
        model.bones[0].value[2] = 1.0;

        let strip = Pipeline::new(&model).unwrap();
        let options = PipelineOptions::default().with_strip_motion(false);
        let keep = Pipeline::with_options(&model, options).unwrap();
        let state = AnimationState::new(&model);

        let stripped = strip.evaluate_owned(&state, &InstanceTransform::IDENTITY);
        let kept = keep.evaluate_owned(&state, &InstanceTransform::IDENTITY);
        assert_eq!(stripped.local_poses[0].position, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(kept.local_poses[0].position, Vec3::new(4.0, 0.0, 1.0));
    }

    #[test]
    fn test_blend_matches_pipeline_pose() {
        let model = two_bone_arm();
        let pipeline = Pipeline::new(&model).unwrap();
        let mut state = AnimationState::new(&model);
        state.frame = 0.25;

        let deltas = ControllerDeltas::resolve(&model, &state.controllers, state.mouth);
        let direct = blend_sequence(&model, 0, 0.25, state.blending, &deltas);
        let out = pipeline.evaluate_owned(&state, &InstanceTransform::IDENTITY);
        assert_eq!(direct, out.local_poses);
    }
}

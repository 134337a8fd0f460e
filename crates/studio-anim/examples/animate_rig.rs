//! Example: Animating a small hand-built rig
//!
//! Builds a three-bone arm with a looping wave sequence, a wrist controller,
//! a hitbox and an attachment, then steps it for one second and prints what
//! the pipeline produces every few ticks.
//!
//! Usage: RUST_LOG=debug cargo run --example animate_rig

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use studio_anim::animation::ChannelTrack;
use studio_anim::model::{
    Animation, Attachment, Bodypart, Bone, BoneController, BoneTrack, Channel, Hitbox, Mesh,
    NO_PARENT, RenderFlags, Sequence, SequenceGroup, Submodel, Vertex,
};
use studio_anim::{AnimationState, InstanceTransform, Model, Pipeline, PoseScratch};

fn build_arm() -> Model {
    let mut model = Model::new("arm");
    model.bones = vec![
        Bone::new("shoulder", NO_PARENT),
        Bone::new("elbow", 0)
            .with_rest(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO)
            .with_scale(Vec3::ONE, Vec3::splat(0.001)),
        Bone::new("wrist", 1).with_rest(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO),
    ];
    model.bone_controllers = vec![BoneController::new(2, Channel::RotZ, -90.0, 90.0, 0)];

    // Packed words: header (valid | total << 8) followed by the samples
    let wave = ChannelTrack::from_packed(&[4 | (8 << 8), 0, 400, 800, 400]);
    let mut elbow = BoneTrack::rest();
    elbow.channels[Channel::RotX.index()] = Some(wave);

    model.sequence_groups = vec![SequenceGroup {
        label: "default".into(),
        name: String::new(),
        animations: vec![Animation::single(vec![
            BoneTrack::rest(),
            elbow,
            BoneTrack::rest(),
        ])],
    }];
    model.sequences = vec![
        Sequence::new("wave", 8, 8.0)
            .looping()
            .with_event(2, 1001, "whoosh"),
    ];
    model.hitboxes = vec![Hitbox::new(
        1,
        1,
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 10.0),
    )];
    model.attachments = vec![Attachment::new("hand", 2, Vec3::new(0.0, 0.0, 2.0))];
    model.bodyparts = vec![Bodypart {
        name: "arm".into(),
        base: 1,
        submodels: vec![Submodel {
            name: "sleeve".into(),
            meshes: vec![Mesh::new("sleeve", 0, RenderFlags::empty()).with_geometry(
                vec![
                    Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X, Vec2::ZERO, 1),
                    Vertex::new(Vec3::new(0.0, 1.0, 5.0), Vec3::Y, Vec2::X, 1),
                    Vertex::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z, Vec2::ONE, 2),
                ],
                vec![0, 1, 2],
            )],
        }],
    }];
    model
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let model = build_arm();
    let pipeline = Pipeline::new(&model).context("arm rig failed validation")?;
    let mut state = AnimationState::new(&model);
    let mut scratch = PoseScratch::default();
    let instance = InstanceTransform::from_origin(Vec3::new(0.0, 0.0, 40.0));

    let wave = model
        .find_sequence("wave")
        .context("arm rig has no wave sequence")?;
    state.set_sequence(&model, wave);

    let dt = 1.0 / 30.0;
    for tick in 0..30 {
        let previous = state.advance(&model, dt);
        state.set_controller(0, (tick as f32 * 6.0) - 90.0);

        for event in model.sequences[state.sequence].events_between(previous, state.frame) {
            println!("tick {tick:2}: event {} '{}'", event.code, event.options);
        }

        let frame = pipeline.evaluate(&state, &instance, &mut scratch);
        if tick % 5 == 0 {
            let hand = frame.attachments[0].origin;
            println!(
                "tick {tick:2}: frame {:5.2} hand ({:6.2}, {:6.2}, {:6.2}) bounds {:?}..{:?}",
                state.frame, hand.x, hand.y, hand.z, frame.bounds.min, frame.bounds.max
            );
        }
    }

    Ok(())
}

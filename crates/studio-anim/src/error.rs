use thiserror::Error;

use crate::model::Channel;

/// Error types for model validation and structural edits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A bone names a parent that is not stored before it
    #[error("Bone {bone} has parent {parent}, which does not precede it")]
    NonTopologicalParent { bone: usize, parent: i32 },

    /// Some entity references a bone that does not exist
    #[error("{entity} {index} references bone {bone}, but the model has {bone_count} bones")]
    DanglingBone {
        entity: &'static str,
        index: usize,
        bone: usize,
        bone_count: usize,
    },

    /// An animation does not carry one track set per bone
    #[error(
        "Sequence {sequence} blend {blend}: expected {expected} bone tracks, found {actual}"
    )]
    TrackCountMismatch {
        sequence: usize,
        blend: usize,
        expected: usize,
        actual: usize,
    },

    /// An animation does not carry one track set per blend corner
    #[error("Sequence {sequence}: {axes} blend axes need {expected} blends, found {actual}")]
    BlendCountMismatch {
        sequence: usize,
        axes: usize,
        expected: usize,
        actual: usize,
    },

    /// More blend axes than the pipeline supports
    #[error("Sequence {sequence} declares {axes} blend axes (at most 2 supported)")]
    TooManyBlendAxes { sequence: usize, axes: usize },

    /// A sequence points at a missing sequence group
    #[error("Sequence {sequence} references missing sequence group {group}")]
    MissingSequenceGroup { sequence: usize, group: usize },

    /// A sequence points at a missing animation inside its group
    #[error("Sequence {sequence} references missing animation {animation} in group {group}")]
    MissingAnimation {
        sequence: usize,
        group: usize,
        animation: usize,
    },

    /// Two controllers drive the same bone channel
    #[error("Bone {bone} channel {channel:?} is driven by controllers {first} and {second}")]
    DuplicateController {
        bone: usize,
        channel: Channel,
        first: usize,
        second: usize,
    },

    /// Controller input slot outside the supported range
    #[error("Controller {controller} uses input slot {slot} (valid slots are 0..={max})")]
    InvalidControllerSlot {
        controller: usize,
        slot: usize,
        max: usize,
    },

    /// A mesh triangle index points past the mesh's vertex list
    #[error("Mesh {mesh} index {index} is out of range for {vertex_count} vertices")]
    InvalidVertexIndex {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },

    /// An edit named an entity that does not exist
    #[error("No {entity} at index {index}")]
    NoSuchEntity { entity: &'static str, index: usize },

    /// An edit supplied a value that would break an invariant
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
}

/// Result type using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;

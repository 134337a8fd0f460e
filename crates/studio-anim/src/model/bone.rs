use glam::Vec3;

/// Parent value marking a root bone
pub const NO_PARENT: i32 = -1;

/// Number of ordinary controller input slots
pub const CONTROLLER_SLOTS: usize = 4;

/// Input slot reserved for the mouth controller
pub const MOUTH_SLOT: usize = CONTROLLER_SLOTS;

/// One of the six animated degrees of freedom of a bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Channel {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
}

impl Channel {
    /// All channels in storage order
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::PosY,
        Self::PosZ,
        Self::RotX,
        Self::RotY,
        Self::RotZ,
    ];

    /// Storage index (0..6)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Channel stored at `index`
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Check if the channel is an Euler angle (radians)
    pub const fn is_rotation(self) -> bool {
        matches!(self, Self::RotX | Self::RotY | Self::RotZ)
    }
}

/// A node of the skeleton
///
/// Channel values are stored as `[pos x, pos y, pos z, rot x, rot y, rot z]`;
/// rotations are Euler angles in radians.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, or [`NO_PARENT`]
    pub parent: i32,
    /// Raw flags word, carried for the host
    pub flags: u32,
    /// Rest-pose value of each channel
    pub value: [f32; 6],
    /// Scale applied to decoded track samples of each channel
    pub scale: [f32; 6],
}

impl Bone {
    /// Create a bone at the origin with unit channel scales
    pub fn new(name: impl Into<String>, parent: i32) -> Self {
        Self {
            name: name.into(),
            parent,
            flags: 0,
            value: [0.0; 6],
            scale: [1.0; 6],
        }
    }

    /// Set the rest position and rest Euler angles (radians)
    pub fn with_rest(mut self, position: Vec3, angles: Vec3) -> Self {
        self.value = [
            position.x, position.y, position.z, angles.x, angles.y, angles.z,
        ];
        self
    }

    /// Set the position and rotation sample scales
    pub fn with_scale(mut self, position: Vec3, rotation: Vec3) -> Self {
        self.scale = [
            position.x, position.y, position.z, rotation.x, rotation.y, rotation.z,
        ];
        self
    }

    /// Parent index, or `None` for a root
    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }

    pub fn is_root(&self) -> bool {
        self.parent < 0
    }

    pub fn rest_position(&self) -> Vec3 {
        Vec3::new(self.value[0], self.value[1], self.value[2])
    }

    pub fn rest_angles(&self) -> Vec3 {
        Vec3::new(self.value[3], self.value[4], self.value[5])
    }
}

/// Externally driven adjustment of one bone channel
///
/// Rotation ranges are in degrees; position ranges are in model units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneController {
    pub bone: usize,
    pub channel: Channel,
    pub start: f32,
    pub end: f32,
    /// Input value a fresh instance starts with
    pub rest: f32,
    /// Input slot: `0..CONTROLLER_SLOTS`, or [`MOUTH_SLOT`]
    pub slot: usize,
}

impl BoneController {
    pub fn new(bone: usize, channel: Channel, start: f32, end: f32, slot: usize) -> Self {
        Self {
            bone,
            channel,
            start,
            end,
            rest: 0.0,
            slot,
        }
    }

    pub fn with_rest(mut self, rest: f32) -> Self {
        self.rest = rest;
        self
    }

    /// Check if this controller reads the mouth input
    pub fn is_mouth(&self) -> bool {
        self.slot == MOUTH_SLOT
    }

    /// Check if inputs wrap around the circle instead of clamping
    pub fn wraps(&self) -> bool {
        self.channel.is_rotation() && self.start > self.end
    }
}

use glam::Vec3;

/// Box attached to a bone, used for hit and collision queries
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Hitbox {
    pub bone: usize,
    pub group: i32,
    pub min: Vec3,
    pub max: Vec3,
}

impl Hitbox {
    pub fn new(bone: usize, group: i32, min: Vec3, max: Vec3) -> Self {
        Self {
            bone,
            group,
            min,
            max,
        }
    }

    /// The 8 corners in bone space; bit 0/1/2 of the index picks max on x/y/z
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }
}

/// Named point and orientation attached to a bone
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Attachment {
    pub name: String,
    pub bone: usize,
    pub origin: Vec3,
    /// Local forward/right/up axes
    pub axes: [Vec3; 3],
}

impl Attachment {
    pub fn new(name: impl Into<String>, bone: usize, origin: Vec3) -> Self {
        Self {
            name: name.into(),
            bone,
            origin,
            axes: [Vec3::X, Vec3::Y, Vec3::Z],
        }
    }
}

//! Hitboxes, attachments and pose-dependent bounds in world space

use glam::{Mat4, Vec3};

use crate::model::Model;
use crate::skinning::SkinnedMesh;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Box containing nothing; expanding it by a point yields that point
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box holding a single point
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for point in points {
            bounds.expand(point);
        }
        bounds
    }

    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Geometry that pose-dependent bounds are computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum BoundsSource {
    /// Hitbox corners, or skinned vertices when the model has no hitboxes
    #[default]
    Auto,
    /// Hitbox corners only
    Hitboxes,
    /// Skinned vertex positions only
    Vertices,
}

/// A hitbox placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHitbox {
    pub bone: usize,
    pub group: i32,
    /// Corners in the order of [`crate::model::Hitbox::corners`]
    pub corners: [Vec3; 8],
}

impl WorldHitbox {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.corners)
    }
}

/// An attachment placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldAttachment {
    pub bone: usize,
    pub origin: Vec3,
    /// Attachment axes as world directions; not renormalized
    pub axes: [Vec3; 3],
}

/// Transform every hitbox by its bone's world matrix
pub fn transform_hitboxes(model: &Model, world: &[Mat4], out: &mut Vec<WorldHitbox>) {
    out.clear();
    out.extend(model.hitboxes.iter().map(|hitbox| {
        let matrix = &world[hitbox.bone];
        WorldHitbox {
            bone: hitbox.bone,
            group: hitbox.group,
            corners: hitbox.corners().map(|corner| matrix.transform_point3(corner)),
        }
    }));
}

/// Transform every attachment by its bone's world matrix
pub fn transform_attachments(model: &Model, world: &[Mat4], out: &mut Vec<WorldAttachment>) {
    out.clear();
    out.extend(model.attachments.iter().map(|attachment| {
        let matrix = &world[attachment.bone];
        WorldAttachment {
            bone: attachment.bone,
            origin: matrix.transform_point3(attachment.origin),
            axes: attachment.axes.map(|axis| matrix.transform_vector3(axis)),
        }
    }));
}

/// Bounds of the current pose
///
/// Recomputed from scratch on every call. When the selected source has no
/// geometry the bone origins are used, and with no bones either the result
/// is the degenerate box at the instance origin.
pub fn pose_bounds(
    source: BoundsSource,
    hitboxes: &[WorldHitbox],
    meshes: &[SkinnedMesh],
    world: &[Mat4],
    instance_origin: Vec3,
) -> Bounds {
    let from_hitboxes = || Bounds::from_points(hitboxes.iter().flat_map(|h| h.corners));
    let from_vertices = || {
        Bounds::from_points(
            meshes
                .iter()
                .flat_map(|mesh| mesh.vertices.iter().map(|v| v.position)),
        )
    };

    let bounds = match source {
        BoundsSource::Auto if !hitboxes.is_empty() => from_hitboxes(),
        BoundsSource::Auto | BoundsSource::Vertices => from_vertices(),
        BoundsSource::Hitboxes => from_hitboxes(),
    };
    if !bounds.is_empty() {
        return bounds;
    }

    let bones = Bounds::from_points(world.iter().map(|matrix| matrix.w_axis.truncate()));
    if !bones.is_empty() {
        log::trace!("No {:?} geometry for bounds, using bone origins", source);
        return bones;
    }

    Bounds::from_point(instance_origin)
}

//! Draw ordering by blend mode
//!
//! Masked meshes draw first, then plain opaque meshes, then everything
//! additive. A mesh that is both additive and masked counts as additive.
//! The sort is stable, so meshes with the same mode keep their order.

use crate::model::RenderFlags;
use crate::skinning::{MeshRef, SkinnedMesh};

/// One mesh draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawBatch {
    /// Index into the skinned mesh list this batch was built from
    pub mesh: usize,
    pub source: MeshRef,
    pub texture: usize,
    pub flags: RenderFlags,
}

impl DrawBatch {
    pub fn sort_key(&self) -> u8 {
        sort_key(self.flags)
    }
}

/// Rank of a blend mode in draw order
pub fn sort_key(flags: RenderFlags) -> u8 {
    if flags.contains(RenderFlags::ADDITIVE) {
        2
    } else if flags.contains(RenderFlags::MASKED) {
        0
    } else {
        1
    }
}

/// Stable in-place sort into draw order; sorting twice changes nothing
pub fn sort_batches(batches: &mut [DrawBatch]) {
    batches.sort_by_key(DrawBatch::sort_key);
}

/// Draw order of a flag list as indices into it
pub fn sorted_order(flags: &[RenderFlags]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..flags.len()).collect();
    order.sort_by_key(|&index| sort_key(flags[index]));
    order
}

/// Build sorted draw batches for a list of skinned meshes
pub fn build_batches(meshes: &[SkinnedMesh], out: &mut Vec<DrawBatch>) {
    out.clear();
    out.extend(meshes.iter().enumerate().map(|(index, mesh)| DrawBatch {
        mesh: index,
        source: mesh.source,
        texture: mesh.texture,
        flags: mesh.flags,
    }));
    sort_batches(out);
}

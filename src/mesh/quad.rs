//! Mesh Quad (SPEC_FULL.md §3): one maximal rectangle produced by either
//! mesher, consumed by the converter before the owning mesh task completes.

use crate::geom::FaceDir;
use crate::registry::model::FaceBounds;
use crate::registry::BlockId;
use glam::{IVec3, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct MeshQuad {
    pub block: BlockId,
    pub dir: FaceDir,
    /// Chunk-local integer origin.
    pub origin: IVec3,
    /// Integer extents; the normal axis is always 1.
    pub size: IVec3,
    /// -1 for single-element (or binary-meshed) blocks.
    pub element_index: i32,
    /// Normalized 0..1 offset/size of the source element, for sub-cube
    /// tiling in the converter (SPEC_FULL.md §4.6).
    pub element_offset: Vec3,
    pub element_size: Vec3,
    pub face_bounds: FaceBounds,
}

impl MeshQuad {
    /// The quad's extents on its own face plane, in (u, v) order.
    pub fn in_plane_size(&self) -> (i32, i32) {
        let (ua, va) = self.dir.plane_axes();
        let size = self.size.to_array();
        (size[ua], size[va])
    }
}

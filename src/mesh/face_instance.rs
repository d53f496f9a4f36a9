//! Face Instance / Indirect Draw Descriptor (SPEC_FULL.md §3, §6): the only
//! binary-compatible artifacts this crate produces. Byte layout is
//! implementer's choice; the field set is fixed by the spec.

use bytemuck::{Pod, Zeroable};

/// One emitted primitive: a textured quad ready for GPU instancing.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FaceInstance {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub face_direction: u32,
    pub uv: [f32; 4],
    pub texture_layer: u32,
    pub render_layer: u32,
    pub ao: [f32; 4],
}

/// One entry of the indirect draw table (SPEC_FULL.md §4.13): one per
/// non-empty live chunk, pointing at its slice of the flattened
/// `FaceInstance` buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct IndirectDrawDescriptor {
    pub min_bounds: [f32; 3],
    pub max_bounds: [f32; 3],
    pub first_face_index: u32,
    pub face_count: u32,
}

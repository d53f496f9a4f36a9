//! Ambient Occlusion (SPEC_FULL.md §4.8): a 3-neighbor per-vertex sampler
//! computed at a quad's four integer corners, so adjacent greedy-merged
//! quads agree at shared seams.

use crate::geom::FaceDir;
use crate::registry::{BlockId, BlockRegistry};
use glam::IVec3;

fn is_occluding(registry: &BlockRegistry, id: BlockId) -> bool {
    !id.is_air() && !registry.is_transparent(id) && !registry.is_liquid(id)
}

fn vertex_value(s1: bool, s2: bool, c: bool) -> f32 {
    if s1 && s2 {
        0.0
    } else {
        let sum = s1 as i32 + s2 as i32 + c as i32;
        (3 - sum) as f32 / 3.0
    }
}

/// `origin`/`in_plane_w`/`in_plane_h` describe the quad in the same
/// chunk-local space as `MeshQuad`; `sample` must answer `BlockId::AIR` for
/// any cell outside a loaded chunk (SPEC_FULL.md §4.8 "Cross-chunk
/// sampling").
pub fn compute_face_ao(
    registry: &BlockRegistry,
    mut sample: impl FnMut(i32, i32, i32) -> BlockId,
    origin: IVec3,
    dir: FaceDir,
    in_plane_w: i32,
    in_plane_h: i32,
    debug_override: Option<[f32; 4]>,
    multiplier: f32,
) -> [f32; 4] {
    if let Some(fixed) = debug_override {
        return fixed.map(|v| v * multiplier);
    }

    let n = dir.normal();
    let (ua, va) = dir.plane_axes();
    let mut u_vec = IVec3::ZERO;
    u_vec[ua] = 1;
    let mut v_vec = IVec3::ZERO;
    v_vec[va] = 1;

    let corners = [(0, 0), (in_plane_w, 0), (in_plane_w, in_plane_h), (0, in_plane_h)];
    let mut out = [0.0f32; 4];
    for (i, &(du, dv)) in corners.iter().enumerate() {
        let su = if du == 0 { -1 } else { 1 };
        let sv = if dv == 0 { -1 } else { 1 };
        // Anchor to the cell bordering this vertex, not the vertex's own
        // grid coordinate (that would sample one cell past a far corner).
        let cu = if du == 0 { 0 } else { du - 1 };
        let cv = if dv == 0 { 0 } else { dv - 1 };
        let base = origin + u_vec * cu + v_vec * cv + n;
        let side1 = base + u_vec * su;
        let side2 = base + v_vec * sv;
        let corner = base + u_vec * su + v_vec * sv;

        let mut occ = |p: IVec3| is_occluding(registry, sample(p.x, p.y, p.z));
        out[i] = vertex_value(occ(side1), occ(side2), occ(corner)) * multiplier;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BlockRegistry;

    #[test]
    fn unoccluded_corners_are_fully_lit() {
        let registry = BlockRegistry::new();
        let ao = compute_face_ao(
            &registry,
            |_, _, _| BlockId::AIR,
            IVec3::new(5, 5, 5),
            FaceDir::Up,
            1,
            1,
            None,
            1.0,
        );
        assert!(ao.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }

    fn registry_with_opaque_stone() -> (BlockRegistry, BlockId) {
        use crate::registry::model::ModelStore;
        use crate::registry::{BlockFlags, BlockSpec, CullPolicy, RenderLayer};

        let dir = std::env::temp_dir().join(format!("voxcore_ao_test_{}", std::process::id()));
        let model_dir = dir.join("vox").join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(
            model_dir.join("stone.json"),
            r#"{"textures":{"all":"vox:stone"},"elements":[{"from":[0,0,0],"to":[16,16,16],
               "faces":{"down":{"texture":"#all"},"up":{"texture":"#all"},"north":{"texture":"#all"},
               "south":{"texture":"#all"},"west":{"texture":"#all"},"east":{"texture":"#all"}}}]}"#,
        )
        .unwrap();
        let mut models = ModelStore::new(&dir, "vox");
        let mut registry = BlockRegistry::new();
        let stone = registry.register(
            BlockSpec {
                display_id: "stone".into(),
                model_name: "stone".into(),
                render_layer: RenderLayer::Opaque,
                flags: BlockFlags::COLLISION | BlockFlags::CAN_BE_CULLED,
                cull_policy: [CullPolicy::Full; 6],
            },
            &mut models,
        );
        (registry, stone)
    }

    #[test]
    fn both_edge_neighbors_occluded_darkens_fully() {
        let (registry, stone) = registry_with_opaque_stone();
        // Every sampled cell is reported occluded: s1 && s2 forces 0.0.
        let ao = compute_face_ao(
            &registry,
            |_, _, _| stone,
            IVec3::new(0, 0, 0),
            FaceDir::Up,
            1,
            1,
            None,
            1.0,
        );
        assert!(ao.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn occluder_beside_a_far_corner_darkens_only_that_vertex() {
        let (registry, stone) = registry_with_opaque_stone();
        // Unit up-face quad at the origin. Corner index 1 is the grid
        // vertex (1,0); its unique diagonal-corner sample (§4.8 "one corner
        // neighbor") is `origin + u - v + n` = (1,1,-1). Before the fix this
        // corner sampled one cell too far, at (2,1,-1), and never saw this
        // occluder at all.
        let occluder = IVec3::new(1, 1, -1);
        let ao = compute_face_ao(
            &registry,
            move |x, y, z| {
                if IVec3::new(x, y, z) == occluder {
                    stone
                } else {
                    BlockId::AIR
                }
            },
            IVec3::new(0, 0, 0),
            FaceDir::Up,
            1,
            1,
            None,
            1.0,
        );
        // Corner order: (0,0), (w,0), (w,h), (0,h) -> indices 0..3.
        assert!((ao[0] - 1.0).abs() < 1e-6, "uninvolved corner should be unaffected: {ao:?}");
        assert!(
            (ao[1] - 2.0 / 3.0).abs() < 1e-6,
            "corner beside the diagonal occluder should darken by one step: {ao:?}"
        );
        assert!((ao[2] - 1.0).abs() < 1e-6, "uninvolved corner should be unaffected: {ao:?}");
        assert!((ao[3] - 1.0).abs() < 1e-6, "uninvolved corner should be unaffected: {ao:?}");
    }

    #[test]
    fn debug_override_bypasses_sampling_and_applies_multiplier() {
        let (registry, stone) = registry_with_opaque_stone();
        let ao = compute_face_ao(
            &registry,
            |_, _, _| stone,
            IVec3::ZERO,
            FaceDir::Down,
            1,
            1,
            Some([1.0, 1.0, 1.0, 1.0]),
            0.5,
        );
        assert_eq!(ao, [0.5, 0.5, 0.5, 0.5]);
    }
}

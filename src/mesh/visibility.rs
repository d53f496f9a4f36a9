//! Cross-Chunk Face Visibility (SPEC_FULL.md §4.10): the decision table
//! used by the traditional mesher for every block/neighbor pair. The
//! binary mesher uses a cheaper plain-occupancy test instead (§4.5 step 2)
//! since its eligibility rule already restricts it to single full-cube
//! block types.

use crate::geom::FaceDir;
use crate::registry::{is_stairs_like, BlockId, BlockRegistry, CullPolicy};

/// True iff block `a`'s face toward `b` (in direction `dir`) should be
/// emitted. `b` is the block occupying the neighboring cell in `dir`.
pub fn is_face_visible(registry: &BlockRegistry, a: BlockId, b: BlockId, dir: FaceDir) -> bool {
    if b.is_air() {
        return true;
    }
    if is_stairs_like(registry, a) {
        return true;
    }

    let a_transparent = registry.is_transparent(a);
    if a_transparent && a == b {
        return false; // glass-to-glass, water-to-water
    }
    if registry.is_liquid(a)
        && !registry.is_transparent(b)
        && registry.cull_policy(b, dir.opposite()) == CullPolicy::Full
    {
        return false;
    }
    if a_transparent {
        return true;
    }
    if registry.is_transparent(b) {
        return true;
    }
    if is_stairs_like(registry, b) {
        return true; // stairs never cull a neighbor
    }

    let b_bounds = registry.face_bounds(b)[dir.opposite().index()];
    let a_bounds = registry.face_bounds(a)[dir.index()];
    !(b_bounds.covers(&a_bounds) && registry.can_be_culled(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::ModelStore;
    use crate::registry::{BlockFlags, BlockSpec, CullPolicy, RenderLayer};

    fn write_full_cube(dir: &std::path::Path, name: &str) {
        let model_dir = dir.join("vox").join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(
            model_dir.join(format!("{name}.json")),
            r#"{"textures":{"all":"vox:x"},"elements":[{"from":[0,0,0],"to":[16,16,16],
               "faces":{"down":{"texture":"#all"},"up":{"texture":"#all"},"north":{"texture":"#all"},
               "south":{"texture":"#all"},"west":{"texture":"#all"},"east":{"texture":"#all"}}}]}"#,
        )
        .unwrap();
    }

    fn tempdir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("voxcore_visibility_test_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn air_neighbor_is_always_visible() {
        let registry = BlockRegistry::new();
        assert!(is_face_visible(&registry, BlockId(1), BlockId::AIR, FaceDir::Up));
    }

    #[test]
    fn two_opaque_full_cubes_cull_each_other() {
        let dir = tempdir("opaque");
        write_full_cube(&dir, "stone");
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
        assert!(!is_face_visible(&registry, stone, stone, FaceDir::East));
    }

    #[test]
    fn transparent_same_type_neighbor_is_hidden() {
        let dir = tempdir("glass");
        write_full_cube(&dir, "glass");
        let mut models = ModelStore::new(&dir, "vox");
        let mut registry = BlockRegistry::new();
        let glass = registry.register(
            BlockSpec {
                display_id: "glass".into(),
                model_name: "glass".into(),
                render_layer: RenderLayer::Translucent,
                flags: BlockFlags::TRANSPARENT,
                cull_policy: [CullPolicy::None; 6],
            },
            &mut models,
        );
        assert!(!is_face_visible(&registry, glass, glass, FaceDir::East));
    }

    #[test]
    fn stairs_never_cull_and_are_never_culled() {
        let dir = tempdir("stairs");
        write_full_cube(&dir, "stone");
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
        let stairs = registry.register(
            BlockSpec {
                display_id: "oak_stairs".into(),
                model_name: "stone".into(),
                render_layer: RenderLayer::Opaque,
                flags: BlockFlags::COLLISION,
                cull_policy: [CullPolicy::None; 6],
            },
            &mut models,
        );
        assert!(is_face_visible(&registry, stone, stairs, FaceDir::West));
        assert!(is_face_visible(&registry, stairs, stone, FaceDir::East));
    }
}

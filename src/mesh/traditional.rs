//! Traditional Per-Block Mesher (SPEC_FULL.md §4.9): used whenever a chunk
//! contains at least one block type whose model is not a single full cube.
//! Emits one Mesh Quad per visible, textured model face of every non-air
//! cell.

use crate::geom::ALL_FACE_DIRS;
use crate::mesh::neighborhood::ChunkNeighborhood;
use crate::mesh::quad::MeshQuad;
use crate::mesh::visibility::is_face_visible;
use crate::registry::{BlockId, BlockRegistry};
use glam::IVec3;

pub fn mesh_traditional_chunk(registry: &BlockRegistry, neighborhood: &ChunkNeighborhood) -> Vec<MeshQuad> {
    let chunk = neighborhood.center();
    let mut quads = Vec::new();

    for ((x, y, z), block) in chunk.iter_cells() {
        if block.is_air() {
            continue;
        }
        let Some(model) = registry.get(block).model.as_deref() else {
            continue;
        };
        let pos = IVec3::new(x, y, z);

        for dir in ALL_FACE_DIRS {
            let npos = pos + dir.normal();
            let neighbor = neighborhood.block_at(npos.x, npos.y, npos.z).unwrap_or(BlockId::AIR);
            if !is_face_visible(registry, block, neighbor, dir) {
                continue;
            }
            for (element_index, element) in model.elements.iter().enumerate() {
                if !element.faces.contains_key(&dir) {
                    continue;
                }
                quads.push(MeshQuad {
                    block,
                    dir,
                    origin: pos,
                    size: IVec3::ONE,
                    element_index: element_index as i32,
                    element_offset: element.from,
                    element_size: element.to - element.from,
                    face_bounds: element.face_bounds(dir),
                });
            }
        }
    }

    quads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::FaceDir;
    use crate::registry::model::ModelStore;
    use crate::registry::{BlockFlags, BlockSpec, CullPolicy, RenderLayer};
    use crate::world::chunk::Chunk;
    use crate::world::chunk_coord::ChunkCoord;

    fn registry_with_slab() -> (BlockRegistry, BlockId) {
        let dir = std::env::temp_dir().join(format!("voxcore_traditional_test_{}", std::process::id()));
        let model_dir = dir.join("vox").join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(
            model_dir.join("slab.json"),
            r#"{"textures":{"all":"vox:stone"},"elements":[{"from":[0,0,0],"to":[16,8,16],
               "faces":{"down":{"texture":"#all"},"up":{"texture":"#all"},"north":{"texture":"#all"},
               "south":{"texture":"#all"},"west":{"texture":"#all"},"east":{"texture":"#all"}}}]}"#,
        )
        .unwrap();
        let mut models = ModelStore::new(&dir, "vox");
        let mut registry = BlockRegistry::new();
        let slab = registry.register(
            BlockSpec {
                display_id: "stone_slab".into(),
                model_name: "slab".into(),
                render_layer: RenderLayer::Opaque,
                flags: BlockFlags::COLLISION,
                cull_policy: [CullPolicy::None; 6],
            },
            &mut models,
        );
        assert!(!registry.can_use_binary_meshing(slab));
        (registry, slab)
    }

    #[test]
    fn slab_emits_one_quad_per_textured_face() {
        let (registry, slab) = registry_with_slab();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 8, BlockId::AIR);
        chunk.set_block(2, 2, 2, slab);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());

        let quads = mesh_traditional_chunk(&registry, &neighborhood);
        assert_eq!(quads.len(), 6);
        for q in &quads {
            assert_eq!(q.element_index, 0);
        }
        let up = quads.iter().find(|q| q.dir == FaceDir::Up).unwrap();
        assert!((up.element_size.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn air_cells_emit_nothing() {
        let (registry, _slab) = registry_with_slab();
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 8, BlockId::AIR);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        assert!(mesh_traditional_chunk(&registry, &neighborhood).is_empty());
    }
}

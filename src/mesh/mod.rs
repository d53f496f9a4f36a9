//! The meshing pipeline (SPEC_FULL.md §4.5-§4.13): binary greedy meshing,
//! traditional per-block meshing, the hybrid dispatcher between them, the
//! ambient occlusion sampler, and the quad → face-instance converter.

pub mod ao;
pub mod converter;
pub mod face_instance;
pub mod greedy;
pub mod hybrid;
pub mod neighborhood;
pub mod quad;
pub mod traditional;
pub mod visibility;

use crate::config::RenderConfig;
use crate::registry::texture::TextureArrayRegistry;
use crate::registry::BlockRegistry;
use converter::ConverterContext;
use face_instance::FaceInstance;
use neighborhood::ChunkNeighborhood;

/// Meshes one chunk end to end: dispatch (§4.11), convert each quad to a
/// Face Instance (§4.7/§4.8), and group the result by render layer in
/// OPAQUE, CUTOUT, TRANSLUCENT order (§3 "Chunk Mesh").
pub fn generate_chunk_mesh(
    registry: &BlockRegistry,
    textures: &TextureArrayRegistry,
    render: &RenderConfig,
    neighborhood: &ChunkNeighborhood,
) -> Vec<FaceInstance> {
    let quads = hybrid::mesh_chunk(registry, neighborhood);
    let chunk_origin = neighborhood.center().local_to_world(0, 0, 0);
    let ctx = ConverterContext { registry, textures, render };

    let mut instances: Vec<FaceInstance> = quads
        .iter()
        .map(|q| converter::convert_quad(&ctx, q, neighborhood, chunk_origin))
        .collect();

    instances.sort_by_key(render_layer_rank);
    instances
}

fn render_layer_rank(instance: &FaceInstance) -> u8 {
    use crate::registry::RenderLayer;
    match instance.render_layer {
        t if t == RenderLayer::Opaque.as_index() => 0,
        t if t == RenderLayer::Cutout.as_index() => 1,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::ModelStore;
    use crate::registry::{BlockFlags, BlockId, BlockSpec, CullPolicy, RenderLayer};
    use crate::world::chunk::Chunk;
    use crate::world::chunk_coord::ChunkCoord;

    #[test]
    fn generated_instances_are_grouped_by_render_layer() {
        let dir = std::env::temp_dir().join(format!("voxcore_mesh_mod_test_{}", std::process::id()));
        let model_dir = dir.join("vox").join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        for name in ["stone", "glass"] {
            std::fs::write(
                model_dir.join(format!("{name}.json")),
                r#"{"textures":{"all":"vox:x"},"elements":[{"from":[0,0,0],"to":[16,16,16],
                   "faces":{"down":{"texture":"#all"},"up":{"texture":"#all"},"north":{"texture":"#all"},
                   "south":{"texture":"#all"},"west":{"texture":"#all"},"east":{"texture":"#all"}}}]}"#,
            )
            .unwrap();
        }
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

        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 8, BlockId::AIR);
        chunk.set_block(0, 0, 0, stone);
        chunk.set_block(5, 5, 5, glass);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        let textures = TextureArrayRegistry::new();
        let render = RenderConfig::default();

        let instances = generate_chunk_mesh(&registry, &textures, &render, &neighborhood);
        assert!(!instances.is_empty());
        let mut saw_translucent = false;
        for inst in &instances {
            if inst.render_layer == RenderLayer::Translucent.as_index() {
                saw_translucent = true;
            } else {
                assert!(!saw_translucent, "opaque instance found after a translucent one");
            }
        }
    }
}

//! Headless demo binary.
//!
//! Vulkan device setup, window/input, and GUI overlays are out of scope
//! for this crate (SPEC_FULL.md §1); this binary only exercises the world
//! core end to end the way a renderer would drive it: register blocks,
//! bring up a `ChunkManager`, stream chunks around a player position,
//! drain the completion queues on the "main thread", and print what a
//! render loop would hand to the GPU each frame.

use glam::IVec3;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use voxcore::prelude::*;
use voxcore::registry::model::ModelStore;

fn assets_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// Registers the demo's block palette. A real engine drives this from a
/// data-driven block list; this binary hardcodes it to stay a single file.
fn build_registry() -> BlockRegistry {
    let mut models = ModelStore::new(assets_root(), "vox");
    let mut registry = BlockRegistry::new();

    registry.register(
        BlockSpec {
            display_id: "stone".into(),
            model_name: "stone".into(),
            render_layer: RenderLayer::Opaque,
            flags: BlockFlags::COLLISION | BlockFlags::CAN_BE_CULLED,
            cull_policy: [CullPolicy::Full; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "dirt".into(),
            model_name: "dirt".into(),
            render_layer: RenderLayer::Opaque,
            flags: BlockFlags::COLLISION | BlockFlags::CAN_BE_CULLED,
            cull_policy: [CullPolicy::Full; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "grass_block".into(),
            model_name: "grass_block".into(),
            render_layer: RenderLayer::Opaque,
            flags: BlockFlags::COLLISION | BlockFlags::CAN_BE_CULLED,
            cull_policy: [CullPolicy::Full; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "bedrock".into(),
            model_name: "bedrock".into(),
            render_layer: RenderLayer::Opaque,
            flags: BlockFlags::COLLISION | BlockFlags::CAN_BE_CULLED,
            cull_policy: [CullPolicy::Full; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "glass".into(),
            model_name: "glass".into(),
            render_layer: RenderLayer::Translucent,
            flags: BlockFlags::TRANSPARENT,
            cull_policy: [CullPolicy::None; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "water".into(),
            model_name: "water".into(),
            render_layer: RenderLayer::Translucent,
            flags: BlockFlags::TRANSPARENT | BlockFlags::LIQUID,
            cull_policy: [CullPolicy::None; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "stone_slab".into(),
            model_name: "stone_slab".into(),
            render_layer: RenderLayer::Opaque,
            flags: BlockFlags::COLLISION,
            cull_policy: [CullPolicy::None; 6],
        },
        &mut models,
    );
    registry.register(
        BlockSpec {
            display_id: "oak_stairs".into(),
            model_name: "oak_stairs".into(),
            render_layer: RenderLayer::Opaque,
            flags: BlockFlags::COLLISION,
            cull_policy: [CullPolicy::None; 6],
        },
        &mut models,
    );

    registry
}

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .expect("failed to initialize logger");

    let config_path = PathBuf::from("voxcore.toml");
    let config = EngineConfig::load(&config_path).unwrap_or_default();
    info!(
        "starting voxcore-demo v{} (chunk edge {}, render distance {} chunks)",
        voxcore::VERSION, config.world.chunk_edge, config.render.render_distance_chunks
    );

    let registry = std::sync::Arc::new(build_registry());
    let manager = ChunkManager::new(config.world, config.render, config.pool, registry.clone());

    let player_pos = IVec3::new(0, config.world.sea_level, 0);
    manager.update_loaded_chunks(player_pos);

    // Drain the completed-load/completed-mesh queues a few times, standing
    // in for per-frame `processCompletedChunks` calls on the main thread
    // (SPEC_FULL.md §4.12) until the shell around the player has settled.
    for tick in 0..20 {
        manager.process_completed_chunks();
        thread::sleep(Duration::from_millis(25));
        if tick % 5 == 0 {
            info!(
                "tick {tick}: {} chunks tracked, {} loaded",
                manager.tracked_chunk_count(),
                manager.loaded_chunk_count()
            );
        }
    }

    let stone = registry.resolve_display_id("stone").unwrap_or(BlockId::AIR);
    manager.set_block(player_pos + IVec3::new(3, 10, 3), stone);
    for _ in 0..10 {
        manager.process_completed_chunks();
        thread::sleep(Duration::from_millis(25));
    }

    let (instances, descriptors) = manager.build_draw_data();
    info!(
        "final: {} loaded chunks, {} face instances across {} non-empty draw descriptors",
        manager.loaded_chunk_count(),
        instances.len(),
        descriptors.len()
    );

    let region = Aabb::from_center_half_extents(player_pos.as_vec3(), Vec3::splat(4.0));
    let blocking = block_collision_boxes(&manager, &registry, region);
    info!("{} solid block AABBs within 4 blocks of the player", blocking.len());
}

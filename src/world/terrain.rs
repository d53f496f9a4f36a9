//! Terrain Generator (SPEC_FULL.md §4.3): a deterministic pure function
//! `(C) -> Chunk` given the world seed. Octave noise gives surface height;
//! a detail term perturbs it; blocks below a chunk-relative height become
//! stone, the top few dirt, the top grass; bedrock fills world y=0.

use crate::config::WorldConfig;
use crate::registry::{BlockId, BlockRegistry};
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;
use noise::{Fbm, NoiseFn, Perlin};

const SURFACE_BASE_HEIGHT: f64 = 64.0;
const SURFACE_AMPLITUDE: f64 = 24.0;
const SURFACE_FREQUENCY: f64 = 0.01;
const DETAIL_AMPLITUDE: f64 = 3.0;
const DETAIL_FREQUENCY: f64 = 0.08;
const DIRT_DEPTH: i32 = 4;

pub struct TerrainGenerator {
    surface_noise: Fbm<Perlin>,
    detail_noise: Perlin,
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    bedrock: BlockId,
}

impl TerrainGenerator {
    pub fn new(world: &WorldConfig, registry: &BlockRegistry) -> Self {
        let seed = world.seed as u32;
        let mut surface_noise = Fbm::<Perlin>::new(seed);
        surface_noise.octaves = 4;
        surface_noise.persistence = 0.5;
        surface_noise.lacunarity = 2.0;

        Self {
            surface_noise,
            detail_noise: Perlin::new(seed.wrapping_add(1)),
            stone: registry.resolve_display_id("stone").unwrap_or(BlockId::AIR),
            dirt: registry.resolve_display_id("dirt").unwrap_or(BlockId::AIR),
            grass: registry
                .resolve_display_id("grass_block")
                .unwrap_or(BlockId::AIR),
            bedrock: registry
                .resolve_display_id("bedrock")
                .unwrap_or(BlockId::AIR),
        }
    }

    /// Deterministic: repeated calls with the same `coord` and the same
    /// seed (baked into `self` at construction) produce identical output.
    pub fn generate(&self, coord: ChunkCoord, chunk_edge: i32) -> Chunk {
        let mut chunk = Chunk::new(coord, chunk_edge, BlockId::AIR);
        let origin = coord.world_origin(chunk_edge);

        for lx in 0..chunk_edge {
            for lz in 0..chunk_edge {
                let wx = origin.x + lx;
                let wz = origin.z + lz;
                let height = self.surface_height(wx, wz);

                for ly in 0..chunk_edge {
                    let wy = origin.y + ly;
                    let block = self.block_at(wy, height);
                    chunk.set_block(lx, ly, lz, block);
                }
            }
        }

        chunk
    }

    fn surface_height(&self, x: i32, z: i32) -> i32 {
        let base = self
            .surface_noise
            .get([x as f64 * SURFACE_FREQUENCY, z as f64 * SURFACE_FREQUENCY])
            * SURFACE_AMPLITUDE;
        let detail = self
            .detail_noise
            .get([x as f64 * DETAIL_FREQUENCY, z as f64 * DETAIL_FREQUENCY])
            * DETAIL_AMPLITUDE;
        (SURFACE_BASE_HEIGHT + base + detail).round() as i32
    }

    fn block_at(&self, y: i32, surface_height: i32) -> BlockId {
        if y == 0 {
            return self.bedrock;
        }
        if y > surface_height {
            return BlockId::AIR;
        }
        if y == surface_height {
            self.grass
        } else if y > surface_height - DIRT_DEPTH {
            self.dirt
        } else {
            self.stone
        }
    }
}

use serde::{Deserialize, Serialize};

/// World-shape constants (SPEC_FULL.md §6 "World constants").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk edge length N. Must be a power of two.
    pub chunk_edge: i32,
    /// Lowest chunk-Y that may ever be loaded.
    pub world_min_y: i32,
    /// Highest chunk-Y that may ever be loaded (exclusive band upper bound).
    pub world_max_y: i32,
    /// Sea level, in world-space blocks, within [world_min_y, world_max_y].
    pub sea_level: i32,
    /// World seed consumed by the terrain generator.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_edge: 32,
            world_min_y: -512,
            world_max_y: 512,
            sea_level: 64,
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// True iff a chunk at vertical coordinate `chunk_y` has any cell inside
    /// `[world_min_y, world_max_y)`.
    pub fn chunk_in_vertical_band(&self, chunk_y: i32) -> bool {
        let chunk_bottom = chunk_y * self.chunk_edge;
        let chunk_top = chunk_bottom + self.chunk_edge;
        chunk_top > self.world_min_y && chunk_bottom < self.world_max_y
    }
}

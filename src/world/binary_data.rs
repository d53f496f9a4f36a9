//! Binary Chunk Data (SPEC_FULL.md §4.4): a per-block-type occupancy
//! bitset over a chunk, plus a cached list of active block types.

use crate::registry::BlockId;
use crate::world::chunk::Chunk;
use bit_vec::BitVec;
use std::collections::HashMap;

pub struct BinaryChunkData {
    edge: i32,
    masks: HashMap<BlockId, BitVec>,
    active_types: Vec<BlockId>,
}

impl BinaryChunkData {
    /// Scans every cell once: O(N^3) (SPEC_FULL.md §4.4 complexity).
    pub fn build(chunk: &Chunk) -> Self {
        let edge = chunk.edge();
        let volume = chunk.volume();
        let mut masks: HashMap<BlockId, BitVec> = HashMap::new();

        for ((x, y, z), id) in chunk.iter_cells() {
            if id.is_air() {
                continue;
            }
            let idx = chunk.index(x, y, z).expect("iter_cells yields in-bounds cells");
            masks
                .entry(id)
                .or_insert_with(|| BitVec::from_elem(volume, false))
                .set(idx, true);
        }

        let mut active_types: Vec<BlockId> = masks.keys().copied().collect();
        active_types.sort();

        Self {
            edge,
            masks,
            active_types,
        }
    }

    pub fn edge(&self) -> i32 {
        self.edge
    }

    /// Empty bitset for unused types.
    pub fn mask(&self, id: BlockId) -> Option<&BitVec> {
        self.masks.get(&id)
    }

    pub fn active_types(&self) -> &[BlockId] {
        &self.active_types
    }

    pub fn has(&self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        let Some(mask) = self.masks.get(&id) else {
            return false;
        };
        let n = self.edge;
        if x < 0 || y < 0 || z < 0 || x >= n || y >= n || z >= n {
            return false;
        }
        let idx = (z * n * n + y * n + x) as usize;
        mask.get(idx).unwrap_or(false)
    }

    /// True iff cell `(x,y,z)` holds any non-air active type.
    pub fn is_occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.active_types.iter().any(|&t| self.has(x, y, z, t))
    }
}

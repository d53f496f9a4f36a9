//! A chunk plus (up to) its six loaded neighbors, giving meshers a single
//! coordinate space that spills one cell past each face into the adjacent
//! chunk (SPEC_FULL.md §4.10/§4.11 "neighbor-aware" face visibility).

use crate::registry::BlockId;
use crate::world::chunk::Chunk;
use std::sync::Arc;

pub struct ChunkNeighborhood<'a> {
    chunk: &'a Chunk,
    /// Indexed by `FaceDir::index()`.
    neighbors: [Option<Arc<Chunk>>; 6],
}

impl<'a> ChunkNeighborhood<'a> {
    pub fn new(chunk: &'a Chunk, neighbors: [Option<Arc<Chunk>>; 6]) -> Self {
        Self { chunk, neighbors }
    }

    pub fn center(&self) -> &Chunk {
        self.chunk
    }

    /// `x,y,z` are local to `self.chunk`'s origin but may fall one step
    /// outside `[0, edge)` along exactly one axis. Returns `None` if the
    /// position requires a neighbor chunk that is not loaded.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        if self.chunk.in_bounds(x, y, z) {
            return Some(self.chunk.block(x, y, z));
        }

        let edge = self.chunk.edge();
        let wrap = |v: i32| -> i32 {
            if v < 0 {
                v + edge
            } else if v >= edge {
                v - edge
            } else {
                v
            }
        };

        // Determine which single face was crossed. Diagonal/corner overflow
        // (more than one axis out of bounds) cannot be served by a direct
        // face neighbor and is treated as unloaded.
        let out_axes = [(x < 0 || x >= edge), (y < 0 || y >= edge), (z < 0 || z >= edge)];
        if out_axes.iter().filter(|&&b| b).count() != 1 {
            return None;
        }

        let dir = if x < 0 {
            crate::geom::FaceDir::West
        } else if x >= edge {
            crate::geom::FaceDir::East
        } else if y < 0 {
            crate::geom::FaceDir::Down
        } else if y >= edge {
            crate::geom::FaceDir::Up
        } else if z < 0 {
            crate::geom::FaceDir::North
        } else {
            crate::geom::FaceDir::South
        };

        let neighbor = self.neighbors[dir.index()].as_ref()?;
        Some(neighbor.block(wrap(x), wrap(y), wrap(z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::chunk_coord::ChunkCoord;

    #[test]
    fn reads_in_chunk_cells_directly() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 4, BlockId::AIR);
        chunk.set_block(1, 1, 1, BlockId(9));
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        assert_eq!(neighborhood.block_at(1, 1, 1), Some(BlockId(9)));
    }

    #[test]
    fn missing_neighbor_is_none() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 4, BlockId::AIR);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        assert_eq!(neighborhood.block_at(4, 0, 0), None);
        assert_eq!(neighborhood.block_at(-1, 0, 0), None);
    }

    #[test]
    fn present_neighbor_is_consulted_across_the_boundary() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 4, BlockId::AIR);
        let mut east_neighbor = Chunk::new(ChunkCoord::new(1, 0, 0), 4, BlockId::AIR);
        east_neighbor.set_block(0, 2, 2, BlockId(5));
        let mut neighbors: [Option<Arc<Chunk>>; 6] = Default::default();
        neighbors[crate::geom::FaceDir::East.index()] = Some(Arc::new(east_neighbor));
        let neighborhood = ChunkNeighborhood::new(&chunk, neighbors);
        assert_eq!(neighborhood.block_at(4, 2, 2), Some(BlockId(5)));
    }

    #[test]
    fn diagonal_overflow_is_none_even_with_neighbors_present() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 4, BlockId::AIR);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        assert_eq!(neighborhood.block_at(4, 4, 0), None);
    }
}

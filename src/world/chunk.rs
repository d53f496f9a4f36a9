//! Chunk (SPEC_FULL.md §4.2): a fixed-size dense 3D block array with
//! local/world coordinate helpers.

use crate::geom::FaceDir;
use crate::registry::{BlockId, BlockRegistry, CullPolicy};
use crate::world::chunk_coord::ChunkCoord;
use glam::IVec3;

#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    edge: i32,
    cells: Vec<BlockId>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, edge: i32, fill: BlockId) -> Self {
        let volume = (edge as usize).pow(3);
        Self {
            coord,
            edge,
            cells: vec![fill; volume],
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn edge(&self) -> i32 {
        self.edge
    }

    pub fn volume(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && y >= 0 && z >= 0 && x < self.edge && y < self.edge && z < self.edge
    }

    /// Fixed linearization `(x,y,z) -> z*N^2 + y*N + x` (SPEC_FULL.md §3).
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !self.in_bounds(x, y, z) {
            return None;
        }
        let n = self.edge;
        Some((z * n * n + y * n + x) as usize)
    }

    /// Total: out-of-bounds reads return AIR.
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.index(x, y, z)
            .map(|i| self.cells[i])
            .unwrap_or(BlockId::AIR)
    }

    /// Bounds-checked; does not re-mesh (SPEC_FULL.md §4.2 invariant).
    /// Returns whether the cell actually changed.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, t: BlockId) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                let changed = self.cells[i] != t;
                self.cells[i] = t;
                changed
            }
            None => false,
        }
    }

    pub fn local_to_world(&self, x: i32, y: i32, z: i32) -> IVec3 {
        self.coord.world_origin(self.edge) + IVec3::new(x, y, z)
    }

    /// Inverse of `local_to_world` for cells inside this chunk.
    pub fn world_to_local(&self, world: IVec3) -> Option<(i32, i32, i32)> {
        let origin = self.coord.world_origin(self.edge);
        let local = world - origin;
        if self.in_bounds(local.x, local.y, local.z) {
            Some((local.x, local.y, local.z))
        } else {
            None
        }
    }

    /// In-chunk-only face visibility (SPEC_FULL.md §4.2): neighbors outside
    /// the chunk are treated as AIR here. The neighbor-aware cross-chunk
    /// variant lives in `mesh::visibility`.
    pub fn is_face_visible(
        &self,
        x: i32,
        y: i32,
        z: i32,
        dir: FaceDir,
        registry: &BlockRegistry,
    ) -> bool {
        let current = self.block(x, y, z);
        if current.is_air() {
            return false;
        }
        let n = dir.normal();
        let (nx, ny, nz) = (x + n.x, y + n.y, z + n.z);
        if !self.in_bounds(nx, ny, nz) {
            return true; // neighbor outside chunk is treated as AIR here
        }
        let neighbor = self.block(nx, ny, nz);
        if neighbor.is_air() {
            return true;
        }
        !(registry.cull_policy(neighbor, dir.opposite()) == CullPolicy::Full
            && registry.can_be_culled(current))
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = ((i32, i32, i32), BlockId)> + '_ {
        let n = self.edge;
        self.cells.iter().enumerate().map(move |(i, &id)| {
            let i = i as i32;
            let x = i % n;
            let y = (i / n) % n;
            let z = i / (n * n);
            ((x, y, z), id)
        })
    }
}

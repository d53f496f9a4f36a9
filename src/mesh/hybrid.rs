//! Hybrid Chunk Mesh Generator (SPEC_FULL.md §4.11): builds Binary Chunk
//! Data once, then dispatches to the binary mesher only if every active
//! block type is eligible, otherwise falls back to the traditional
//! per-block mesher for the whole chunk. Mixing the two within one chunk
//! is deliberately rejected to keep AO and culling decisions consistent.

use crate::mesh::greedy::mesh_binary_chunk;
use crate::mesh::neighborhood::ChunkNeighborhood;
use crate::mesh::quad::MeshQuad;
use crate::mesh::traditional::mesh_traditional_chunk;
use crate::registry::BlockRegistry;
use crate::world::binary_data::BinaryChunkData;

pub fn mesh_chunk(registry: &BlockRegistry, neighborhood: &ChunkNeighborhood) -> Vec<MeshQuad> {
    let data = BinaryChunkData::build(neighborhood.center());
    let all_eligible = data
        .active_types()
        .iter()
        .all(|&t| registry.can_use_binary_meshing(t));

    if all_eligible {
        mesh_binary_chunk(registry, &data, neighborhood)
    } else {
        mesh_traditional_chunk(registry, neighborhood)
    }
}

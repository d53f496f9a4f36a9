//! Binary Greedy Mesher (SPEC_FULL.md §4.5): per active block type and face
//! direction, slice the chunk's occupancy bitset into N planes, build a
//! visible-face mask per plane, and pack it into maximal rectangles.
//!
//! Only reached for chunks where every active block type passes
//! `BlockRegistry::can_use_binary_meshing` (SPEC_FULL.md §4.11): every
//! visible cell of a given type therefore shares identical face bounds, so
//! the "bounds-compatibility" merge rule of §4.5 step 3 is trivially
//! satisfied and is not re-checked here.

use crate::geom::{FaceDir, ALL_FACE_DIRS};
use crate::mesh::neighborhood::ChunkNeighborhood;
use crate::mesh::quad::MeshQuad;
use crate::registry::{BlockId, BlockRegistry};
use crate::world::binary_data::BinaryChunkData;
use glam::{IVec3, Vec3};

fn compose(axis_n: usize, plane: i32, ua: usize, va: usize, u: i32, v: i32) -> IVec3 {
    let mut p = [0i32; 3];
    p[axis_n] = plane;
    p[ua] = u;
    p[va] = v;
    IVec3::from_array(p)
}

/// Greedy-packs a boolean `edge x edge` mask (row-major, `v*edge+u`) into
/// maximal rectangles, width expansion before height (SPEC_FULL.md §4.5
/// step 3).
fn pack_plane(eligible: &[bool], edge: i32) -> Vec<(i32, i32, i32, i32)> {
    let mut consumed = vec![false; eligible.len()];
    let mut rects = Vec::new();
    let idx = |u: i32, v: i32| (v * edge + u) as usize;

    for v in 0..edge {
        for u in 0..edge {
            let i = idx(u, v);
            if !eligible[i] || consumed[i] {
                continue;
            }

            let mut w = 1;
            while u + w < edge {
                let j = idx(u + w, v);
                if eligible[j] && !consumed[j] {
                    w += 1;
                } else {
                    break;
                }
            }

            let mut h = 1;
            'grow_height: while v + h < edge {
                for du in 0..w {
                    let j = idx(u + du, v + h);
                    if !eligible[j] || consumed[j] {
                        break 'grow_height;
                    }
                }
                h += 1;
            }

            for dv in 0..h {
                for du in 0..w {
                    consumed[idx(u + du, v + dv)] = true;
                }
            }
            rects.push((u, v, w, h));
        }
    }
    rects
}

fn mesh_one_direction(
    data: &BinaryChunkData,
    neighborhood: &ChunkNeighborhood,
    block: BlockId,
    dir: FaceDir,
    edge: i32,
    bounds: crate::registry::model::FaceBounds,
) -> Vec<MeshQuad> {
    let axis_n = dir.normal_axis();
    let (ua, va) = dir.plane_axes();
    let n = dir.normal();
    let mut quads = Vec::new();

    for plane in 0..edge {
        let mut eligible = vec![false; (edge * edge) as usize];
        for v in 0..edge {
            for u in 0..edge {
                let pos = compose(axis_n, plane, ua, va, u, v);
                if !data.has(pos.x, pos.y, pos.z, block) {
                    continue;
                }
                let npos = pos + n;
                let occupied = if npos.x >= 0
                    && npos.y >= 0
                    && npos.z >= 0
                    && npos.x < edge
                    && npos.y < edge
                    && npos.z < edge
                {
                    data.is_occupied(npos.x, npos.y, npos.z)
                } else {
                    match neighborhood.block_at(npos.x, npos.y, npos.z) {
                        Some(id) => !id.is_air(),
                        None => false, // no neighbor chunk loaded: treat as visible
                    }
                };
                if !occupied {
                    eligible[(v * edge + u) as usize] = true;
                }
            }
        }

        for (u0, v0, w, h) in pack_plane(&eligible, edge) {
            let origin = compose(axis_n, plane, ua, va, u0, v0);
            let mut size = [1i32; 3];
            size[ua] = w;
            size[va] = h;
            quads.push(MeshQuad {
                block,
                dir,
                origin,
                size: IVec3::from_array(size),
                element_index: -1,
                element_offset: Vec3::ZERO,
                element_size: Vec3::ONE,
                face_bounds: bounds,
            });
        }
    }

    quads
}

pub fn mesh_binary_chunk(
    registry: &BlockRegistry,
    data: &BinaryChunkData,
    neighborhood: &ChunkNeighborhood,
) -> Vec<MeshQuad> {
    let edge = data.edge();
    let mut quads = Vec::new();
    for &block in data.active_types() {
        let face_bounds = registry.face_bounds(block);
        for dir in ALL_FACE_DIRS {
            quads.extend(mesh_one_direction(
                data,
                neighborhood,
                block,
                dir,
                edge,
                face_bounds[dir.index()],
            ));
        }
    }
    quads
}

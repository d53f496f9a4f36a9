//! Chunk Manager (SPEC_FULL.md §4.12): the lifecycle state machine —
//! Absent → Loading → Loaded → Meshing → Live → unload — driven by the
//! Thread Pool and drained only on the main thread via
//! `process_completed_chunks`.

use crate::config::{PoolConfig, RenderConfig, WorldConfig};
use crate::geom::{Aabb, FaceDir, ALL_FACE_DIRS};
use crate::mesh::face_instance::{FaceInstance, IndirectDrawDescriptor};
use crate::mesh::neighborhood::ChunkNeighborhood;
use crate::pool::ThreadPool;
use crate::registry::texture::TextureArrayRegistry;
use crate::registry::{BlockId, BlockRegistry};
use crate::world::chunk::Chunk;
use crate::world::chunk_coord::ChunkCoord;
use crate::world::octree::Octree;
use crate::world::terrain::TerrainGenerator;
use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::{IVec3, Vec3};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn chunk_aabb(coord: ChunkCoord, edge: i32) -> Aabb {
    let origin = coord.world_origin(edge).as_vec3();
    Aabb::new(origin, origin + Vec3::splat(edge as f32))
}

fn priority_from_distance(coord: ChunkCoord, origin: ChunkCoord) -> i64 {
    i64::MAX - coord.distance_squared(origin)
}

struct ChunkEntry {
    cell: Mutex<Chunk>,
    mesh: Mutex<Vec<FaceInstance>>,
    /// Desired mesh version: bumped every time a re-mesh is requested.
    /// A mesh task captures this value at submission; the drain step only
    /// integrates a result whose captured version is still current
    /// (SPEC_FULL.md §9 "mesh version tagging" decision).
    version: AtomicU64,
}

impl ChunkEntry {
    fn new(chunk: Chunk) -> Self {
        Self {
            cell: Mutex::new(chunk),
            mesh: Mutex::new(Vec::new()),
            version: AtomicU64::new(0),
        }
    }
}

struct Inner {
    chunks: HashMap<ChunkCoord, Arc<ChunkEntry>>,
    octree: Octree,
    /// Coordinates currently out for terrain generation. Removing an
    /// entry here before its result arrives is the cancellation mechanism:
    /// the drain step discards results for coordinates it no longer finds
    /// here (SPEC_FULL.md §4.12 "task whose target chunk was unloaded...
    /// MUST discard its output").
    in_flight_loads: HashMap<ChunkCoord, crate::pool::TaskId>,
}

struct LoadResult {
    coord: ChunkCoord,
    chunk: Chunk,
}

struct MeshResult {
    coord: ChunkCoord,
    version: u64,
    instances: Vec<FaceInstance>,
}

struct Shared {
    world: WorldConfig,
    render: RenderConfig,
    registry: Arc<BlockRegistry>,
    terrain: Arc<TerrainGenerator>,
    textures: Arc<TextureArrayRegistry>,
    inner: RwLock<Inner>,
    completed_load_tx: Sender<LoadResult>,
    completed_load_rx: Receiver<LoadResult>,
    completed_mesh_tx: Sender<MeshResult>,
    completed_mesh_rx: Receiver<MeshResult>,
}

pub struct ChunkManager {
    shared: Arc<Shared>,
    pool: ThreadPool,
}

impl ChunkManager {
    pub fn new(
        world: WorldConfig,
        render: RenderConfig,
        pool_config: PoolConfig,
        registry: Arc<BlockRegistry>,
    ) -> Self {
        let terrain = Arc::new(TerrainGenerator::new(&world, &registry));
        let textures = Arc::new(TextureArrayRegistry::new());
        let (completed_load_tx, completed_load_rx) = unbounded();
        let (completed_mesh_tx, completed_mesh_rx) = unbounded();

        let world_half_extent =
            (render.render_distance_chunks as f32 + 2.0) * world.chunk_edge as f32;
        let world_half_height = ((world.world_max_y - world.world_min_y).max(1) as f32) * 0.5;

        let shared = Arc::new(Shared {
            world,
            render,
            registry,
            terrain,
            textures,
            inner: RwLock::new(Inner {
                chunks: HashMap::new(),
                octree: Octree::new(world_half_extent, world_half_height),
                in_flight_loads: HashMap::new(),
            }),
            completed_load_tx,
            completed_load_rx,
            completed_mesh_tx,
            completed_mesh_rx,
        });

        let pool = ThreadPool::new(pool_config.resolved_worker_count());
        Self { shared, pool }
    }

    pub fn textures(&self) -> &Arc<TextureArrayRegistry> {
        &self.shared.textures
    }

    /// `getBlock` (SPEC_FULL.md §6): total, AIR if the containing chunk
    /// isn't loaded.
    pub fn get_block(&self, world_pos: IVec3) -> BlockId {
        let coord = ChunkCoord::from_world_block(world_pos, self.shared.world.chunk_edge);
        let inner = self.shared.inner.read();
        let Some(entry) = inner.chunks.get(&coord) else {
            return BlockId::AIR;
        };
        let cell = entry.cell.lock();
        match cell.world_to_local(world_pos) {
            Some((x, y, z)) => cell.block(x, y, z),
            None => BlockId::AIR,
        }
    }

    /// `setBlock` (SPEC_FULL.md §6): loads the containing chunk
    /// synchronously if absent, then re-queues mesh regeneration for this
    /// chunk and any of the 6 neighbors whose shared face was touched.
    pub fn set_block(&self, world_pos: IVec3, block: BlockId) {
        let edge = self.shared.world.chunk_edge;
        let coord = ChunkCoord::from_world_block(world_pos, edge);
        self.ensure_loaded_sync(coord);

        let entry = {
            let inner = self.shared.inner.read();
            inner.chunks.get(&coord).cloned()
        };
        let Some(entry) = entry else { return };

        let touched_local = {
            let mut cell = entry.cell.lock();
            let Some((lx, ly, lz)) = cell.world_to_local(world_pos) else {
                return;
            };
            if cell.set_block(lx, ly, lz, block) {
                Some((lx, ly, lz))
            } else {
                None
            }
        };
        let Some((lx, ly, lz)) = touched_local else {
            return; // unchanged: setBlock does not re-mesh (SPEC_FULL.md §4.2)
        };

        self.schedule_mesh(coord);
        for dir in ALL_FACE_DIRS {
            let touches_boundary = match dir {
                FaceDir::West => lx == 0,
                FaceDir::East => lx == edge - 1,
                FaceDir::Down => ly == 0,
                FaceDir::Up => ly == edge - 1,
                FaceDir::North => lz == 0,
                FaceDir::South => lz == edge - 1,
            };
            if !touches_boundary {
                continue;
            }
            let neighbor_coord = coord.neighbor(dir);
            let neighbor_loaded = self.shared.inner.read().chunks.contains_key(&neighbor_coord);
            if neighbor_loaded {
                self.schedule_mesh(neighbor_coord);
            }
        }
    }

    pub fn get_chunks_in_region(&self, region: Aabb) -> Vec<ChunkCoord> {
        self.shared.inner.read().octree.get_chunks_in_region(region)
    }

    pub fn get_chunks_along_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Vec<ChunkCoord> {
        self.shared
            .inner
            .read()
            .octree
            .get_chunks_along_ray(origin, dir, max_dist)
    }

    /// `updateLoadedChunks(player)` (SPEC_FULL.md §4.12): loads chunks
    /// newly inside the spherical render-distance shell, unloads those now
    /// outside it. Idempotent: a repeat call with the same position queues
    /// no new loads (SPEC_FULL.md §8).
    pub fn update_loaded_chunks(&self, player_world_pos: IVec3) {
        let edge = self.shared.world.chunk_edge;
        let player_chunk = ChunkCoord::from_world_block(player_world_pos, edge);
        let radius = self.shared.render.render_distance_chunks as i32;
        let radius_sq = (radius as i64) * (radius as i64);

        let mut desired = HashSet::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                for dz in -radius..=radius {
                    let d2 =
                        (dx as i64) * (dx as i64) + (dy as i64) * (dy as i64) + (dz as i64) * (dz as i64);
                    if d2 > radius_sq {
                        continue;
                    }
                    let coord =
                        ChunkCoord::new(player_chunk.x() + dx, player_chunk.y() + dy, player_chunk.z() + dz);
                    if self.shared.world.chunk_in_vertical_band(coord.y()) {
                        desired.insert(coord);
                    }
                }
            }
        }

        for &coord in &desired {
            let already = {
                let inner = self.shared.inner.read();
                inner.chunks.contains_key(&coord) || inner.in_flight_loads.contains_key(&coord)
            };
            if !already {
                self.schedule_load(coord, player_chunk);
            }
        }

        let to_unload: Vec<ChunkCoord> = {
            let inner = self.shared.inner.read();
            inner
                .chunks
                .keys()
                .chain(inner.in_flight_loads.keys())
                .copied()
                .filter(|c| !desired.contains(c))
                .collect()
        };
        for coord in to_unload {
            self.unload_chunk(coord);
        }
    }

    /// Drains the completed-load and completed-mesh queues. Must only be
    /// called from the main thread (SPEC_FULL.md §4.12/§5).
    pub fn process_completed_chunks(&self) {
        while let Ok(result) = self.shared.completed_load_rx.try_recv() {
            self.integrate_load(result);
        }
        while let Ok(result) = self.shared.completed_mesh_rx.try_recv() {
            self.integrate_mesh(result);
        }
    }

    /// Rebuilds the flattened Face Instance buffer and Indirect Draw Table
    /// in live-chunk order (SPEC_FULL.md §4.13).
    pub fn build_draw_data(&self) -> (Vec<FaceInstance>, Vec<IndirectDrawDescriptor>) {
        let inner = self.shared.inner.read();
        let mut coords: Vec<ChunkCoord> = inner.chunks.keys().copied().collect();
        coords.sort();

        let mut instances = Vec::new();
        let mut descriptors = Vec::new();
        for coord in coords {
            let entry = &inner.chunks[&coord];
            let mesh = entry.mesh.lock();
            if mesh.is_empty() {
                continue;
            }
            let aabb = chunk_aabb(coord, self.shared.world.chunk_edge);
            descriptors.push(IndirectDrawDescriptor {
                min_bounds: aabb.min.to_array(),
                max_bounds: aabb.max.to_array(),
                first_face_index: instances.len() as u32,
                face_count: mesh.len() as u32,
            });
            instances.extend_from_slice(&mesh);
        }
        (instances, descriptors)
    }

    pub fn loaded_chunk_count(&self) -> usize {
        self.shared.inner.read().chunks.len()
    }

    pub fn tracked_chunk_count(&self) -> usize {
        let inner = self.shared.inner.read();
        inner.chunks.len() + inner.in_flight_loads.len()
    }

    fn ensure_loaded_sync(&self, coord: ChunkCoord) {
        if !self.shared.world.chunk_in_vertical_band(coord.y()) {
            return;
        }
        if self.shared.inner.read().chunks.contains_key(&coord) {
            return;
        }
        let chunk = self.shared.terrain.generate(coord, self.shared.world.chunk_edge);
        let mut inner = self.shared.inner.write();
        if inner.chunks.contains_key(&coord) {
            return; // raced with a concurrent load
        }
        inner.in_flight_loads.remove(&coord);
        let aabb = chunk_aabb(coord, self.shared.world.chunk_edge);
        inner.chunks.insert(coord, Arc::new(ChunkEntry::new(chunk)));
        inner.octree.add_chunk(coord, aabb);
    }

    fn schedule_load(&self, coord: ChunkCoord, priority_origin: ChunkCoord) {
        {
            let mut inner = self.shared.inner.write();
            if inner.chunks.contains_key(&coord) || inner.in_flight_loads.contains_key(&coord) {
                return;
            }
            inner.in_flight_loads.insert(coord, crate::pool::TaskId(0));
        }

        let shared = self.shared.clone();
        let edge = self.shared.world.chunk_edge;
        let priority = priority_from_distance(coord, priority_origin);
        let task_id = self.pool.submit(priority, move || {
            let chunk = shared.terrain.generate(coord, edge);
            let _ = shared.completed_load_tx.send(LoadResult { coord, chunk });
        });
        self.shared.inner.write().in_flight_loads.insert(coord, task_id);
    }

    fn unload_chunk(&self, coord: ChunkCoord) {
        let mut inner = self.shared.inner.write();
        let was_in_flight = inner.in_flight_loads.remove(&coord).is_some();
        if inner.chunks.remove(&coord).is_some() {
            inner.octree.remove_chunk(coord);
            log::debug!("unloaded chunk {:?}", coord.0);
        } else if was_in_flight {
            log::debug!("cancelled in-flight load for chunk {:?}", coord.0);
        }
    }

    fn snapshot_with_neighbors(&self, coord: ChunkCoord) -> Option<(Chunk, [Option<Arc<Chunk>>; 6])> {
        let inner = self.shared.inner.read();
        let entry = inner.chunks.get(&coord)?;
        let chunk = entry.cell.lock().clone();
        let mut neighbors: [Option<Arc<Chunk>>; 6] = Default::default();
        for dir in ALL_FACE_DIRS {
            if let Some(neighbor_entry) = inner.chunks.get(&coord.neighbor(dir)) {
                neighbors[dir.index()] = Some(Arc::new(neighbor_entry.cell.lock().clone()));
            }
        }
        Some((chunk, neighbors))
    }

    fn schedule_mesh(&self, coord: ChunkCoord) {
        let entry = {
            let inner = self.shared.inner.read();
            inner.chunks.get(&coord).cloned()
        };
        let Some(entry) = entry else { return };
        let captured_version = entry.version.fetch_add(1, Ordering::SeqCst) + 1;

        let Some((chunk, neighbors)) = self.snapshot_with_neighbors(coord) else {
            return;
        };
        let shared = self.shared.clone();
        // Mesh tasks run at a flat priority; load tasks use distance-based
        // priority so closer terrain always wins first placement.
        let priority = i64::MAX / 2;
        self.pool.submit(priority, move || {
            let neighborhood = ChunkNeighborhood::new(&chunk, neighbors);
            let instances = crate::mesh::generate_chunk_mesh(
                &shared.registry,
                &shared.textures,
                &shared.render,
                &neighborhood,
            );
            let _ = shared.completed_mesh_tx.send(MeshResult {
                coord,
                version: captured_version,
                instances,
            });
        });
    }

    fn integrate_load(&self, result: LoadResult) {
        let mut inner = self.shared.inner.write();
        if inner.in_flight_loads.remove(&result.coord).is_none() {
            log::debug!(
                "discarding terrain result for {:?}: chunk unloaded before completion",
                result.coord.0
            );
            return; // unloaded before this task completed
        }
        let aabb = chunk_aabb(result.coord, self.shared.world.chunk_edge);
        inner
            .chunks
            .insert(result.coord, Arc::new(ChunkEntry::new(result.chunk)));
        inner.octree.add_chunk(result.coord, aabb);
        drop(inner);
        log::debug!("loaded chunk {:?}", result.coord.0);

        self.schedule_mesh(result.coord);
        for dir in ALL_FACE_DIRS {
            let neighbor_coord = result.coord.neighbor(dir);
            let neighbor_loaded = self.shared.inner.read().chunks.contains_key(&neighbor_coord);
            if neighbor_loaded {
                self.schedule_mesh(neighbor_coord);
            }
        }
    }

    fn integrate_mesh(&self, result: MeshResult) {
        let inner = self.shared.inner.read();
        let Some(entry) = inner.chunks.get(&result.coord) else {
            log::debug!(
                "discarding mesh result for {:?}: chunk unloaded before completion",
                result.coord.0
            );
            return; // unloaded before this task completed
        };
        if entry.version.load(Ordering::SeqCst) == result.version {
            let face_count = result.instances.len();
            *entry.mesh.lock() = result.instances;
            log::debug!("meshed chunk {:?}: {} face instances", result.coord.0, face_count);
        } else {
            log::debug!(
                "discarding stale mesh for {:?}: version {} superseded",
                result.coord.0, result.version
            );
        }
    }
}

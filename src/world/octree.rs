//! Loose octree of chunk AABBs (SPEC_FULL.md §4.14), used by player
//! collision resolution (region query) and block-ray picking (ray query).
//! Loose bounds (each node's stored bounds are its tight cell expanded by
//! `LOOSENESS`) let an item be inserted without re-balancing ancestors,
//! giving O(log) insertion and query for the bounded number of chunks any
//! render-distance shell actually holds.

use crate::geom::Aabb;
use crate::world::chunk_coord::ChunkCoord;
use glam::Vec3;
use std::collections::HashMap;

const LOOSENESS: f32 = 1.5;
const MAX_ITEMS_PER_NODE: usize = 8;
const MAX_DEPTH: u32 = 16;

struct Node {
    tight_center: Vec3,
    tight_half: f32,
    items: Vec<(ChunkCoord, Aabb)>,
    children: Option<Box<[Node; 8]>>,
}

impl Node {
    fn new(tight_center: Vec3, tight_half: f32) -> Self {
        Self {
            tight_center,
            tight_half,
            items: Vec::new(),
            children: None,
        }
    }

    fn loose_bounds(&self) -> Aabb {
        let half = Vec3::splat(self.tight_half * LOOSENESS);
        Aabb::new(self.tight_center - half, self.tight_center + half)
    }

    fn octant_index(&self, point: Vec3) -> usize {
        let mut idx = 0;
        if point.x >= self.tight_center.x {
            idx |= 1;
        }
        if point.y >= self.tight_center.y {
            idx |= 2;
        }
        if point.z >= self.tight_center.z {
            idx |= 4;
        }
        idx
    }

    fn child_center(&self, octant: usize) -> Vec3 {
        let q = self.tight_half * 0.5;
        let sx = if octant & 1 != 0 { q } else { -q };
        let sy = if octant & 2 != 0 { q } else { -q };
        let sz = if octant & 4 != 0 { q } else { -q };
        self.tight_center + Vec3::new(sx, sy, sz)
    }

    fn insert(&mut self, coord: ChunkCoord, aabb: Aabb, depth: u32) {
        if self.children.is_none() {
            self.items.push((coord, aabb));
            if self.items.len() > MAX_ITEMS_PER_NODE && depth < MAX_DEPTH {
                self.subdivide(depth);
            }
            return;
        }
        let octant = self.octant_index(aabb.center());
        self.children.as_mut().unwrap()[octant].insert(coord, aabb, depth + 1);
    }

    fn subdivide(&mut self, depth: u32) {
        let half = self.tight_half * 0.5;
        let mut children: Vec<Node> = (0..8)
            .map(|o| Node::new(self.child_center(o), half))
            .collect();
        for (coord, aabb) in self.items.drain(..) {
            let octant = {
                let center = aabb.center();
                let mut idx = 0;
                if center.x >= self.tight_center.x {
                    idx |= 1;
                }
                if center.y >= self.tight_center.y {
                    idx |= 2;
                }
                if center.z >= self.tight_center.z {
                    idx |= 4;
                }
                idx
            };
            children[octant].insert(coord, aabb, depth + 1);
        }
        self.children = Some(Box::new(children.try_into().unwrap_or_else(
            |_: Vec<Node>| unreachable!("exactly 8 children constructed above"),
        )));
    }

    fn remove(&mut self, coord: ChunkCoord) -> bool {
        if let Some(pos) = self.items.iter().position(|(c, _)| *c == coord) {
            self.items.remove(pos);
            return true;
        }
        if let Some(children) = &mut self.children {
            return children.iter_mut().any(|c| c.remove(coord));
        }
        false
    }

    fn query_region(&self, region: &Aabb, out: &mut Vec<ChunkCoord>) {
        if !self.loose_bounds().intersects(region) {
            return;
        }
        for (coord, aabb) in &self.items {
            if aabb.intersects(region) {
                out.push(*coord);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_region(region, out);
            }
        }
    }

    fn query_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32, out: &mut Vec<(f32, ChunkCoord)>) {
        if self.loose_bounds().intersects_ray(origin, dir, max_dist).is_none() {
            return;
        }
        for (coord, aabb) in &self.items {
            if let Some(t) = aabb.intersects_ray(origin, dir, max_dist) {
                out.push((t, *coord));
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_ray(origin, dir, max_dist, out);
            }
        }
    }
}

pub struct Octree {
    root: Node,
    index: HashMap<ChunkCoord, Aabb>,
}

impl Octree {
    /// `world_half_extent` should comfortably exceed the horizontal distance
    /// the player can ever stray from the origin; `world_half_height` covers
    /// `[world_min_y, world_max_y]`.
    pub fn new(world_half_extent: f32, world_half_height: f32) -> Self {
        let half = world_half_extent.max(world_half_height);
        Self {
            root: Node::new(Vec3::ZERO, half),
            index: HashMap::new(),
        }
    }

    pub fn add_chunk(&mut self, coord: ChunkCoord, aabb: Aabb) {
        if let Some(existing) = self.index.get(&coord) {
            if *existing == aabb {
                return;
            }
            self.root.remove(coord);
        }
        self.root.insert(coord, aabb, 0);
        self.index.insert(coord, aabb);
    }

    pub fn remove_chunk(&mut self, coord: ChunkCoord) {
        if self.index.remove(&coord).is_some() {
            self.root.remove(coord);
        }
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.index.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get_chunks_in_region(&self, region: Aabb) -> Vec<ChunkCoord> {
        let mut out = Vec::new();
        self.root.query_region(&region, &mut out);
        out
    }

    /// Returns chunks intersected by the ray, nearest first.
    pub fn get_chunks_along_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Vec<ChunkCoord> {
        let mut hits = Vec::new();
        self.root.query_ray(origin, dir.normalize_or_zero(), max_dist, &mut hits);
        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        hits.into_iter().map(|(_, c)| c).collect()
    }
}

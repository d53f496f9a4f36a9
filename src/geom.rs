//! Shared axis/direction/bounds types used by the registry, world and mesh
//! modules alike.

use glam::{IVec3, Vec3};

/// One of the six axis-aligned outward face normals of a block
/// (SPEC_FULL.md §3 "Mesh Quad"): 0=down Y−, 1=up Y+, 2=north Z−, 3=south Z+,
/// 4=west X−, 5=east X+.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FaceDir {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

pub const ALL_FACE_DIRS: [FaceDir; 6] = [
    FaceDir::Down,
    FaceDir::Up,
    FaceDir::North,
    FaceDir::South,
    FaceDir::West,
    FaceDir::East,
];

impl FaceDir {
    pub const fn index(self) -> usize {
        self as u8 as usize
    }

    pub fn from_index(i: usize) -> Self {
        ALL_FACE_DIRS[i]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "down" => FaceDir::Down,
            "up" => FaceDir::Up,
            "north" => FaceDir::North,
            "south" => FaceDir::South,
            "west" => FaceDir::West,
            "east" => FaceDir::East,
            _ => return None,
        })
    }

    /// Outward integer normal for this face.
    pub const fn normal(self) -> IVec3 {
        match self {
            FaceDir::Down => IVec3::new(0, -1, 0),
            FaceDir::Up => IVec3::new(0, 1, 0),
            FaceDir::North => IVec3::new(0, 0, -1),
            FaceDir::South => IVec3::new(0, 0, 1),
            FaceDir::West => IVec3::new(-1, 0, 0),
            FaceDir::East => IVec3::new(1, 0, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            FaceDir::Down => FaceDir::Up,
            FaceDir::Up => FaceDir::Down,
            FaceDir::North => FaceDir::South,
            FaceDir::South => FaceDir::North,
            FaceDir::West => FaceDir::East,
            FaceDir::East => FaceDir::West,
        }
    }

    /// Axis the face's normal points along: 0=x, 1=y, 2=z.
    pub const fn normal_axis(self) -> usize {
        match self {
            FaceDir::West | FaceDir::East => 0,
            FaceDir::Down | FaceDir::Up => 1,
            FaceDir::North | FaceDir::South => 2,
        }
    }

    /// The two in-plane axes for this face's slice, in (u, v) order, as used
    /// by the binary greedy mesher's slice extraction (SPEC_FULL.md §4.5).
    pub const fn plane_axes(self) -> (usize, usize) {
        match self {
            FaceDir::Down | FaceDir::Up => (0, 2), // (x, z)
            FaceDir::North | FaceDir::South => (0, 1), // (x, y)
            FaceDir::West | FaceDir::East => (1, 2), // (y, z)
        }
    }
}

/// An axis-aligned bounding box in world space, used for chunk bounds, block
/// collision boxes, and octree/indirect-draw bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Ray/AABB intersection via the slab method. Returns the entry distance
    /// along `dir` if the ray hits within `[0, max_dist]`.
    pub fn intersects_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = max_dist;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let lo = self.min[axis];
            let hi = self.max[axis];

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv_d = 1.0 / d;
            let mut t0 = (lo - o) * inv_d;
            let mut t1 = (hi - o) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

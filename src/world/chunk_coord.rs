use crate::geom::FaceDir;
use glam::IVec3;

/// Integer chunk coordinate `C`; its world origin is `C * N`
/// (SPEC_FULL.md §3 "Coordinates").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord(pub IVec3);

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    pub fn x(self) -> i32 {
        self.0.x
    }
    pub fn y(self) -> i32 {
        self.0.y
    }
    pub fn z(self) -> i32 {
        self.0.z
    }

    pub fn world_origin(self, chunk_edge: i32) -> IVec3 {
        self.0 * chunk_edge
    }

    pub fn world_center(self, chunk_edge: i32) -> glam::Vec3 {
        let origin = self.world_origin(chunk_edge).as_vec3();
        origin + glam::Vec3::splat(chunk_edge as f32) * 0.5
    }

    pub fn from_world_block(pos: IVec3, chunk_edge: i32) -> Self {
        Self(IVec3::new(
            pos.x.div_euclid(chunk_edge),
            pos.y.div_euclid(chunk_edge),
            pos.z.div_euclid(chunk_edge),
        ))
    }

    pub fn neighbor(self, dir: FaceDir) -> Self {
        Self(self.0 + dir.normal())
    }

    pub fn distance_squared(self, other: ChunkCoord) -> i64 {
        let d = self.0 - other.0;
        let (dx, dy, dz) = (d.x as i64, d.y as i64, d.z as i64);
        dx * dx + dy * dy + dz * dz
    }
}

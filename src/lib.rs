//! Chunked voxel world core: block/model registries, the chunk lifecycle
//! state machine, terrain generation, and the binary-greedy / traditional
//! meshing pipeline (see SPEC_FULL.md for the full component breakdown).

pub mod collision;
pub mod config;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod pool;
pub mod registry;
pub mod world;

/// Commonly used types re-exported for consumers wiring up a `ChunkManager`.
pub mod prelude {
    pub use crate::collision::{block_collision_boxes, resolve_axis_by_axis};
    pub use crate::config::{EngineConfig, PoolConfig, RenderConfig, WorldConfig};
    pub use crate::error::{EngineError, ModelError, RegistryError};
    pub use crate::geom::{Aabb, FaceDir};
    pub use crate::mesh::face_instance::{FaceInstance, IndirectDrawDescriptor};
    pub use crate::registry::{BlockFlags, BlockId, BlockRegistry, BlockSpec, CullPolicy, RenderLayer};
    pub use crate::world::{Chunk, ChunkCoord, ChunkManager};

    pub use glam::{IVec3, Vec3};
}

/// Current crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

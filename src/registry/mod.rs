//! Block Registry (SPEC_FULL.md §4.1): enumerates block kinds and their
//! static properties. Per-type behavior lives in flat, dense arrays indexed
//! by `BlockId` rather than through dynamic dispatch (SPEC_FULL.md §9).

pub mod model;
pub mod texture;

use crate::error::RegistryError;
use crate::geom::FaceDir;
use model::{BlockModel, FaceBounds, ModelStore};
use std::collections::HashMap;
use std::sync::Arc;

/// A 16-bit opaque block type handle. `BlockId(0)` is always AIR
/// (SPEC_FULL.md §3 "Block identity").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub fn is_air(self) -> bool {
        self == BlockId::AIR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderLayer {
    Opaque,
    Cutout,
    Translucent,
}

impl RenderLayer {
    /// Stable numeric tag written into `FaceInstance::render_layer`
    /// (SPEC_FULL.md §6), and used to sort the final instance stream into
    /// OPAQUE, CUTOUT, TRANSLUCENT order (SPEC_FULL.md §3 "Chunk Mesh").
    pub const fn as_index(self) -> u32 {
        match self {
            RenderLayer::Opaque => 0,
            RenderLayer::Cutout => 1,
            RenderLayer::Translucent => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullPolicy {
    None,
    Full,
}

bitflags::bitflags! {
    /// Static per-type flags (SPEC_FULL.md §3 "Block identity").
    #[derive(Default)]
    pub struct BlockFlags: u8 {
        const COLLISION    = 0b0000_0001;
        const TRANSPARENT  = 0b0000_0010;
        const CAN_BE_CULLED = 0b0000_0100;
        const LIQUID       = 0b0000_1000;
    }
}

/// Static properties for one block type, resolved at registration time.
#[derive(Debug, Clone)]
pub struct BlockDef {
    pub display_id: String,
    pub model_name: String,
    pub render_layer: RenderLayer,
    pub flags: BlockFlags,
    pub cull_policy: [CullPolicy; 6],
    pub model: Option<Arc<BlockModel>>,
    pub face_bounds: [FaceBounds; 6],
    pub is_full_cube_model: bool,
}

impl BlockDef {
    fn air() -> Self {
        Self {
            display_id: "air".to_string(),
            model_name: String::new(),
            render_layer: RenderLayer::Cutout,
            flags: BlockFlags::TRANSPARENT,
            cull_policy: [CullPolicy::None; 6],
            model: None,
            face_bounds: [FaceBounds::EMPTY; 6],
            is_full_cube_model: false,
        }
    }
}

/// Spec for registering a new block type; passed to `BlockRegistry::register`.
pub struct BlockSpec {
    pub display_id: String,
    pub model_name: String,
    pub render_layer: RenderLayer,
    pub flags: BlockFlags,
    pub cull_policy: [CullPolicy; 6],
}

pub struct BlockRegistry {
    defs: Vec<BlockDef>,
    by_display_id: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            defs: vec![BlockDef::air()],
            by_display_id: HashMap::new(),
        }
    }

    /// Registers a new block type, resolving its model via `models`.
    ///
    /// A missing or malformed model is logged and does not abort
    /// registration: the block type is registered with an empty model so
    /// its cells render as missing rather than crashing meshing
    /// (SPEC_FULL.md §4.1 failure model).
    pub fn register(&mut self, spec: BlockSpec, models: &mut ModelStore) -> BlockId {
        let id = BlockId(self.defs.len() as u16);

        let model = match models.load(&spec.model_name) {
            Ok(model) => Some(model),
            Err(err) => {
                log::warn!(
                    "block '{}': failed to load model '{}': {}",
                    spec.display_id, spec.model_name, err
                );
                None
            }
        };

        let face_bounds = model
            .as_deref()
            .map(BlockModel::face_bounds)
            .unwrap_or([FaceBounds::EMPTY; 6]);
        let is_full_cube_model = model
            .as_deref()
            .map(BlockModel::is_single_full_cube)
            .unwrap_or(false);

        self.defs.push(BlockDef {
            display_id: spec.display_id.clone(),
            model_name: spec.model_name,
            render_layer: spec.render_layer,
            flags: spec.flags,
            cull_policy: spec.cull_policy,
            model,
            face_bounds,
            is_full_cube_model,
        });
        self.by_display_id.insert(spec.display_id, id);
        id
    }

    pub fn resolve_display_id(&self, display_id: &str) -> Option<BlockId> {
        self.by_display_id.get(display_id).copied()
    }

    /// Total: unknown/out-of-range ids resolve to AIR's definition.
    pub fn get(&self, id: BlockId) -> &BlockDef {
        self.defs.get(id.0 as usize).unwrap_or(&self.defs[0])
    }

    pub fn render_layer(&self, id: BlockId) -> RenderLayer {
        self.get(id).render_layer
    }

    pub fn cull_policy(&self, id: BlockId, dir: FaceDir) -> CullPolicy {
        self.get(id).cull_policy[dir.index()]
    }

    pub fn is_transparent(&self, id: BlockId) -> bool {
        id.is_air() || self.get(id).flags.contains(BlockFlags::TRANSPARENT)
    }

    pub fn is_liquid(&self, id: BlockId) -> bool {
        self.get(id).flags.contains(BlockFlags::LIQUID)
    }

    pub fn has_collision(&self, id: BlockId) -> bool {
        self.get(id).flags.contains(BlockFlags::COLLISION)
    }

    pub fn can_be_culled(&self, id: BlockId) -> bool {
        self.get(id).flags.contains(BlockFlags::CAN_BE_CULLED)
    }

    pub fn face_bounds(&self, id: BlockId) -> [FaceBounds; 6] {
        self.get(id).face_bounds
    }

    pub fn can_use_binary_meshing(&self, id: BlockId) -> bool {
        self.get(id).is_full_cube_model
    }

    /// Texture path for a block's face, resolved via its first model
    /// element that textures that direction (single-element full cubes
    /// have exactly one). Returns `None` for AIR or a model-less block.
    pub fn texture_path_for_face(&self, id: BlockId, dir: FaceDir) -> Option<&str> {
        let model = self.get(id).model.as_deref()?;
        model
            .elements
            .iter()
            .find_map(|el| el.faces.get(&dir))
            .map(|f| f.texture.as_str())
    }
}

/// Stairs are identified by display id and are a deliberate exemption from
/// the generic culling rule (SPEC_FULL.md §4.10): "Stairs ... are always
/// visible and never cull neighbors."
pub fn is_stairs_like(registry: &BlockRegistry, id: BlockId) -> bool {
    registry.get(id).display_id.contains("stairs")
}

//! Mesh Converter (SPEC_FULL.md §4.7): turns one Mesh Quad into one Face
//! Instance — world-space anchor, rotation, scale, UV tiling, texture
//! layer, and AO.

use crate::config::RenderConfig;
use crate::geom::FaceDir;
use crate::mesh::ao::compute_face_ao;
use crate::mesh::face_instance::FaceInstance;
use crate::mesh::neighborhood::ChunkNeighborhood;
use crate::mesh::quad::MeshQuad;
use crate::registry::{BlockId, BlockRegistry};
use crate::registry::texture::TextureArrayRegistry;
use glam::{IVec3, Quat, Vec3};

pub struct ConverterContext<'a> {
    pub registry: &'a BlockRegistry,
    pub textures: &'a TextureArrayRegistry,
    pub render: &'a RenderConfig,
}

/// World-space anchor of a quad relative to its chunk-local integer
/// origin, per the face/anchor table in SPEC_FULL.md §4.7. `offset` and
/// `extents` describe the sub-cube the face actually bounds: the full
/// unit cube for binary-meshed quads, or the element's `from`/`to` box
/// (scaled by the quad's integer size) for traditional per-element quads
/// (SPEC_FULL.md §4.6, §4.9 step 2).
fn quad_anchor_offset(dir: FaceDir, offset: Vec3, extents: Vec3) -> Vec3 {
    let far = offset + extents;
    match dir {
        FaceDir::Down => Vec3::new(offset.x, offset.y, far.z),
        FaceDir::Up => Vec3::new(offset.x, far.y, offset.z),
        FaceDir::North => Vec3::new(offset.x, offset.y, offset.z),
        FaceDir::South => Vec3::new(far.x, offset.y, far.z),
        FaceDir::West => Vec3::new(offset.x, offset.y, far.z),
        FaceDir::East => Vec3::new(far.x, offset.y, offset.z),
    }
}

/// Resolves the texture reference for one face of a block's model. For
/// binary-meshed quads (`element_index == -1`) this is the block's single
/// full-cube element; for traditional per-element quads it is the specific
/// element named by `element_index` (SPEC_FULL.md §4.6).
fn face_texture_path<'a>(
    registry: &'a BlockRegistry,
    block: BlockId,
    dir: FaceDir,
    element_index: i32,
) -> Option<&'a str> {
    let model = registry.get(block).model.as_deref()?;
    if element_index >= 0 {
        model
            .elements
            .get(element_index as usize)?
            .faces
            .get(&dir)
            .map(|f| f.texture.as_str())
    } else {
        model
            .elements
            .iter()
            .find_map(|el| el.faces.get(&dir))
            .map(|f| f.texture.as_str())
    }
}

pub fn convert_quad(
    ctx: &ConverterContext,
    quad: &MeshQuad,
    neighborhood: &ChunkNeighborhood,
    chunk_world_origin: IVec3,
) -> FaceInstance {
    let (ua, va) = quad.dir.plane_axes();
    let size = quad.size.to_array();
    let (in_w, in_h) = (size[ua], size[va]);

    // Extents of the sub-cube this quad's face actually bounds: the full
    // quad for binary-meshed quads (element_size == ONE), or the element's
    // from/to box for traditional per-element quads.
    let extents = quad.size.as_vec3() * quad.element_size;

    let world_pos = chunk_world_origin.as_vec3()
        + quad.origin.as_vec3()
        + quad_anchor_offset(quad.dir, quad.element_offset, extents);

    let rotation = Quat::from_rotation_arc(Vec3::Z, quad.dir.normal().as_vec3());

    let mut scale = [1.0f32; 3];
    scale[ua] = extents.to_array()[ua];
    scale[va] = extents.to_array()[va];

    let uv = [0.0, 0.0, 16.0 * in_w as f32, 16.0 * in_h as f32];

    let texture_path = face_texture_path(ctx.registry, quad.block, quad.dir, quad.element_index)
        .unwrap_or("missing");
    let texture_layer = ctx.textures.get_or_register(texture_path);

    let debug = ctx.render.ao_debug.then_some(ctx.render.ao_debug_value);
    let ao = compute_face_ao(
        ctx.registry,
        |x, y, z| neighborhood.block_at(x, y, z).unwrap_or(BlockId::AIR),
        quad.origin,
        quad.dir,
        in_w,
        in_h,
        debug,
        ctx.render.ao_multiplier,
    );

    FaceInstance {
        position: world_pos.to_array(),
        rotation: rotation.to_array(),
        scale,
        face_direction: quad.dir.index() as u32,
        uv,
        texture_layer,
        render_layer: ctx.registry.render_layer(quad.block).as_index(),
        ao,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::ModelStore;
    use crate::registry::{BlockFlags, BlockSpec, CullPolicy, RenderLayer};
    use crate::world::chunk::Chunk;
    use crate::world::chunk_coord::ChunkCoord;

    #[test]
    fn single_cube_quad_has_unit_scale_and_full_uv() {
        let dir = std::env::temp_dir().join(format!("voxcore_converter_test_{}", std::process::id()));
        let model_dir = dir.join("vox").join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(
            model_dir.join("stone.json"),
            r#"{"textures":{"all":"vox:stone"},"elements":[{"from":[0,0,0],"to":[16,16,16],
               "faces":{"down":{"texture":"#all"},"up":{"texture":"#all"},"north":{"texture":"#all"},
               "south":{"texture":"#all"},"west":{"texture":"#all"},"east":{"texture":"#all"}}}]}"#,
        )
        .unwrap();
        let mut models = ModelStore::new(&dir, "vox");
        let mut registry = BlockRegistry::new();
        let stone = registry.register(
            BlockSpec {
                display_id: "stone".into(),
                model_name: "stone".into(),
                render_layer: RenderLayer::Opaque,
                flags: BlockFlags::COLLISION | BlockFlags::CAN_BE_CULLED,
                cull_policy: [CullPolicy::Full; 6],
            },
            &mut models,
        );

        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 8, BlockId::AIR);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        let textures = TextureArrayRegistry::new();
        let render = RenderConfig::default();
        let ctx = ConverterContext {
            registry: &registry,
            textures: &textures,
            render: &render,
        };

        let quad = MeshQuad {
            block: stone,
            dir: FaceDir::Up,
            origin: IVec3::new(1, 2, 3),
            size: IVec3::new(1, 1, 1),
            element_index: -1,
            element_offset: Vec3::ZERO,
            element_size: Vec3::ONE,
            face_bounds: crate::registry::model::FaceBounds::FULL,
        };

        let instance = convert_quad(&ctx, &quad, &neighborhood, IVec3::ZERO);
        assert_eq!(instance.scale, [1.0, 1.0, 1.0]);
        assert_eq!(instance.uv, [0.0, 0.0, 16.0, 16.0]);
        assert_eq!(instance.position, [1.0, 3.0, 3.0]); // anchor: (0, sizeY, 0)
    }

    #[test]
    fn slab_quad_anchors_and_scales_to_its_half_height_element() {
        let dir = std::env::temp_dir().join(format!("voxcore_converter_slab_test_{}", std::process::id()));
        let model_dir = dir.join("vox").join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(
            model_dir.join("slab.json"),
            r#"{"textures":{"all":"vox:stone"},"elements":[{"from":[0,0,0],"to":[16,8,16],
               "faces":{"down":{"texture":"#all"},"up":{"texture":"#all"},"north":{"texture":"#all"},
               "south":{"texture":"#all"},"west":{"texture":"#all"},"east":{"texture":"#all"}}}]}"#,
        )
        .unwrap();
        let mut models = ModelStore::new(&dir, "vox");
        let mut registry = BlockRegistry::new();
        let slab = registry.register(
            BlockSpec {
                display_id: "stone_slab".into(),
                model_name: "slab".into(),
                render_layer: RenderLayer::Opaque,
                flags: BlockFlags::COLLISION,
                cull_policy: [CullPolicy::None; 6],
            },
            &mut models,
        );

        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), 8, BlockId::AIR);
        let neighborhood = ChunkNeighborhood::new(&chunk, Default::default());
        let textures = TextureArrayRegistry::new();
        let render = RenderConfig::default();
        let ctx = ConverterContext {
            registry: &registry,
            textures: &textures,
            render: &render,
        };

        // element from=(0,0,0) to=(1,0.5,1): a half-height slab resting on
        // the bottom of its cell.
        let element_offset = Vec3::new(0.0, 0.0, 0.0);
        let element_size = Vec3::new(1.0, 0.5, 1.0);

        let up = MeshQuad {
            block: slab,
            dir: FaceDir::Up,
            origin: IVec3::new(0, 0, 0),
            size: IVec3::new(1, 1, 1),
            element_index: 0,
            element_offset,
            element_size,
            face_bounds: crate::registry::model::FaceBounds::FULL,
        };
        let up_instance = convert_quad(&ctx, &up, &neighborhood, IVec3::ZERO);
        assert_eq!(up_instance.position, [0.0, 0.5, 0.0]);

        let north = MeshQuad {
            dir: FaceDir::North,
            ..up
        };
        let north_instance = convert_quad(&ctx, &north, &neighborhood, IVec3::ZERO);
        assert_eq!(north_instance.scale, [1.0, 0.5, 1.0]);
    }
}

//! Model & Face-Bounds Store (SPEC_FULL.md §4.1, §6 "Model file format").
//!
//! Parses the Blockbench-style JSON model records referenced by the Block
//! Registry, resolves `parent`/`#ref` texture inheritance, and derives the
//! per-face 2D bounds used by face culling and the hybrid dispatcher.

use crate::error::ModelError;
use crate::geom::FaceDir;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A 2D rectangle in 0..1 describing what fraction of a face a block's
/// geometry covers (SPEC_FULL.md glossary "Face bounds").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBounds {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

const EPS: f32 = 1e-4;

impl FaceBounds {
    pub const EMPTY: FaceBounds = FaceBounds {
        u0: 0.0,
        v0: 0.0,
        u1: 0.0,
        v1: 0.0,
    };
    pub const FULL: FaceBounds = FaceBounds {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    pub fn is_empty(&self) -> bool {
        (self.u1 - self.u0) <= EPS || (self.v1 - self.v0) <= EPS
    }

    pub fn is_full(&self) -> bool {
        self.approx_eq(&FaceBounds::FULL)
    }

    pub fn approx_eq(&self, other: &FaceBounds) -> bool {
        (self.u0 - other.u0).abs() <= EPS
            && (self.v0 - other.v0).abs() <= EPS
            && (self.u1 - other.u1).abs() <= EPS
            && (self.v1 - other.v1).abs() <= EPS
    }

    /// True iff `self` fully covers `other` (within epsilon), used by the
    /// cross-chunk culling decision table (SPEC_FULL.md §4.10).
    pub fn covers(&self, other: &FaceBounds) -> bool {
        self.u0 <= other.u0 + EPS
            && self.v0 <= other.v0 + EPS
            && self.u1 >= other.u1 - EPS
            && self.v1 >= other.v1 - EPS
    }

    fn union(&self, other: &FaceBounds) -> FaceBounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        FaceBounds {
            u0: self.u0.min(other.u0),
            v0: self.v0.min(other.v0),
            u1: self.u1.max(other.u1),
            v1: self.v1.max(other.v1),
        }
    }
}

/// A resolved, textured face of a model element: a concrete texture path and
/// a UV rectangle in 0..16 units.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFace {
    pub texture: String,
    pub uv: (f32, f32, f32, f32),
}

/// One cuboid piece of a block model, with `from`/`to` normalized to 0..1
/// (the JSON format expresses them in 0..16).
#[derive(Debug, Clone)]
pub struct Element {
    pub from: glam::Vec3,
    pub to: glam::Vec3,
    pub faces: HashMap<FaceDir, ResolvedFace>,
}

impl Element {
    /// The element's extents on the two in-plane axes of `dir`, as a
    /// `FaceBounds`, or `FaceBounds::EMPTY` if this element has no textured
    /// face in that direction.
    pub fn face_bounds(&self, dir: FaceDir) -> FaceBounds {
        if !self.faces.contains_key(&dir) {
            return FaceBounds::EMPTY;
        }
        let (ua, va) = dir.plane_axes();
        FaceBounds {
            u0: self.from[ua],
            v0: self.from[va],
            u1: self.to[ua],
            v1: self.to[va],
        }
    }

    pub fn is_full_unit_cube(&self) -> bool {
        const EPS: f32 = 1e-4;
        (self.from - glam::Vec3::ZERO).abs().max_element() <= EPS
            && (self.to - glam::Vec3::ONE).abs().max_element() <= EPS
    }
}

/// A fully resolved block model: one or more cuboid elements.
#[derive(Debug, Clone)]
pub struct BlockModel {
    pub elements: Vec<Element>,
}

impl BlockModel {
    /// SPEC_FULL.md §4.11 `canUseBinaryMeshing`: true iff the model is a
    /// single element spanning the full unit cube with all six faces
    /// textured.
    pub fn is_single_full_cube(&self) -> bool {
        self.elements.len() == 1
            && self.elements[0].is_full_unit_cube()
            && crate::geom::ALL_FACE_DIRS
                .iter()
                .all(|d| self.elements[0].faces.contains_key(d))
    }

    /// Derives the per-face union bounds across all elements
    /// (SPEC_FULL.md §4.1 "Face bounds derivation").
    pub fn face_bounds(&self) -> [FaceBounds; 6] {
        let mut out = [FaceBounds::EMPTY; 6];
        for dir in crate::geom::ALL_FACE_DIRS {
            let mut union = FaceBounds::EMPTY;
            for el in &self.elements {
                union = union.union(&el.face_bounds(dir));
            }
            out[dir.index()] = union;
        }
        out
    }
}

#[derive(Debug, Deserialize)]
struct RawElement {
    from: [f32; 3],
    to: [f32; 3],
    #[serde(default)]
    faces: HashMap<String, RawFace>,
}

#[derive(Debug, Deserialize)]
struct RawFace {
    texture: String,
    #[serde(default)]
    uv: Option<[f32; 4]>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModel {
    parent: Option<String>,
    #[serde(default)]
    textures: HashMap<String, String>,
    elements: Option<Vec<RawElement>>,
}

/// Resolves and caches block models by name. Parse failures are surfaced to
/// the caller (the Block Registry logs and skips the offending block type
/// per SPEC_FULL.md §4.1's failure model; `ModelStore` itself stays total
/// about *cache* state and only returns `Result` from `load`).
pub struct ModelStore {
    assets_root: PathBuf,
    namespace: String,
    cache: HashMap<String, std::sync::Arc<BlockModel>>,
}

impl ModelStore {
    pub fn new(assets_root: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            assets_root: assets_root.into(),
            namespace: namespace.into(),
            cache: HashMap::new(),
        }
    }

    fn model_path(&self, model_name: &str) -> PathBuf {
        self.assets_root
            .join(&self.namespace)
            .join("models")
            .join("block")
            .join(format!("{model_name}.json"))
    }

    pub fn load(&mut self, model_name: &str) -> Result<std::sync::Arc<BlockModel>, ModelError> {
        if let Some(cached) = self.cache.get(model_name) {
            return Ok(cached.clone());
        }
        let mut visited = HashSet::new();
        let (raw_elements, textures) = self.resolve_raw(model_name, &mut visited)?;
        let elements = raw_elements
            .into_iter()
            .map(|re| resolve_element(re, &textures))
            .collect::<Result<Vec<_>, _>>()?;
        let model = std::sync::Arc::new(BlockModel { elements });
        self.cache.insert(model_name.to_string(), model.clone());
        Ok(model)
    }

    /// Walks the `parent` chain, merging textures (child keys override
    /// parent keys) and inheriting `elements` only when the child omits its
    /// own array, per SPEC_FULL.md §6's model file format.
    fn resolve_raw(
        &self,
        model_name: &str,
        visited: &mut HashSet<String>,
    ) -> Result<(Vec<RawElement>, HashMap<String, String>), ModelError> {
        if !visited.insert(model_name.to_string()) {
            return Err(ModelError::ParentCycle(model_name.to_string()));
        }

        let path = self.model_path(model_name);
        let text = std::fs::read_to_string(&path).map_err(|_| ModelError::Missing(path.clone()))?;
        let raw: RawModel = serde_json::from_str(&text)
            .map_err(|source| ModelError::Malformed { path: path.clone(), source })?;

        let (parent_elements, mut textures) = if let Some(parent) = &raw.parent {
            self.resolve_raw(parent, visited)?
        } else {
            (Vec::new(), HashMap::new())
        };

        for (k, v) in raw.textures {
            textures.insert(k, v);
        }

        let elements = raw.elements.unwrap_or(parent_elements);
        Ok((elements, textures))
    }
}

fn resolve_texture_ref<'a>(
    key: &str,
    textures: &'a HashMap<String, String>,
) -> Result<&'a str, ModelError> {
    let mut current = key;
    for _ in 0..textures.len() + 1 {
        let stripped = current.strip_prefix('#').unwrap_or(current);
        match textures.get(stripped) {
            Some(next) if next.starts_with('#') => current = next,
            Some(concrete) => return Ok(concrete.as_str()),
            None => return Err(ModelError::UnresolvedTexture(key.to_string())),
        }
    }
    Err(ModelError::UnresolvedTexture(key.to_string()))
}

fn resolve_element(raw: RawElement, textures: &HashMap<String, String>) -> Result<Element, ModelError> {
    let from = glam::Vec3::new(raw.from[0], raw.from[1], raw.from[2]) / 16.0;
    let to = glam::Vec3::new(raw.to[0], raw.to[1], raw.to[2]) / 16.0;

    let mut faces = HashMap::new();
    for (key, face) in raw.faces {
        let Some(dir) = FaceDir::from_key(&key) else {
            continue; // unknown keys are ignored (§6)
        };
        let texture = resolve_texture_ref(&face.texture, textures)?.to_string();
        let uv = face.uv.map(|u| (u[0], u[1], u[2], u[3])).unwrap_or((0.0, 0.0, 16.0, 16.0));
        faces.insert(dir, ResolvedFace { texture, uv });
    }

    Ok(Element { from, to, faces })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_model(dir: &Path, namespace: &str, name: &str, json: &str) {
        let model_dir = dir.join(namespace).join("models").join("block");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join(format!("{name}.json")), json).unwrap();
    }

    #[test]
    fn full_cube_model_resolves_and_is_single_full_cube() {
        let tmp = tempdir();
        write_model(
            &tmp,
            "vox",
            "cube_all",
            r#"{
                "textures": { "all": "vox:stone" },
                "elements": [{
                    "from": [0,0,0], "to": [16,16,16],
                    "faces": {
                        "down": {"texture": "#all"}, "up": {"texture": "#all"},
                        "north": {"texture": "#all"}, "south": {"texture": "#all"},
                        "west": {"texture": "#all"}, "east": {"texture": "#all"}
                    }
                }]
            }"#,
        );
        let mut store = ModelStore::new(&tmp, "vox");
        let model = store.load("cube_all").unwrap();
        assert!(model.is_single_full_cube());
        let bounds = model.face_bounds();
        assert!(bounds[FaceDir::Up.index()].is_full());
    }

    #[test]
    fn parent_inheritance_and_texture_override() {
        let tmp = tempdir();
        write_model(
            &tmp,
            "vox",
            "parent_cube",
            r#"{
                "textures": { "all": "vox:stone" },
                "elements": [{
                    "from": [0,0,0], "to": [16,16,16],
                    "faces": { "up": {"texture": "#all"} }
                }]
            }"#,
        );
        write_model(
            &tmp,
            "vox",
            "child_cube",
            r#"{ "parent": "parent_cube", "textures": { "all": "vox:dirt" } }"#,
        );
        let mut store = ModelStore::new(&tmp, "vox");
        let model = store.load("child_cube").unwrap();
        assert_eq!(model.elements.len(), 1);
        assert_eq!(
            model.elements[0].faces[&FaceDir::Up].texture,
            "vox:dirt"
        );
    }

    #[test]
    fn missing_model_is_reported() {
        let tmp = tempdir();
        let mut store = ModelStore::new(&tmp, "vox");
        assert!(matches!(store.load("nope"), Err(ModelError::Missing(_))));
    }

    #[test]
    fn stairs_like_partial_element_has_partial_bounds() {
        let tmp = tempdir();
        write_model(
            &tmp,
            "vox",
            "half_slab",
            r#"{
                "textures": { "all": "vox:stone" },
                "elements": [{
                    "from": [0,0,0], "to": [16,8,16],
                    "faces": {
                        "up": {"texture": "#all"}, "down": {"texture": "#all"},
                        "north": {"texture": "#all"}, "south": {"texture": "#all"},
                        "west": {"texture": "#all"}, "east": {"texture": "#all"}
                    }
                }]
            }"#,
        );
        let mut store = ModelStore::new(&tmp, "vox");
        let model = store.load("half_slab").unwrap();
        assert!(!model.is_single_full_cube());
        let bounds = model.face_bounds();
        assert!(!bounds[FaceDir::North.index()].is_full());
        assert!((bounds[FaceDir::North.index()].v1 - 0.5).abs() < 1e-3);
    }

    fn tempdir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "voxcore_model_test_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).ok();
        dir
    }
}

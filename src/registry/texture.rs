//! Texture Array Registry (SPEC_FULL.md §4.1.3 / §6): maps texture paths to
//! stable layer indices. Texture image decoding and upload are external
//! collaborators (out of scope per SPEC_FULL.md §1); this registry only
//! owns the idempotent path → layer-index mapping consumed by face
//! instances.

use parking_lot::Mutex;
use std::collections::HashMap;

pub struct TextureArrayRegistry {
    inner: Mutex<Inner>,
}

struct Inner {
    layers: HashMap<String, u32>,
    next_layer: u32,
}

impl Default for TextureArrayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureArrayRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                layers: HashMap::new(),
                next_layer: 0,
            }),
        }
    }

    /// Idempotent: repeated calls with the same path return the same layer
    /// index (SPEC_FULL.md §8 round-trip property).
    pub fn get_or_register(&self, path: &str) -> u32 {
        let mut inner = self.inner.lock();
        if let Some(&layer) = inner.layers.get(path) {
            return layer;
        }
        let layer = inner.next_layer;
        inner.next_layer += 1;
        inner.layers.insert(path.to_string(), layer);
        layer
    }

    pub fn layer_count(&self) -> u32 {
        self.inner.lock().next_layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent_and_stable() {
        let reg = TextureArrayRegistry::new();
        let a = reg.get_or_register("vox:block/stone");
        let b = reg.get_or_register("vox:block/dirt");
        let a2 = reg.get_or_register("vox:block/stone");
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_eq!(reg.layer_count(), 2);
    }
}

use serde::{Deserialize, Serialize};

/// Rendering/meshing-facing tunables (SPEC_FULL.md §4.8 "debug mode" and
/// §4.12 "spherical render-distance shell").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render-distance shell radius, in chunks.
    pub render_distance_chunks: u32,
    /// When set, ambient occlusion is overridden with a fixed vector.
    pub ao_debug: bool,
    /// Fixed AO vector used when `ao_debug` is set.
    pub ao_debug_value: [f32; 4],
    /// Multiplier applied to the final (possibly debug-overridden) AO value.
    pub ao_multiplier: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_distance_chunks: 12,
            ao_debug: false,
            ao_debug_value: [1.0, 1.0, 1.0, 1.0],
            ao_multiplier: 1.0,
        }
    }
}

//! Layered engine configuration, split by concern the way the teacher's
//! `config/worldgen.rs`, `config/rendering.rs`, etc. are split, rather than
//! one monolithic settings struct.

mod pool;
mod rendering;
mod worldgen;

pub use pool::PoolConfig;
pub use rendering::RenderConfig;
pub use worldgen::WorldConfig;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub render: RenderConfig,
    pub pool: PoolConfig,
}

impl EngineConfig {
    /// Loads configuration from a TOML file, falling back to defaults for
    /// any section (or the whole file) that is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("no config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}
